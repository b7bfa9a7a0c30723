use http::Method;
use tracing::debug;
use uuid::Uuid;

use prestige_domain::access::{AccessType, PermissionCode};
use prestige_domain::account::AccountType;
use prestige_domain::pagination::{PageRequest, Paginated};

use crate::domain::repository::{PermissionRepository, UserRepository};
use crate::domain::types::{Permission, User};
use crate::error::IdentityError;

/// Pure allow/deny decision once the user and catalog entry are loaded.
///
/// Only admin accounts are subject to permission checks. A `ReadOnly` grant
/// allows `GET` only.
pub fn decide(
    user: &User,
    permission: Option<&Permission>,
    method: &Method,
) -> Result<(), IdentityError> {
    if user.account_type != AccountType::Admin {
        return Ok(());
    }
    let Some(access_control) = &user.access_control else {
        return Err(IdentityError::AccessDenied);
    };
    if access_control.has_all_permissions {
        return Ok(());
    }
    let grant = permission
        .and_then(|permission| access_control.grant_for(permission.id))
        .ok_or(IdentityError::AccessDenied)?;
    if grant.access_type == AccessType::ReadOnly && *method != Method::GET {
        return Err(IdentityError::AccessDenied);
    }
    Ok(())
}

/// Loads the catalog entry and the principal, then applies [`decide`].
pub struct EvaluatePermissionUseCase<U: UserRepository, P: PermissionRepository> {
    pub users: U,
    pub permissions: P,
}

impl<U: UserRepository, P: PermissionRepository> EvaluatePermissionUseCase<U, P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        code: PermissionCode,
        method: &Method,
    ) -> Result<(), IdentityError> {
        let permission = self.permissions.find_by_code(code.as_str()).await?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityError::WrongAuthentication)?;

        decide(&user, permission.as_ref(), method).inspect_err(|_| {
            debug!(user_id = %user_id, permission = %code, method = %method, "permission denied");
        })
    }
}

// ── Catalog reads ────────────────────────────────────────────────────────────

pub struct GetPermissionsUseCase<P: PermissionRepository> {
    pub permissions: P,
}

impl<P: PermissionRepository> GetPermissionsUseCase<P> {
    pub async fn execute(
        &self,
        q: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<Permission>, IdentityError> {
        let (items, total) = self.permissions.list(q, page).await?;
        Ok(Paginated::new(items, page, total))
    }
}

pub struct GetPermissionUseCase<P: PermissionRepository> {
    pub permissions: P,
}

impl<P: PermissionRepository> GetPermissionUseCase<P> {
    pub async fn execute(&self, id: Uuid) -> Result<Permission, IdentityError> {
        self.permissions
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::PermissionNotFound)
    }
}
