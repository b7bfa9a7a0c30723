use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use prestige_domain::access::AccessType;
use prestige_domain::pagination::{PageRequest, Paginated};

use crate::domain::repository::{PermissionRepository, RoleRepository};
use crate::domain::types::{Role, RoleDraft};
use crate::error::IdentityError;

/// A grant with the catalog entry's display name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGrant {
    pub permission_id: Uuid,
    pub code: Option<String>,
    pub name: Option<String>,
    pub access_type: AccessType,
}

#[derive(Debug, Clone)]
pub struct RoleDetails {
    pub role: Role,
    pub permissions: Vec<ResolvedGrant>,
}

// ── AddRole ──────────────────────────────────────────────────────────────────

pub struct AddRoleUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> AddRoleUseCase<R> {
    pub async fn execute(&self, draft: RoleDraft) -> Result<Uuid, IdentityError> {
        let name = draft.name.trim().to_owned();
        if self.roles.find_by_name(&name).await?.is_some() {
            return Err(IdentityError::RoleAlreadyExists);
        }

        let now = Utc::now();
        let role = Role {
            id: Uuid::now_v7(),
            name,
            description: draft.description,
            access_control: draft.access_control,
            created_at: now,
            updated_at: now,
        };
        self.roles.create(&role).await?;

        info!(role_id = %role.id, name = %role.name, "role created");
        Ok(role.id)
    }
}

// ── GetRoles / GetRole ───────────────────────────────────────────────────────

pub struct GetRolesUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> GetRolesUseCase<R> {
    pub async fn execute(
        &self,
        q: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<Role>, IdentityError> {
        let (items, total) = self.roles.list(q, page).await?;
        Ok(Paginated::new(items, page, total))
    }
}

pub struct GetRoleUseCase<R: RoleRepository, P: PermissionRepository> {
    pub roles: R,
    pub permissions: P,
}

impl<R: RoleRepository, P: PermissionRepository> GetRoleUseCase<R, P> {
    pub async fn execute(&self, id: Uuid) -> Result<RoleDetails, IdentityError> {
        let role = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::RoleNotFound)?;

        let ids: Vec<Uuid> = role
            .access_control
            .permissions
            .iter()
            .map(|grant| grant.permission_id)
            .collect();
        let catalog = self.permissions.find_many(&ids).await?;

        // Grants whose catalog entry has been removed keep their id but lose the name.
        let permissions = role
            .access_control
            .permissions
            .iter()
            .map(|grant| {
                let entry = catalog.iter().find(|p| p.id == grant.permission_id);
                ResolvedGrant {
                    permission_id: grant.permission_id,
                    code: entry.map(|p| p.code.clone()),
                    name: entry.map(|p| p.name.clone()),
                    access_type: grant.access_type,
                }
            })
            .collect();

        Ok(RoleDetails { role, permissions })
    }
}

// ── UpdateRole ───────────────────────────────────────────────────────────────

/// Rewrites the role. Users keep the access control snapshot they were
/// created with.
pub struct UpdateRoleUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> UpdateRoleUseCase<R> {
    pub async fn execute(&self, id: Uuid, draft: RoleDraft) -> Result<(), IdentityError> {
        let mut role = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::RoleNotFound)?;

        let name = draft.name.trim().to_owned();
        let clash = self.roles.find_by_name(&name).await?;
        if clash.is_some_and(|other| other.id != id) {
            return Err(IdentityError::RoleAlreadyExists);
        }

        role.name = name;
        role.description = draft.description;
        role.access_control = draft.access_control;
        role.updated_at = Utc::now();
        self.roles.save(&role).await?;

        info!(role_id = %id, "role updated");
        Ok(())
    }
}

// ── DeleteRole ───────────────────────────────────────────────────────────────

pub struct DeleteRoleUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> DeleteRoleUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), IdentityError> {
        if !self.roles.delete(id).await? {
            return Err(IdentityError::RoleNotFound);
        }
        info!(role_id = %id, "role deleted");
        Ok(())
    }
}
