use axum::extract::{Path, RawQuery, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prestige_core::envelope::ApiResponse;
use prestige_domain::access::{AccessControl, AccessType, PermissionGrant};
use prestige_domain::pagination::Paginated;

use crate::domain::types::{Role, RoleDraft};
use crate::domain::validation::{self, Validate, non_blank};
use crate::error::IdentityError;
use crate::handlers::SuccessResponse;
use crate::handlers::extract::{SearchQuery, Valid, parse_query};
use crate::state::{AppState, Repositories};
use crate::usecase::role::{
    AddRoleUseCase, DeleteRoleUseCase, GetRoleUseCase, GetRolesUseCase, RoleDetails,
    UpdateRoleUseCase,
};

// ── Request ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRequest {
    pub permission_id: String,
    #[serde(default)]
    pub access_type: AccessType,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlRequest {
    #[serde(default)]
    pub permissions: Vec<GrantRequest>,
    #[serde(default)]
    pub has_all_permissions: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub access_control: AccessControlRequest,
}

impl Validate for RoleRequest {
    fn validate(&self) -> Result<(), IdentityError> {
        validation::required(&self.name)?;
        for grant in &self.access_control.permissions {
            validation::object_id(&grant.permission_id)?;
        }
        Ok(())
    }
}

impl RoleRequest {
    fn into_draft(self) -> Result<RoleDraft, IdentityError> {
        let permissions = self
            .access_control
            .permissions
            .iter()
            .map(|grant| {
                Ok(PermissionGrant {
                    permission_id: validation::object_id(&grant.permission_id)?,
                    access_type: grant.access_type,
                })
            })
            .collect::<Result<Vec<_>, IdentityError>>()?;
        Ok(RoleDraft {
            name: self.name.trim().to_owned(),
            description: non_blank(self.description),
            access_control: AccessControl {
                permissions,
                has_all_permissions: self.access_control.has_all_permissions,
            },
        })
    }
}

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Role> for RoleSummaryResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRefResponse {
    pub id: Uuid,
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantResponse {
    pub permission: PermissionRefResponse,
    pub access_type: AccessType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlResponse {
    pub permissions: Vec<GrantResponse>,
    pub has_all_permissions: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDetailsResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub access_control: AccessControlResponse,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<RoleDetails> for RoleDetailsResponse {
    fn from(details: RoleDetails) -> Self {
        let RoleDetails { role, permissions } = details;
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            access_control: AccessControlResponse {
                permissions: permissions
                    .into_iter()
                    .map(|grant| GrantResponse {
                        permission: PermissionRefResponse {
                            id: grant.permission_id,
                            code: grant.code,
                            name: grant.name,
                        },
                        access_type: grant.access_type,
                    })
                    .collect(),
                has_all_permissions: role.access_control.has_all_permissions,
            },
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

// ── POST roles ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoleResponse {
    pub success: bool,
    pub role_id: Uuid,
}

pub async fn add_role<R: Repositories>(
    State(state): State<AppState<R>>,
    Valid(body): Valid<RoleRequest>,
) -> Result<ApiResponse<AddRoleResponse>, IdentityError> {
    let usecase = AddRoleUseCase {
        roles: state.role_repo(),
    };
    let role_id = usecase.execute(body.into_draft()?).await?;
    Ok(ApiResponse::ok(AddRoleResponse {
        success: true,
        role_id,
    }))
}

// ── GET roles ────────────────────────────────────────────────────────────────

pub async fn get_roles<R: Repositories>(
    State(state): State<AppState<R>>,
    RawQuery(query): RawQuery,
) -> Result<ApiResponse<Paginated<RoleSummaryResponse>>, IdentityError> {
    let query: SearchQuery = parse_query(query.as_deref())?;
    let page = query.page_request()?;
    let usecase = GetRolesUseCase {
        roles: state.role_repo(),
    };
    let roles = usecase.execute(query.q(), page).await?;
    Ok(ApiResponse::ok(roles.map(Into::into)))
}

// ── GET roles/{id} ───────────────────────────────────────────────────────────

pub async fn get_role<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<RoleDetailsResponse>, IdentityError> {
    let id = validation::object_id(&id)?;
    let usecase = GetRoleUseCase {
        roles: state.role_repo(),
        permissions: state.permission_repo(),
    };
    let details = usecase.execute(id).await?;
    Ok(ApiResponse::ok(details.into()))
}

// ── PUT roles/{id} ───────────────────────────────────────────────────────────

pub async fn update_role<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Valid(body): Valid<RoleRequest>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    let id = validation::object_id(&id)?;
    let usecase = UpdateRoleUseCase {
        roles: state.role_repo(),
    };
    usecase.execute(id, body.into_draft()?).await?;
    Ok(ApiResponse::ok(SuccessResponse { success: true }))
}

// ── DELETE roles/{id} ────────────────────────────────────────────────────────

pub async fn delete_role<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    let id = validation::object_id(&id)?;
    let usecase = DeleteRoleUseCase {
        roles: state.role_repo(),
    };
    usecase.execute(id).await?;
    Ok(ApiResponse::ok(SuccessResponse { success: true }))
}
