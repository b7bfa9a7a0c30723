use axum::extract::{Path, RawQuery, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use prestige_core::envelope::ApiResponse;
use prestige_domain::pagination::Paginated;

use crate::domain::types::Permission;
use crate::domain::validation;
use crate::error::IdentityError;
use crate::handlers::extract::{SearchQuery, parse_query};
use crate::state::{AppState, Repositories};
use crate::usecase::permission::{GetPermissionUseCase, GetPermissionsUseCase};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Permission> for PermissionResponse {
    fn from(permission: Permission) -> Self {
        Self {
            id: permission.id,
            code: permission.code,
            name: permission.name,
            description: permission.description,
            created_at: permission.created_at,
            updated_at: permission.updated_at,
        }
    }
}

// ── GET permissions ──────────────────────────────────────────────────────────

pub async fn get_permissions<R: Repositories>(
    State(state): State<AppState<R>>,
    RawQuery(query): RawQuery,
) -> Result<ApiResponse<Paginated<PermissionResponse>>, IdentityError> {
    let query: SearchQuery = parse_query(query.as_deref())?;
    let page = query.page_request()?;
    let usecase = GetPermissionsUseCase {
        permissions: state.permission_repo(),
    };
    let permissions = usecase.execute(query.q(), page).await?;
    Ok(ApiResponse::ok(permissions.map(Into::into)))
}

// ── GET permissions/{id} ─────────────────────────────────────────────────────

pub async fn get_permission<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<PermissionResponse>, IdentityError> {
    let id = validation::object_id(&id)?;
    let usecase = GetPermissionUseCase {
        permissions: state.permission_repo(),
    };
    let permission = usecase.execute(id).await?;
    Ok(ApiResponse::ok(permission.into()))
}
