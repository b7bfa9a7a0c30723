use axum::extract::{Path, RawQuery, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prestige_auth_types::headers::LangCode;
use prestige_core::envelope::ApiResponse;
use prestige_domain::account::{AccountType, ActivationStatus};
use prestige_domain::pagination::Paginated;

use crate::domain::types::UserFilter;
use crate::domain::validation::{self, Validate, non_blank};
use crate::error::IdentityError;
use crate::handlers::extract::{PageQuery, Valid, parse_query};
use crate::handlers::profile::{ProfileRequest, UserDetailsResponse, UserSummaryResponse};
use crate::handlers::{SuccessResponse, mailed};
use crate::state::{AppState, Repositories};
use crate::usecase::user::{
    AddUserInput, AddUserUseCase, DeleteUserUseCase, GetUserUseCase, GetUsersUseCase,
    UpdateUserUseCase,
};

// ── POST users ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub role_id: String,
    #[serde(flatten)]
    pub profile: ProfileRequest,
}

impl Validate for AddUserRequest {
    fn validate(&self) -> Result<(), IdentityError> {
        validation::required(&self.role_id)?;
        validation::object_id(&self.role_id)?;
        self.profile.validate()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserResponse {
    pub success: bool,
    pub user_id: Uuid,
}

pub async fn add_user<R: Repositories>(
    State(state): State<AppState<R>>,
    Valid(body): Valid<AddUserRequest>,
) -> Result<ApiResponse<AddUserResponse>, IdentityError> {
    let role_id = validation::object_id(&body.role_id)?;
    let usecase = AddUserUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        mailer: state.mailer(),
        secrets: state.secrets.clone(),
        settings: state.settings.clone(),
    };
    let output = usecase
        .execute(AddUserInput {
            role_id,
            profile: body.profile.into_profile(),
        })
        .await?;
    Ok(mailed(
        AddUserResponse {
            success: output.email_sent,
            user_id: output.user_id,
        },
        output.email_sent,
    ))
}

// ── GET users ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub account_type: Option<AccountType>,
    pub role_id: Option<String>,
    pub activation_status: Option<ActivationStatus>,
    pub q: Option<String>,
}

impl UsersQuery {
    fn filter(self) -> Result<UserFilter, IdentityError> {
        let role_id = non_blank(self.role_id)
            .map(|id| validation::object_id(&id))
            .transpose()?;
        Ok(UserFilter {
            account_type: self.account_type,
            role_id,
            activation_status: self.activation_status,
            q: non_blank(self.q),
        })
    }
}

pub async fn get_users<R: Repositories>(
    lang: LangCode,
    State(state): State<AppState<R>>,
    RawQuery(query): RawQuery,
) -> Result<ApiResponse<Paginated<UserSummaryResponse>>, IdentityError> {
    let query: UsersQuery = parse_query(query.as_deref())?;
    let page = PageQuery {
        page: query.page.clone(),
        page_size: query.page_size.clone(),
    }
    .page_request()?;
    let filter = query.filter()?;

    let usecase = GetUsersUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        directories: state.directory_repo(),
    };
    let users = usecase.execute(&filter, page, lang.as_str()).await?;
    Ok(ApiResponse::ok(users.map(Into::into)))
}

// ── GET users/{id} ───────────────────────────────────────────────────────────

pub async fn get_user<R: Repositories>(
    lang: LangCode,
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<UserDetailsResponse>, IdentityError> {
    let id = validation::object_id(&id)?;
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        directories: state.directory_repo(),
    };
    let details = usecase.execute(id, lang.as_str()).await?;
    Ok(ApiResponse::ok(details.into()))
}

// ── PUT users/{id} ───────────────────────────────────────────────────────────

pub async fn update_user<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Valid(body): Valid<ProfileRequest>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    let id = validation::object_id(&id)?;
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(id, body.into_profile()).await?;
    Ok(ApiResponse::ok(SuccessResponse { success: true }))
}

// ── DELETE users/{id} ────────────────────────────────────────────────────────

pub async fn delete_user<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    let id = validation::object_id(&id)?;
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(id).await?;
    Ok(ApiResponse::ok(SuccessResponse { success: true }))
}
