use axum::extract::State;

use prestige_auth_types::headers::LangCode;
use prestige_auth_types::identity::Principal;
use prestige_core::envelope::ApiResponse;

use crate::error::IdentityError;
use crate::handlers::SuccessResponse;
use crate::handlers::extract::Valid;
use crate::handlers::profile::{ProfileRequest, UserDetailsResponse};
use crate::state::{AppState, Repositories};
use crate::usecase::user::{GetUserUseCase, UpdateUserUseCase};

// ── GET me ───────────────────────────────────────────────────────────────────

pub async fn get_me<R: Repositories>(
    principal: Principal,
    lang: LangCode,
    State(state): State<AppState<R>>,
) -> Result<ApiResponse<UserDetailsResponse>, IdentityError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        directories: state.directory_repo(),
    };
    let details = usecase.execute(principal.user_id, lang.as_str()).await?;
    Ok(ApiResponse::ok(details.into()))
}

// ── PUT me ───────────────────────────────────────────────────────────────────

pub async fn update_me<R: Repositories>(
    principal: Principal,
    State(state): State<AppState<R>>,
    Valid(body): Valid<ProfileRequest>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(principal.user_id, body.into_profile())
        .await?;
    Ok(ApiResponse::ok(SuccessResponse { success: true }))
}
