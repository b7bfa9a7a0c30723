use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use prestige_auth_types::token::TokenPair;
use prestige_core::envelope::ApiResponse;
use prestige_domain::account::AccountType;

use crate::domain::validation::{self, Validate};
use crate::error::IdentityError;
use crate::handlers::extract::Valid;
use crate::handlers::profile::ProfileRequest;
use crate::handlers::{SuccessResponse, mailed};
use crate::state::{AppState, Repositories};
use crate::usecase::account::{
    CheckPasswordResetTokenUseCase, ResendVerificationTokenUseCase, ResetPasswordUseCase,
    SendPasswordResetTokenUseCase, SessionOutput, SetPasswordUseCase, SignInUseCase,
    SignUpUseCase, VerifyAccountUseCase,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub email_address: String,
}

impl Validate for EmailRequest {
    fn validate(&self) -> Result<(), IdentityError> {
        validation::email(&self.email_address)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordRequest {
    pub new_password: String,
}

impl Validate for NewPasswordRequest {
    fn validate(&self) -> Result<(), IdentityError> {
        validation::password(&self.new_password)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email_address: String,
    pub password: String,
}

impl Validate for SignInRequest {
    fn validate(&self) -> Result<(), IdentityError> {
        validation::email(&self.email_address)?;
        validation::required(&self.password)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub account_type: AccountType,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<SessionOutput> for SessionResponse {
    fn from(session: SessionOutput) -> Self {
        let TokenPair {
            access_token,
            refresh_token,
        } = session.tokens;
        Self {
            account_type: session.account_type,
            access_token,
            refresh_token,
        }
    }
}

// ── POST auth/sign-up ────────────────────────────────────────────────────────

pub async fn sign_up<R: Repositories>(
    State(state): State<AppState<R>>,
    Valid(body): Valid<ProfileRequest>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    let usecase = SignUpUseCase {
        users: state.user_repo(),
        mailer: state.mailer(),
        secrets: state.secrets.clone(),
        settings: state.settings.clone(),
    };
    let output = usecase.execute(body.into_profile()).await?;
    Ok(mailed(
        SuccessResponse {
            success: output.email_sent,
        },
        output.email_sent,
    ))
}

// ── POST auth/account-verify ─────────────────────────────────────────────────

pub async fn resend_verification_token<R: Repositories>(
    State(state): State<AppState<R>>,
    Valid(body): Valid<EmailRequest>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    let usecase = ResendVerificationTokenUseCase {
        users: state.user_repo(),
        mailer: state.mailer(),
        secrets: state.secrets.clone(),
        settings: state.settings.clone(),
    };
    let sent = usecase.execute(&body.email_address).await?;
    Ok(mailed(SuccessResponse { success: sent }, sent))
}

// ── POST auth/account-verify/{token} ─────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAccountResponse {
    pub password_reset_token: String,
}

pub async fn verify_account<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(token): Path<String>,
) -> Result<ApiResponse<VerifyAccountResponse>, IdentityError> {
    let usecase = VerifyAccountUseCase {
        users: state.user_repo(),
        secrets: state.secrets.clone(),
        settings: state.settings.clone(),
    };
    let password_reset_token = usecase.execute(&token).await?;
    Ok(ApiResponse::ok(VerifyAccountResponse {
        password_reset_token,
    }))
}

// ── POST auth/password/{token} ───────────────────────────────────────────────

pub async fn set_password<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(token): Path<String>,
    Valid(body): Valid<NewPasswordRequest>,
) -> Result<ApiResponse<SessionResponse>, IdentityError> {
    let usecase = SetPasswordUseCase {
        users: state.user_repo(),
        secrets: state.secrets.clone(),
        tokens: state.tokens.clone(),
    };
    let session = usecase.execute(&token, &body.new_password).await?;
    Ok(ApiResponse::ok(session.into()))
}

// ── POST auth/password-reset ─────────────────────────────────────────────────

pub async fn admin_send_password_reset_token<R: Repositories>(
    state: State<AppState<R>>,
    body: Valid<EmailRequest>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    send_password_reset_token(AccountType::Admin, state, body).await
}

pub async fn customer_send_password_reset_token<R: Repositories>(
    state: State<AppState<R>>,
    body: Valid<EmailRequest>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    send_password_reset_token(AccountType::Customer, state, body).await
}

async fn send_password_reset_token<R: Repositories>(
    account_type: AccountType,
    State(state): State<AppState<R>>,
    Valid(body): Valid<EmailRequest>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    let usecase = SendPasswordResetTokenUseCase {
        users: state.user_repo(),
        mailer: state.mailer(),
        secrets: state.secrets.clone(),
        settings: state.settings.clone(),
    };
    let sent = usecase.execute(account_type, &body.email_address).await?;
    Ok(mailed(SuccessResponse { success: sent }, sent))
}

// ── GET auth/password-reset/{token} ──────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTokenResponse {
    pub is_valid: bool,
}

pub async fn check_password_reset_token<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(token): Path<String>,
) -> Result<ApiResponse<CheckTokenResponse>, IdentityError> {
    let usecase = CheckPasswordResetTokenUseCase {
        users: state.user_repo(),
    };
    let is_valid = usecase.execute(&token).await?;
    Ok(ApiResponse::ok(CheckTokenResponse { is_valid }))
}

// ── POST auth/password-reset/{token} ─────────────────────────────────────────

pub async fn reset_password<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(token): Path<String>,
    Valid(body): Valid<NewPasswordRequest>,
) -> Result<ApiResponse<SuccessResponse>, IdentityError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        secrets: state.secrets.clone(),
    };
    usecase.execute(&token, &body.new_password).await?;
    Ok(ApiResponse::ok(SuccessResponse { success: true }))
}

// ── POST auth/sign-in ────────────────────────────────────────────────────────

pub async fn admin_sign_in<R: Repositories>(
    state: State<AppState<R>>,
    body: Valid<SignInRequest>,
) -> Result<ApiResponse<SessionResponse>, IdentityError> {
    sign_in(AccountType::Admin, state, body).await
}

pub async fn customer_sign_in<R: Repositories>(
    state: State<AppState<R>>,
    body: Valid<SignInRequest>,
) -> Result<ApiResponse<SessionResponse>, IdentityError> {
    sign_in(AccountType::Customer, state, body).await
}

async fn sign_in<R: Repositories>(
    account_type: AccountType,
    State(state): State<AppState<R>>,
    Valid(body): Valid<SignInRequest>,
) -> Result<ApiResponse<SessionResponse>, IdentityError> {
    let usecase = SignInUseCase {
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let session = usecase
        .execute(account_type, &body.email_address, &body.password)
        .await?;
    Ok(ApiResponse::ok(session.into()))
}
