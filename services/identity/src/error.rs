use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use prestige_core::envelope::{ApiMessage, ApiResponse};

/// Taxonomy every [`IdentityError`] belongs to. The HTTP status is derived from
/// this and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Unauthenticated,
    Forbidden,
    Internal,
}

impl ErrorCategory {
    pub fn status(self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Identity service error variants. Each carries a stable code for clients.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    // validation
    #[error("required fields are missing or malformed")]
    RequiredFields,
    #[error("invalid email format")]
    InvalidEmailFormat,
    #[error("password must be at least 8 characters")]
    PasswordLength,
    #[error("invalid country code")]
    InvalidCountry,
    #[error("page number must be an integer")]
    InvalidPageNumberFormat,
    #[error("page size must be an integer")]
    InvalidPageSizeFormat,
    #[error("page number must be at least 1")]
    InvalidPageNumberValue,
    #[error("page size must be at least 5")]
    InvalidPageSizeValue,
    #[error("invalid object id")]
    InvalidObjectId,

    // not found
    #[error("email not found")]
    EmailNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("role not found")]
    RoleNotFound,
    #[error("permission not found")]
    PermissionNotFound,
    #[error("country not found")]
    CountryNotFound,

    // conflict
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("phone number already exists")]
    PhoneAlreadyExists,
    #[error("role already exists")]
    RoleAlreadyExists,
    #[error("invalid verification token")]
    InvalidVerificationToken,
    #[error("verification token expired")]
    VerificationTokenExpired,
    #[error("account already verified")]
    AccountAlreadyVerified,
    #[error("password not yet created")]
    PasswordNotYetCreated,
    #[error("password already created")]
    PasswordAlreadyCreated,
    #[error("invalid password reset token")]
    InvalidPasswordResetToken,
    #[error("password reset token expired")]
    PasswordResetTokenExpired,
    #[error("account not yet verified")]
    AccountNotYetVerified,

    // unauthenticated
    #[error("wrong email or password")]
    WrongCredentials,
    #[error("wrong authentication")]
    WrongAuthentication,

    // forbidden
    #[error("user is suspended")]
    SuspendedUser,
    #[error("user is banned")]
    BannedUser,
    #[error("access denied")]
    AccessDenied,
    #[error("admin accounts cannot be deleted")]
    CannotDeleteAdminAccount,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IdentityError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::RequiredFields => "RequiredFields",
            Self::InvalidEmailFormat => "InvalidEmailFormat",
            Self::PasswordLength => "PasswordLength",
            Self::InvalidCountry => "InvalidCountry",
            Self::InvalidPageNumberFormat => "InvalidPageNumberFormat",
            Self::InvalidPageSizeFormat => "InvalidPageSizeFormat",
            Self::InvalidPageNumberValue => "InvalidPageNumberValue",
            Self::InvalidPageSizeValue => "InvalidPageSizeValue",
            Self::InvalidObjectId => "InvalidObjectId",
            Self::EmailNotFound => "EmailNotFound",
            Self::UserNotFound => "UserNotFound",
            Self::RoleNotFound => "RoleNotFound",
            Self::PermissionNotFound => "PermissionNotFound",
            Self::CountryNotFound => "CountryNotFound",
            Self::EmailAlreadyExists => "EmailAlreadyExists",
            Self::PhoneAlreadyExists => "PhoneAlreadyExists",
            Self::RoleAlreadyExists => "RoleAlreadyExists",
            Self::InvalidVerificationToken => "InvalidVerificationToken",
            Self::VerificationTokenExpired => "VerificationTokenExpired",
            Self::AccountAlreadyVerified => "AccountAlreadyVerified",
            Self::PasswordNotYetCreated => "PasswordNotYetCreated",
            Self::PasswordAlreadyCreated => "PasswordAlreadyCreated",
            Self::InvalidPasswordResetToken => "InvalidPasswordResetToken",
            Self::PasswordResetTokenExpired => "PasswordResetTokenExpired",
            Self::AccountNotYetVerified => "AccountNotYetVerified",
            Self::WrongCredentials => "WrongCredentials",
            Self::WrongAuthentication => "WrongAuthentication",
            Self::SuspendedUser => "SuspendedUser",
            Self::BannedUser => "BannedUser",
            Self::AccessDenied => "AccessDenied",
            Self::CannotDeleteAdminAccount => "CannotDeleteAdminAccount",
            Self::Internal(_) => "Internal",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RequiredFields
            | Self::InvalidEmailFormat
            | Self::PasswordLength
            | Self::InvalidCountry
            | Self::InvalidPageNumberFormat
            | Self::InvalidPageSizeFormat
            | Self::InvalidPageNumberValue
            | Self::InvalidPageSizeValue
            | Self::InvalidObjectId => ErrorCategory::Validation,
            Self::EmailNotFound
            | Self::UserNotFound
            | Self::RoleNotFound
            | Self::PermissionNotFound
            | Self::CountryNotFound => ErrorCategory::NotFound,
            Self::EmailAlreadyExists
            | Self::PhoneAlreadyExists
            | Self::RoleAlreadyExists
            | Self::InvalidVerificationToken
            | Self::VerificationTokenExpired
            | Self::AccountAlreadyVerified
            | Self::PasswordNotYetCreated
            | Self::PasswordAlreadyCreated
            | Self::InvalidPasswordResetToken
            | Self::PasswordResetTokenExpired
            | Self::AccountNotYetVerified => ErrorCategory::Conflict,
            Self::WrongCredentials | Self::WrongAuthentication => ErrorCategory::Unauthenticated,
            Self::SuspendedUser
            | Self::BannedUser
            | Self::AccessDenied
            | Self::CannotDeleteAdminAccount => ErrorCategory::Forbidden,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let status = self.category().status();
        // TraceLayer already records every 4xx; only internal failures need the chain.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, code = "Internal", "internal error");
        }
        let body = ApiResponse::failure(ApiMessage::new(self.code(), self.to_string()));
        (status, Json(body)).into_response()
    }
}
