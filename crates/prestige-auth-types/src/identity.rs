//! Resolved principal extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use prestige_domain::account::AccountType;
use uuid::Uuid;

/// Identity resolved by the authentication gate for the current request.
///
/// The gate middleware inserts it into request extensions. Extraction returns
/// 401 on routes where no gate ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub account_type: AccountType,
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Read synchronously and return a 'static future; `async fn` here trips
    // the axum-core 0.5 `impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let principal = parts.extensions.get::<Principal>().copied();
        async move { principal.ok_or(StatusCode::UNAUTHORIZED) }
    }
}
