//! Request guards: the authentication gate and the per-route permission check.
//!
//! Both run as `route_layer` middleware so that the order is always
//! authenticate → permission check → body validation inside the handler.

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use prestige_auth_types::headers::{ACCESS_TOKEN_HEADER, TokenHeaders};
use prestige_auth_types::identity::Principal;
use prestige_domain::access::PermissionCode;

use crate::error::IdentityError;
use crate::state::{AppState, Repositories};
use crate::usecase::gate::{AuthenticateUseCase, SecurityRequirement, SecurityScheme};
use crate::usecase::permission::EvaluatePermissionUseCase;

pub const ADMIN_SECURITY: &[SecurityRequirement] = &[
    SecurityRequirement {
        scheme: SecurityScheme::AccessToken,
        scopes: &["admin"],
    },
    SecurityRequirement {
        scheme: SecurityScheme::RefreshToken,
        scopes: &["admin"],
    },
];

pub const CUSTOMER_SECURITY: &[SecurityRequirement] = &[
    SecurityRequirement {
        scheme: SecurityScheme::AccessToken,
        scopes: &["customer"],
    },
    SecurityRequirement {
        scheme: SecurityScheme::RefreshToken,
        scopes: &["customer"],
    },
];

pub async fn admin_gate<R: Repositories>(
    State(state): State<AppState<R>>,
    request: Request,
    next: Next,
) -> Result<Response, IdentityError> {
    authenticate(&state, ADMIN_SECURITY, request, next).await
}

pub async fn customer_gate<R: Repositories>(
    State(state): State<AppState<R>>,
    request: Request,
    next: Next,
) -> Result<Response, IdentityError> {
    authenticate(&state, CUSTOMER_SECURITY, request, next).await
}

async fn authenticate<R: Repositories>(
    state: &AppState<R>,
    requirements: &[SecurityRequirement],
    mut request: Request,
    next: Next,
) -> Result<Response, IdentityError> {
    let headers = TokenHeaders::from_headers(request.headers());
    let usecase = AuthenticateUseCase {
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let authenticated = usecase.execute_any(&headers, requirements).await?;

    request.extensions_mut().insert(authenticated.principal);
    let mut response = next.run(request).await;

    if let Some(token) = authenticated.rotated_access_token {
        if let Ok(value) = HeaderValue::from_str(&token) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), value);
        }
    }
    Ok(response)
}

/// Permission check for one route. State is the app state plus the code the
/// route requires.
pub async fn require_permission<R: Repositories>(
    State((state, code)): State<(AppState<R>, PermissionCode)>,
    request: Request,
    next: Next,
) -> Result<Response, IdentityError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .copied()
        .ok_or(IdentityError::WrongAuthentication)?;

    let method = request.method().clone();

    let usecase = EvaluatePermissionUseCase {
        users: state.user_repo(),
        permissions: state.permission_repo(),
    };
    usecase.execute(principal.user_id, code, &method).await?;
    Ok(next.run(request).await)
}
