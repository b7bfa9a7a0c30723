use tracing::debug;

use prestige_auth_types::headers::TokenHeaders;
use prestige_auth_types::identity::Principal;
use prestige_auth_types::token::{TokenClaims, TokenCodec, TokenError};
use prestige_core::race::first_success;
use prestige_domain::account::ActivationStatus;

use crate::domain::repository::UserRepository;
use crate::error::IdentityError;

/// Suspended and banned accounts are refused regardless of credentials.
pub fn ensure_not_blocked(status: ActivationStatus) -> Result<(), IdentityError> {
    match status {
        ActivationStatus::Suspended => Err(IdentityError::SuspendedUser),
        ActivationStatus::Banned => Err(IdentityError::BannedUser),
        ActivationStatus::Inactive | ActivationStatus::Active => Ok(()),
    }
}

/// Alternative security requirements an endpoint may accept.
///
/// Both read the same pair of request headers; they differ only in name and in
/// the scopes they demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityScheme {
    AccessToken,
    RefreshToken,
}

#[derive(Debug, Clone, Copy)]
pub struct SecurityRequirement {
    pub scheme: SecurityScheme,
    pub scopes: &'static [&'static str],
}

/// Principal plus the access token minted when the presented one had expired.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub principal: Principal,
    pub rotated_access_token: Option<String>,
}

/// Stateless per-request authentication.
pub struct AuthenticateUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: TokenCodec,
}

impl<U: UserRepository> AuthenticateUseCase<U> {
    /// Evaluate one requirement.
    pub async fn execute(
        &self,
        headers: &TokenHeaders,
        requirement: SecurityRequirement,
    ) -> Result<Authenticated, IdentityError> {
        let (claims, rotated_access_token) = self.resolve_claims(headers)?;

        let user_id = claims
            .subject()
            .ok_or(IdentityError::WrongAuthentication)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityError::WrongAuthentication)?;

        ensure_not_blocked(user.activation_status)?;

        if !requirement.scopes.contains(&claims.act.as_str()) {
            debug!(
                user_id = %user_id,
                act = %claims.act,
                scheme = ?requirement.scheme,
                "token scope not accepted"
            );
            return Err(IdentityError::AccessDenied);
        }

        Ok(Authenticated {
            principal: Principal {
                user_id,
                account_type: user.account_type,
            },
            rotated_access_token,
        })
    }

    /// Evaluate all requirements concurrently: first success wins, otherwise the
    /// last failure to complete is returned.
    pub async fn execute_any(
        &self,
        headers: &TokenHeaders,
        requirements: &[SecurityRequirement],
    ) -> Result<Authenticated, IdentityError> {
        first_success(
            requirements
                .iter()
                .map(|requirement| self.execute(headers, *requirement)),
        )
        .await
        .unwrap_or(Err(IdentityError::WrongAuthentication))
    }

    fn resolve_claims(
        &self,
        headers: &TokenHeaders,
    ) -> Result<(TokenClaims, Option<String>), IdentityError> {
        let access = headers
            .access_token
            .as_deref()
            .ok_or(IdentityError::WrongAuthentication)?;

        match self.tokens.verify(access) {
            Ok(claims) => Ok((claims, None)),
            Err(TokenError::Expired) => {
                let refresh = headers
                    .refresh_token
                    .as_deref()
                    .ok_or(IdentityError::WrongAuthentication)?;
                let (token, claims) = self.tokens.rotate(refresh).map_err(|e| {
                    debug!(error = %e, "refresh token rejected");
                    IdentityError::WrongAuthentication
                })?;
                Ok((claims, Some(token)))
            }
            Err(e) => {
                debug!(error = %e, "access token rejected");
                Err(IdentityError::WrongAuthentication)
            }
        }
    }
}
