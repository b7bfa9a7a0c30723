//! Bearer token signing, verification and refresh-driven rotation.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use prestige_domain::account::AccountType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access-token lifetime in seconds (4 hours).
pub const ACCESS_TOKEN_TTL: u64 = 14400;

/// Default refresh-token lifetime in seconds (7 days).
pub const REFRESH_TOKEN_TTL: u64 = 604800;

/// Errors returned by [`TokenCodec`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
    #[error("not a refresh token")]
    NotRefreshToken,
    #[error("failed to encode token: {0}")]
    Encode(String),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID (UUID string) |
/// | `act` | custom | lowercase account type, matched against required scopes |
/// | `refresh` | `ref` | `true` for refresh tokens |
/// | `iat` | `iat` | issued-at, seconds since epoch |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub act: String,
    #[serde(rename = "ref")]
    pub refresh: bool,
    pub iat: u64,
    pub exp: u64,
}

impl TokenClaims {
    pub fn subject(&self) -> Option<Uuid> {
        self.sub.parse().ok()
    }

    pub fn account_type(&self) -> Option<AccountType> {
        AccountType::from_scope(&self.act)
    }
}

/// Access + refresh pair handed out on sign-in and password creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// HS256 token codec built once at start-up from the signing secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: u64,
    refresh_ttl: u64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl TokenCodec {
    pub fn new(secret: &str, access_ttl: u64, refresh_ttl: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_ttl(&self) -> u64 {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> u64 {
        self.refresh_ttl
    }

    /// Encode arbitrary claims. Prefer [`TokenCodec::sign`] outside of tests.
    pub fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Sign a token for `subject` that expires at `now + ttl`.
    pub fn sign(
        &self,
        subject: Uuid,
        account_type: AccountType,
        refresh: bool,
        ttl: u64,
    ) -> Result<String, TokenError> {
        self.encode(&Self::claims(subject, account_type.scope(), refresh, ttl))
    }

    /// Fresh access + refresh pair with the configured lifetimes.
    pub fn issue_pair(
        &self,
        subject: Uuid,
        account_type: AccountType,
    ) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign(subject, account_type, false, self.access_ttl)?,
            refresh_token: self.sign(subject, account_type, true, self.refresh_ttl)?,
        })
    }

    /// Check signature and expiry. No other claim validation happens here.
    ///
    /// Leeway is zero: a token is expired once `exp` has passed.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Mint a new access token from a valid refresh token.
    ///
    /// The refresh token itself is never re-issued.
    pub fn rotate(&self, refresh_token: &str) -> Result<(String, TokenClaims), TokenError> {
        let refresh = self.verify(refresh_token)?;
        if !refresh.refresh {
            return Err(TokenError::NotRefreshToken);
        }
        let claims = TokenClaims {
            sub: refresh.sub,
            act: refresh.act,
            refresh: false,
            iat: now_secs(),
            exp: now_secs() + self.access_ttl,
        };
        let token = self.encode(&claims)?;
        Ok((token, claims))
    }

    fn claims(subject: Uuid, act: &str, refresh: bool, ttl: u64) -> TokenClaims {
        let iat = now_secs();
        TokenClaims {
            sub: subject.to_string(),
            act: act.to_owned(),
            refresh,
            iat,
            exp: iat + ttl,
        }
    }
}
