//! Token helpers for integration tests.
//!
//! Protected routes read `x-access-token` / `x-refresh-token`. `TestTokens`
//! signs real tokens with a fixed secret so tests exercise the actual gate.

use http::{HeaderMap, HeaderName, HeaderValue};
use prestige_auth_types::headers::{ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER};
use prestige_auth_types::secret::SecretCodec;
use prestige_auth_types::token::{
    ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL, TokenClaims, TokenCodec, now_secs,
};
use prestige_domain::account::AccountType;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// 32-byte AES key used by [`test_secret_codec`].
pub const TEST_AES_KEY: [u8; 32] = *b"0123456789abcdef0123456789abcdef";

pub fn test_token_codec() -> TokenCodec {
    TokenCodec::new(TEST_JWT_SECRET, ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL)
}

pub fn test_secret_codec() -> SecretCodec {
    SecretCodec::new(TEST_AES_KEY)
}

/// Identity for which request headers are minted.
pub struct TestTokens {
    pub user_id: Uuid,
    pub account_type: AccountType,
    codec: TokenCodec,
}

impl TestTokens {
    pub fn new(user_id: Uuid, account_type: AccountType) -> Self {
        Self {
            user_id,
            account_type,
            codec: test_token_codec(),
        }
    }

    pub fn access_token(&self) -> String {
        self.codec
            .sign(self.user_id, self.account_type, false, ACCESS_TOKEN_TTL)
            .unwrap()
    }

    pub fn refresh_token(&self) -> String {
        self.codec
            .sign(self.user_id, self.account_type, true, REFRESH_TOKEN_TTL)
            .unwrap()
    }

    /// Validly signed access token whose `exp` is already in the past.
    pub fn expired_access_token(&self) -> String {
        let now = now_secs();
        self.codec
            .encode(&TokenClaims {
                sub: self.user_id.to_string(),
                act: self.account_type.scope().to_owned(),
                refresh: false,
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap()
    }

    /// Headers carrying a live access token and a refresh token.
    pub fn headers(&self) -> HeaderMap {
        self.header_map(self.access_token(), Some(self.refresh_token()))
    }

    /// Headers carrying an expired access token and a live refresh token.
    pub fn expired_headers(&self) -> HeaderMap {
        self.header_map(self.expired_access_token(), Some(self.refresh_token()))
    }

    fn header_map(&self, access: String, refresh: Option<String>) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(ACCESS_TOKEN_HEADER),
            HeaderValue::from_str(&access).unwrap(),
        );
        if let Some(refresh) = refresh {
            map.insert(
                HeaderName::from_static(REFRESH_TOKEN_HEADER),
                HeaderValue::from_str(&refresh).unwrap(),
            );
        }
        map
    }
}
