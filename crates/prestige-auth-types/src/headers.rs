//! Request-metadata header names and the language header extractor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::HeaderMap;
use http::request::Parts;

/// Access token header (request), and rotated access token (response).
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Refresh token header.
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Preferred language for localized directory names.
pub const LANG_CODE_HEADER: &str = "x-lang-code";

pub const DEFAULT_LANG_CODE: &str = "en";

/// Raw bearer tokens presented on a request. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenHeaders {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

impl TokenHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            access_token: header_str(headers, ACCESS_TOKEN_HEADER),
            refresh_token: header_str(headers, REFRESH_TOKEN_HEADER),
        }
    }
}

/// Value of `x-lang-code`, defaulting to `en`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangCode(pub String);

impl Default for LangCode {
    fn default() -> Self {
        Self(DEFAULT_LANG_CODE.to_owned())
    }
}

impl LangCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for LangCode
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let lang = header_str(&parts.headers, LANG_CODE_HEADER)
            .map(|s| s.to_ascii_lowercase())
            .map(LangCode)
            .unwrap_or_default();
        async move { Ok(lang) }
    }
}
