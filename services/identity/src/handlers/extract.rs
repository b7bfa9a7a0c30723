use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use prestige_domain::pagination::{PageError, PageRequest};

use crate::domain::validation::Validate;
use crate::error::IdentityError;

/// JSON body that has been parsed and then passed through [`Validate`].
///
/// Any parse failure (missing field, wrong type, bad JSON, wrong content type)
/// is reported as `RequiredFields`.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = IdentityError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!(error = %rejection, "request body rejected");
            IdentityError::RequiredFields
        })?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Parse a query string with `serde_qs`; an absent query yields `T::default()`.
pub fn parse_query<T: DeserializeOwned + Default>(
    raw_query: Option<&str>,
) -> Result<T, IdentityError> {
    let parsed = raw_query
        .filter(|q| !q.is_empty())
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| {
            debug!(error = %e, "query string rejected");
            IdentityError::RequiredFields
        })?
        .unwrap_or_default();
    Ok(parsed)
}

/// Raw `page` / `pageSize` as received, so that non-integers get their own code.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageQuery {
    pub fn page_request(&self) -> Result<PageRequest, IdentityError> {
        let defaults = PageRequest::default();
        let page = parse_int(self.page.as_deref(), defaults.page)
            .ok_or(IdentityError::InvalidPageNumberFormat)?;
        let page_size = parse_int(self.page_size.as_deref(), defaults.page_size)
            .ok_or(IdentityError::InvalidPageSizeFormat)?;

        PageRequest { page, page_size }
            .validated()
            .map_err(|e| match e {
                PageError::InvalidPage => IdentityError::InvalidPageNumberValue,
                PageError::InvalidPageSize => IdentityError::InvalidPageSizeValue,
            })
    }
}

/// Pagination plus a free-text `q`, used by the role and permission listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn page_request(&self) -> Result<PageRequest, IdentityError> {
        PageQuery {
            page: self.page.clone(),
            page_size: self.page_size.clone(),
        }
        .page_request()
    }

    pub fn q(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// `None` when present but not an integer. Negative values become 0 so that
/// range validation reports them.
fn parse_int(raw: Option<&str>, default: u64) -> Option<u64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Some(default);
    };
    raw.parse::<i64>().ok().map(|n| n.max(0) as u64)
}
