//! Page requests and paginated result envelopes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted `pageSize`.
pub const MIN_PAGE_SIZE: u64 = 5;

/// Largest `pageSize` served; larger requests are clamped.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination parameters shared across all list endpoints.
///
/// - `page`: ≥ 1, default 1
/// - `pageSize`: ≥ 5, default 10, clamped to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page must be at least 1")]
    InvalidPage,
    #[error("page size must be at least {MIN_PAGE_SIZE}")]
    InvalidPageSize,
}

impl PageRequest {
    /// Reject out-of-range values and clamp `page_size` to [`MAX_PAGE_SIZE`].
    pub fn validated(self) -> Result<Self, PageError> {
        if self.page < 1 {
            return Err(PageError::InvalidPage);
        }
        if self.page_size < MIN_PAGE_SIZE {
            return Err(PageError::InvalidPageSize);
        }
        Ok(Self {
            page: self.page,
            page_size: self.page_size.min(MAX_PAGE_SIZE),
        })
    }

    /// Row offset of the first item on this page. Saturates at `i64::MAX`, the
    /// largest OFFSET a Postgres `bigint` accepts, so huge pages read as empty.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(i64::MAX as u64)
    }
}

/// Pagination block returned alongside list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub page_count: u64,
    pub total_count: u64,
}

impl Pagination {
    pub fn new(request: PageRequest, total_count: u64) -> Self {
        Self {
            page: request.page,
            page_size: request.page_size,
            page_count: total_count.div_ceil(request.page_size.max(1)),
            total_count,
        }
    }
}

/// `{items, pagination}` list body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total_count),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
