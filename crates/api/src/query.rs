//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use comanda_core::error::CoreError;
use comanda_core::pagination::{
    clamp_limit, clamp_page, page_offset, parse_sort, SortSpec, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use serde::Deserialize;

use crate::error::AppError;

/// Pagination and sorting parameters (`?page=&limit=&sort=`).
///
/// `page` is 1-based. `sort` names a column, with a leading `-` for
/// descending order.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

/// Clamped pagination plus a whitelisted sort.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
    pub sort: SortSpec,
}

impl PaginationParams {
    /// Clamp page and limit and validate `sort` against `allowed` columns.
    ///
    /// An unknown sort column is a validation error.
    pub fn resolve(
        &self,
        allowed: &[&'static str],
        default_sort: SortSpec,
    ) -> Result<PageRequest, AppError> {
        let page = clamp_page(self.page);
        let limit = clamp_limit(self.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let sort =
            parse_sort(self.sort.as_deref(), allowed, default_sort).map_err(CoreError::Validation)?;
        Ok(PageRequest {
            page,
            limit,
            offset: page_offset(page, limit),
            sort,
        })
    }
}

/// Query parameters for list endpoints that support an `include_inactive` flag.
///
/// Used by every entity with soft-deactivation.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}
