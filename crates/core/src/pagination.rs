//! Page/limit/sort handling shared by every paginated list endpoint.

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard upper bound on rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset for a 1-based page.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1) * limit
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A validated sort column plus direction.
///
/// The column is always one of the caller's whitelisted names, so it is
/// safe to interpolate into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Render as an `ORDER BY` fragment (without the keywords).
    pub fn to_sql(self) -> String {
        format!("{} {}", self.column, self.direction.as_sql())
    }
}

/// Parse a `sort` query value such as `name` or `-price_cents`.
///
/// A leading `-` means descending. `None` or an empty string yields
/// `default`. Columns outside `allowed` are rejected.
pub fn parse_sort(
    sort: Option<&str>,
    allowed: &[&'static str],
    default: SortSpec,
) -> Result<SortSpec, String> {
    let raw = match sort.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(s) => s,
    };

    let (name, direction) = match raw.strip_prefix('-') {
        Some(rest) => (rest, SortDirection::Desc),
        None => (raw, SortDirection::Asc),
    };

    allowed
        .iter()
        .find(|c| **c == name)
        .map(|column| SortSpec { column, direction })
        .ok_or_else(|| {
            format!(
                "Invalid sort field '{name}'. Must be one of: {}",
                allowed.join(", ")
            )
        })
}
