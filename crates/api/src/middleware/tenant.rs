//! Tenant resolution from the `x-tenant` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use comanda_db::models::tenant::Tenant;
use comanda_db::repositories::TenantRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the tenant slug on every tenant-scoped request.
pub const TENANT_HEADER: &str = "x-tenant";

/// Read the tenant slug from the request headers.
pub fn tenant_slug(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Tenant resolved from the `x-tenant` slug, for the public delivery routes.
///
/// A missing header is a 400; an unknown slug is a 404.
///
/// ```ignore
/// async fn menu(PublicTenant(tenant): PublicTenant) -> AppResult<Json<()>> {
///     tracing::debug!(tenant_id = tenant.id, "serving menu");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PublicTenant(pub Tenant);

impl FromRequestParts<AppState> for PublicTenant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let slug = tenant_slug(parts)
            .ok_or_else(|| AppError::BadRequest(format!("Missing {TENANT_HEADER} header")))?;

        let tenant = TenantRepo::find_by_slug(&state.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tenant '{slug}' not found")))?;

        Ok(PublicTenant(tenant))
    }
}
