//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use comanda_core::error::CoreError;
use comanda_core::types::DbId;

use super::tenant::{tenant_slug, TENANT_HEADER};
use crate::auth::jwt::{cookie_value, validate_token};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated staff user.
///
/// The token is read from the auth cookie, falling back to an
/// `Authorization: Bearer` header. The `x-tenant` header must name the same
/// tenant the token was issued for.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user_id, tenant_id = auth.tenant_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The tenant every query of this request is scoped to.
    pub tenant_id: DbId,
    pub tenant_slug: String,
    /// The user's role name (`"admin"`, `"manager"`, `"staff"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let config = &state.config.jwt;

        let from_cookie = parts
            .headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|header| cookie_value(header, &config.cookie_name));

        let from_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "));

        let token = from_cookie.or(from_header).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing authentication token".into(),
            ))
        })?;

        let claims = validate_token(token, config).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        match tenant_slug(parts) {
            Some(slug) if slug == claims.tenant_slug => {}
            Some(_) => {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Token was not issued for this tenant".into(),
                )));
            }
            None => {
                return Err(AppError::Core(CoreError::Forbidden(format!(
                    "Missing {TENANT_HEADER} header"
                ))));
            }
        }

        Ok(AuthUser {
            user_id: claims.sub,
            tenant_id: claims.tenant_id,
            tenant_slug: claims.tenant_slug,
            role: claims.role,
        })
    }
}
