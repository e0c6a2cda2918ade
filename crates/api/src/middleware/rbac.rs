//! Role gates layered on [`AuthUser`].
//!
//! Staff can read the catalog and work orders. Managers also edit the
//! catalog, delivery areas, coupons and store settings. Only admins manage
//! staff accounts.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use comanda_core::error::CoreError;
use comanda_core::roles::{is_manager_or_above, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: fn(&str) -> bool,
    action: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if allowed(&user.role) {
        return Ok(user);
    }
    tracing::debug!(
        tenant_id = user.tenant_id,
        user_id = user.user_id,
        role = %user.role,
        path = %parts.uri.path(),
        "Role check denied"
    );
    Err(AppError::Core(CoreError::Forbidden(format!(
        "Role '{}' cannot {action}",
        user.role
    ))))
}

/// Admin only: staff account management.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, |role| role == ROLE_ADMIN, "manage staff accounts")
            .await
            .map(RequireAdmin)
    }
}

/// Manager or admin: catalog, delivery setup and store settings.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, is_manager_or_above, "change store configuration")
            .await
            .map(RequireManager)
    }
}
