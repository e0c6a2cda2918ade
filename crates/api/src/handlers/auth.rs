//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use comanda_core::error::CoreError;
use comanda_core::types::DbId;
use comanda_db::models::tenant::Tenant;
use comanda_db::models::user::User;
use comanda_db::repositories::{TenantRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{auth_cookie, clear_auth_cookie, generate_access_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub tenant_slug: String,
    pub username: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`] and returned by `/auth/me`.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub tenant_id: DbId,
    pub tenant_slug: String,
    pub tenant_name: String,
}

impl UserInfo {
    fn new(user: &User, tenant: &Tenant) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            tenant_id: tenant.id,
            tenant_slug: tenant.slug.clone(),
            tenant_name: tenant.name.clone(),
        }
    }
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with tenant slug, username and password. The token is
/// returned in the body and set as an HttpOnly cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let tenant = TenantRepo::find_by_slug(&state.pool, input.tenant_slug.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    let user = UserRepo::find_by_username(&state.pool, tenant.id, input.username.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(tenant_id = tenant.id, username = %user.username, "Failed login");
        return Err(invalid_credentials());
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let config = &state.config.jwt;
    let access_token =
        generate_access_token(user.id, tenant.id, &tenant.slug, &user.role, config)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(tenant_id = tenant.id, user_id = user.id, "User logged in");

    let cookie = auth_cookie(&access_token, config);
    let body = AuthResponse {
        access_token,
        expires_in: config.expires_in_secs(),
        user: UserInfo::new(&user, &tenant),
    };

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(body)))
}

/// POST /api/v1/auth/logout
///
/// Clears the auth cookie. Tokens are stateless, so a copied bearer token
/// stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, clear_auth_cookie(&state.config.jwt))]),
    )
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.tenant_id, auth.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let tenant = TenantRepo::find_by_id(&state.pool, auth.tenant_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tenant",
            id: auth.tenant_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserInfo::new(&user, &tenant),
    }))
}
