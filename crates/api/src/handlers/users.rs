//! Handlers for `/users` (admin-only staff management).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::customer::validate_email;
use comanda_core::error::CoreError;
use comanda_core::roles::validate_role;
use comanda_core::types::DbId;
use comanda_db::models::user::{CreateUser, CreateUserRequest, UpdateUser};
use comanda_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool, auth.tenant_id).await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/users
pub async fn create(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username is required".into(),
        )));
    }
    validate_email(&input.email).map_err(CoreError::Validation)?;
    validate_role(&input.role).map_err(CoreError::Validation)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            tenant_id: auth.tenant_id,
            username: username.to_string(),
            email: input.email.trim().to_string(),
            password_hash,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(
        tenant_id = auth.tenant_id,
        user_id = user.id,
        role = %user.role,
        created_by = auth.user_id,
        "User created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// PUT /api/v1/users/{id}
///
/// An admin cannot demote or deactivate themselves, which would leave the
/// tenant without anyone able to manage users.
pub async fn update(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    if let Some(email) = &input.email {
        validate_email(email).map_err(CoreError::Validation)?;
    }
    if let Some(role) = &input.role {
        validate_role(role).map_err(CoreError::Validation)?;
    }
    if id == auth.user_id
        && (input.is_active == Some(false) || input.role.as_deref().is_some_and(|r| r != auth.role))
    {
        return Err(AppError::BadRequest(
            "You cannot change your own role or deactivate yourself".into(),
        ));
    }

    let user = UserRepo::update(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(tenant_id = auth.tenant_id, user_id = id, "User updated");
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{id}
///
/// Soft-deactivates the user. Returns 204 No Content.
pub async fn deactivate(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == auth.user_id {
        return Err(AppError::BadRequest("You cannot deactivate yourself".into()));
    }
    if UserRepo::deactivate(&state.pool, auth.tenant_id, id).await? {
        tracing::info!(tenant_id = auth.tenant_id, user_id = id, "User deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}
