//! Handlers for `/units` (units of measure).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::catalog::{validate_name, validate_unit_symbol};
use comanda_core::error::CoreError;
use comanda_core::types::DbId;
use comanda_db::models::unit::{CreateUnit, UpdateUnit};
use comanda_db::repositories::UnitRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/units
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let units = UnitRepo::list(&state.pool, auth.tenant_id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: units }))
}

/// POST /api/v1/units
///
/// A symbol already used by the tenant is a 409.
pub async fn create(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateUnit>,
) -> AppResult<impl IntoResponse> {
    validate_name("Unit", &input.name).map_err(CoreError::Validation)?;
    validate_unit_symbol(&input.symbol).map_err(CoreError::Validation)?;

    let unit = UnitRepo::create(&state.pool, auth.tenant_id, &input).await?;
    tracing::info!(tenant_id = auth.tenant_id, unit_id = unit.id, "Unit created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: unit })))
}

/// PUT /api/v1/units/{id}
pub async fn update(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUnit>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name("Unit", name).map_err(CoreError::Validation)?;
    }
    if let Some(symbol) = &input.symbol {
        validate_unit_symbol(symbol).map_err(CoreError::Validation)?;
    }
    let unit = UnitRepo::update(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Unit", id }))?;
    Ok(Json(DataResponse { data: unit }))
}

/// DELETE /api/v1/units/{id}
pub async fn deactivate(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if UnitRepo::deactivate(&state.pool, auth.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Unit", id }))
    }
}
