//! Handlers for `/production-locations` (kitchen stations tickets print at).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::catalog::validate_name;
use comanda_core::error::CoreError;
use comanda_core::types::DbId;
use comanda_db::models::production_location::{
    CreateProductionLocation, UpdateProductionLocation,
};
use comanda_db::repositories::ProductionLocationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "ProductionLocation";

/// GET /api/v1/production-locations
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let locations =
        ProductionLocationRepo::list(&state.pool, auth.tenant_id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// GET /api/v1/production-locations/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let location = ProductionLocationRepo::find_by_id(&state.pool, auth.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: location }))
}

/// POST /api/v1/production-locations
pub async fn create(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateProductionLocation>,
) -> AppResult<impl IntoResponse> {
    validate_name("Production location", &input.name).map_err(CoreError::Validation)?;

    let location = ProductionLocationRepo::create(&state.pool, auth.tenant_id, &input).await?;
    tracing::info!(
        tenant_id = auth.tenant_id,
        production_location_id = location.id,
        "Production location created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// PUT /api/v1/production-locations/{id}
pub async fn update(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProductionLocation>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name("Production location", name).map_err(CoreError::Validation)?;
    }
    let location = ProductionLocationRepo::update(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: location }))
}

/// DELETE /api/v1/production-locations/{id}
///
/// Soft-deactivates the location. Items already routed to it keep their
/// snapshot.
pub async fn deactivate(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProductionLocationRepo::deactivate(&state.pool, auth.tenant_id, id).await? {
        tracing::info!(
            tenant_id = auth.tenant_id,
            production_location_id = id,
            "Production location deactivated"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}
