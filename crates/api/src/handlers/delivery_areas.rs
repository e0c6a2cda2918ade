//! Handlers for the delivery area table: `/cities` and `/neighborhoods`.
//!
//! A neighborhood without its own fee inherits the city's default fee.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::catalog::validate_name;
use comanda_core::delivery_fee::{validate_fee, validate_state};
use comanda_core::error::CoreError;
use comanda_core::types::{Cents, DbId};
use comanda_db::models::delivery_area::{
    CreateCity, CreateNeighborhood, UpdateCity, UpdateNeighborhood,
};
use comanda_db::repositories::DeliveryAreaRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

const CITY: &str = "City";
const NEIGHBORHOOD: &str = "Neighborhood";

fn validate_min_order(min_order_cents: Option<Cents>) -> AppResult<()> {
    if matches!(min_order_cents, Some(m) if m < 0) {
        return Err(CoreError::Validation("min_order_cents cannot be negative".into()).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cities
// ---------------------------------------------------------------------------

/// GET /api/v1/cities
pub async fn list_cities(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let cities =
        DeliveryAreaRepo::list_cities(&state.pool, auth.tenant_id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: cities }))
}

/// POST /api/v1/cities
pub async fn create_city(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateCity>,
) -> AppResult<impl IntoResponse> {
    validate_name(CITY, &input.name).map_err(CoreError::Validation)?;
    validate_state(&input.state).map_err(CoreError::Validation)?;
    validate_fee(input.delivery_fee_cents.unwrap_or(0)).map_err(CoreError::Validation)?;

    let city = DeliveryAreaRepo::create_city(&state.pool, auth.tenant_id, &input).await?;
    tracing::info!(tenant_id = auth.tenant_id, city_id = city.id, "City created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: city })))
}

/// PUT /api/v1/cities/{id}
pub async fn update_city(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCity>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(CITY, name).map_err(CoreError::Validation)?;
    }
    if let Some(uf) = &input.state {
        validate_state(uf).map_err(CoreError::Validation)?;
    }
    if let Some(fee) = input.delivery_fee_cents {
        validate_fee(fee).map_err(CoreError::Validation)?;
    }
    let city = DeliveryAreaRepo::update_city(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: CITY, id }))?;
    Ok(Json(DataResponse { data: city }))
}

/// DELETE /api/v1/cities/{id}
///
/// An inactive city makes all of its neighborhoods undeliverable.
pub async fn deactivate_city(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if DeliveryAreaRepo::deactivate_city(&state.pool, auth.tenant_id, id).await? {
        tracing::info!(tenant_id = auth.tenant_id, city_id = id, "City deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: CITY, id }))
    }
}

// ---------------------------------------------------------------------------
// Neighborhoods
// ---------------------------------------------------------------------------

/// GET /api/v1/cities/{id}/neighborhoods
pub async fn list_neighborhoods(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(city_id): Path<DbId>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    ensure_city(&state, auth.tenant_id, city_id).await?;
    let neighborhoods = DeliveryAreaRepo::list_neighborhoods(
        &state.pool,
        auth.tenant_id,
        city_id,
        params.include_inactive,
    )
    .await?;
    Ok(Json(DataResponse { data: neighborhoods }))
}

/// POST /api/v1/cities/{id}/neighborhoods
pub async fn create_neighborhood(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(city_id): Path<DbId>,
    Json(input): Json<CreateNeighborhood>,
) -> AppResult<impl IntoResponse> {
    validate_name(NEIGHBORHOOD, &input.name).map_err(CoreError::Validation)?;
    if let Some(fee) = input.delivery_fee_cents {
        validate_fee(fee).map_err(CoreError::Validation)?;
    }
    validate_min_order(input.min_order_cents)?;
    ensure_city(&state, auth.tenant_id, city_id).await?;

    let neighborhood =
        DeliveryAreaRepo::create_neighborhood(&state.pool, auth.tenant_id, city_id, &input).await?;
    tracing::info!(
        tenant_id = auth.tenant_id,
        city_id,
        neighborhood_id = neighborhood.id,
        "Neighborhood created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: neighborhood })))
}

/// PUT /api/v1/neighborhoods/{id}
///
/// `delivery_fee_cents: null` clears the override so the city fee applies.
pub async fn update_neighborhood(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNeighborhood>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(NEIGHBORHOOD, name).map_err(CoreError::Validation)?;
    }
    if let Some(Some(fee)) = input.delivery_fee_cents {
        validate_fee(fee).map_err(CoreError::Validation)?;
    }
    validate_min_order(input.min_order_cents)?;

    let neighborhood = DeliveryAreaRepo::update_neighborhood(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: NEIGHBORHOOD,
            id,
        }))?;
    Ok(Json(DataResponse { data: neighborhood }))
}

/// DELETE /api/v1/neighborhoods/{id}
pub async fn deactivate_neighborhood(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if DeliveryAreaRepo::deactivate_neighborhood(&state.pool, auth.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: NEIGHBORHOOD,
            id,
        }))
    }
}

async fn ensure_city(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<()> {
    DeliveryAreaRepo::find_city(&state.pool, tenant_id, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound { entity: CITY, id }))
}
