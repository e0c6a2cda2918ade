//! Handlers for `/ingredients` and manual stock adjustments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::catalog::validate_name;
use comanda_core::error::CoreError;
use comanda_core::stock::{apply_ingredient_delta, is_below_minimum};
use comanda_core::types::DbId;
use comanda_db::models::ingredient::{
    CreateIngredient, Ingredient, IngredientWithStatus, StockAdjustment, UpdateIngredient,
};
use comanda_db::repositories::IngredientRepo;
use serde::Deserialize;

use super::ensure_unit;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Ingredient";

#[derive(Debug, Deserialize)]
pub struct IngredientListParams {
    #[serde(default)]
    pub include_inactive: bool,
    /// Only ingredients at or under their minimum stock.
    #[serde(default)]
    pub below_min: bool,
}

fn with_status(ingredient: Ingredient) -> IngredientWithStatus {
    let below_min_stock = is_below_minimum(ingredient.stock_quantity, ingredient.min_stock);
    IngredientWithStatus {
        ingredient,
        below_min_stock,
    }
}

fn validate_levels(
    cost_cents: Option<i64>,
    stock_quantity: Option<f64>,
    min_stock: Option<f64>,
) -> AppResult<()> {
    if matches!(cost_cents, Some(c) if c < 0) {
        return Err(CoreError::Validation("cost_cents cannot be negative".into()).into());
    }
    if matches!(stock_quantity, Some(q) if !q.is_finite() || q < 0.0) {
        return Err(CoreError::Validation("stock_quantity cannot be negative".into()).into());
    }
    if matches!(min_stock, Some(q) if !q.is_finite() || q < 0.0) {
        return Err(CoreError::Validation("min_stock cannot be negative".into()).into());
    }
    Ok(())
}

/// GET /api/v1/ingredients
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IngredientListParams>,
) -> AppResult<impl IntoResponse> {
    let ingredients = IngredientRepo::list(
        &state.pool,
        auth.tenant_id,
        params.include_inactive,
        params.below_min,
    )
    .await?;
    let data: Vec<IngredientWithStatus> = ingredients.into_iter().map(with_status).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/ingredients/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ingredient = IngredientRepo::find_by_id(&state.pool, auth.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse {
        data: with_status(ingredient),
    }))
}

/// POST /api/v1/ingredients
pub async fn create(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateIngredient>,
) -> AppResult<impl IntoResponse> {
    validate_name(ENTITY, &input.name).map_err(CoreError::Validation)?;
    validate_levels(input.cost_cents, input.stock_quantity, input.min_stock)?;
    ensure_unit(&state, auth.tenant_id, input.unit_id).await?;

    let ingredient = IngredientRepo::create(&state.pool, auth.tenant_id, &input).await?;
    tracing::info!(
        tenant_id = auth.tenant_id,
        ingredient_id = ingredient.id,
        "Ingredient created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: with_status(ingredient),
        }),
    ))
}

/// PUT /api/v1/ingredients/{id}
///
/// Stock level is not editable here; use the stock adjustment endpoint.
pub async fn update(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIngredient>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(ENTITY, name).map_err(CoreError::Validation)?;
    }
    validate_levels(input.cost_cents, None, input.min_stock)?;
    ensure_unit(&state, auth.tenant_id, input.unit_id).await?;

    let ingredient = IngredientRepo::update(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse {
        data: with_status(ingredient),
    }))
}

/// DELETE /api/v1/ingredients/{id}
pub async fn deactivate(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if IngredientRepo::deactivate(&state.pool, auth.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}

/// POST /api/v1/ingredients/{id}/stock
///
/// Body: `{ "delta": -1.5 }`. The write only lands if the level has not
/// changed since it was read; a concurrent adjustment yields 409.
pub async fn adjust_stock(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StockAdjustment>,
) -> AppResult<impl IntoResponse> {
    let current = IngredientRepo::find_by_id(&state.pool, auth.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;

    let next = apply_ingredient_delta(current.stock_quantity, input.delta)
        .map_err(CoreError::Validation)?;

    let updated =
        IngredientRepo::set_stock(&state.pool, auth.tenant_id, id, current.stock_quantity, next)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "Stock level changed concurrently, retry the adjustment".into(),
                ))
            })?;

    let data = with_status(updated);
    if data.below_min_stock {
        tracing::warn!(
            tenant_id = auth.tenant_id,
            ingredient_id = id,
            stock_quantity = data.ingredient.stock_quantity,
            min_stock = data.ingredient.min_stock,
            "Ingredient below minimum stock"
        );
    } else {
        tracing::info!(
            tenant_id = auth.tenant_id,
            ingredient_id = id,
            delta = input.delta,
            "Ingredient stock adjusted"
        );
    }
    Ok(Json(DataResponse { data }))
}
