//! Handlers for `/coupons`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::coupon::{normalize_code, validate_definition};
use comanda_core::error::CoreError;
use comanda_core::types::DbId;
use comanda_db::models::coupon::{CreateCoupon, UpdateCoupon};
use comanda_db::repositories::CouponRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Coupon";

/// GET /api/v1/coupons
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let coupons = CouponRepo::list(&state.pool, auth.tenant_id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: coupons }))
}

/// GET /api/v1/coupons/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let coupon = CouponRepo::find_by_id(&state.pool, auth.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: coupon }))
}

/// POST /api/v1/coupons
///
/// Codes are stored uppercase; a code already used by the tenant is a 409.
pub async fn create(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateCoupon>,
) -> AppResult<impl IntoResponse> {
    validate_definition(
        &input.code,
        &input.discount_kind,
        input.discount_value,
        input.min_order_cents.unwrap_or(0),
        input.max_uses,
        input.starts_at,
        input.ends_at,
    )
    .map_err(CoreError::Validation)?;

    let code = normalize_code(&input.code);
    let coupon = CouponRepo::create(&state.pool, auth.tenant_id, &code, &input).await?;
    tracing::info!(
        tenant_id = auth.tenant_id,
        coupon_id = coupon.id,
        code = %coupon.code,
        "Coupon created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: coupon })))
}

/// PUT /api/v1/coupons/{id}
///
/// The definition is re-validated as a whole after merging the update into
/// the stored coupon.
pub async fn update(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCoupon>,
) -> AppResult<impl IntoResponse> {
    let current = CouponRepo::find_by_id(&state.pool, auth.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;

    validate_definition(
        &current.code,
        input
            .discount_kind
            .as_deref()
            .unwrap_or(&current.discount_kind),
        input.discount_value.unwrap_or(current.discount_value),
        input.min_order_cents.unwrap_or(current.min_order_cents),
        input.max_uses.unwrap_or(current.max_uses),
        input.starts_at.unwrap_or(current.starts_at),
        input.ends_at.unwrap_or(current.ends_at),
    )
    .map_err(CoreError::Validation)?;

    let coupon = CouponRepo::update(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: coupon }))
}

/// DELETE /api/v1/coupons/{id}
pub async fn deactivate(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CouponRepo::deactivate(&state.pool, auth.tenant_id, id).await? {
        tracing::info!(tenant_id = auth.tenant_id, coupon_id = id, "Coupon deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}
