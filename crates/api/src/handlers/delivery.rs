//! Public storefront handlers under `/delivery`.
//!
//! No login; the tenant comes from the `x-tenant` slug via
//! [`PublicTenant`]. Only active records are ever exposed here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::checkout::validate_quoted_amount;
use comanda_core::error::CoreError;
use comanda_core::types::{Cents, DbId};
use comanda_db::models::order::PlaceOrderOutcome;
use comanda_db::models::tenant::Tenant;
use comanda_db::repositories::{DeliveryAreaRepo, OrderRepo, PaymentMethodRepo, ProductRepo};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::tenant::PublicTenant;
use crate::ordering::{apply_coupon, price_order, quote_delivery, PlaceOrderRequest};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Storefront view of a tenant.
#[derive(Debug, Serialize)]
pub struct TenantInfo {
    pub name: String,
    pub slug: String,
    pub phone: Option<String>,
    pub is_open: bool,
    pub delivery_enabled: bool,
    pub pickup_enabled: bool,
    pub min_order_cents: Cents,
    pub estimated_delivery_mins: i32,
}

impl From<Tenant> for TenantInfo {
    fn from(t: Tenant) -> Self {
        Self {
            name: t.name,
            slug: t.slug,
            phone: t.phone,
            is_open: t.is_open,
            delivery_enabled: t.delivery_enabled,
            pickup_enabled: t.pickup_enabled,
            min_order_cents: t.min_order_cents,
            estimated_delivery_mins: t.estimated_delivery_mins,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeliveryFeeRequest {
    pub neighborhood_id: DbId,
    pub subtotal_cents: Cents,
}

#[derive(Debug, Serialize)]
pub struct DeliveryFeeResponse {
    pub fee_cents: Cents,
    pub min_order_cents: Cents,
    pub estimated_delivery_mins: i32,
}

#[derive(Debug, Deserialize)]
pub struct CouponCheckRequest {
    pub code: String,
    pub subtotal_cents: Cents,
    #[serde(default)]
    pub delivery_fee_cents: Cents,
}

/// What a customer may see of a coupon.
#[derive(Debug, Serialize)]
pub struct CouponPreview {
    pub code: String,
    pub discount_kind: String,
    pub discount_value: i64,
}

#[derive(Debug, Serialize)]
pub struct CouponCheckResponse {
    pub coupon: CouponPreview,
    pub discount_cents: Cents,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/delivery/tenant
pub async fn tenant_info(PublicTenant(tenant): PublicTenant) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: TenantInfo::from(tenant),
    }))
}

/// GET /api/v1/delivery/menu
///
/// Active categories with their active, delivery-available products.
pub async fn menu(
    PublicTenant(tenant): PublicTenant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let sections = ProductRepo::menu(&state.pool, tenant.id).await?;
    Ok(Json(DataResponse { data: sections }))
}

/// GET /api/v1/delivery/cities
pub async fn cities(
    PublicTenant(tenant): PublicTenant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let cities = DeliveryAreaRepo::list_cities(&state.pool, tenant.id, false).await?;
    Ok(Json(DataResponse { data: cities }))
}

/// GET /api/v1/delivery/cities/{id}/neighborhoods
pub async fn neighborhoods(
    PublicTenant(tenant): PublicTenant,
    State(state): State<AppState>,
    Path(city_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    DeliveryAreaRepo::find_city(&state.pool, tenant.id, city_id)
        .await?
        .filter(|c| c.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "City",
            id: city_id,
        }))?;
    let neighborhoods =
        DeliveryAreaRepo::list_neighborhoods(&state.pool, tenant.id, city_id, false).await?;
    Ok(Json(DataResponse { data: neighborhoods }))
}

/// GET /api/v1/delivery/payment-methods
pub async fn payment_methods(
    PublicTenant(tenant): PublicTenant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let methods = PaymentMethodRepo::list(&state.pool, tenant.id, false).await?;
    Ok(Json(DataResponse { data: methods }))
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

/// POST /api/v1/delivery/checkout/delivery-fee
pub async fn delivery_fee(
    PublicTenant(tenant): PublicTenant,
    State(state): State<AppState>,
    Json(input): Json<DeliveryFeeRequest>,
) -> AppResult<impl IntoResponse> {
    validate_quoted_amount("subtotal_cents", input.subtotal_cents)
        .map_err(CoreError::Validation)?;
    let quote =
        quote_delivery(&state.pool, &tenant, input.neighborhood_id, input.subtotal_cents).await?;
    Ok(Json(DataResponse {
        data: DeliveryFeeResponse {
            fee_cents: quote.fee_cents,
            min_order_cents: quote.min_order_cents,
            estimated_delivery_mins: tenant.estimated_delivery_mins,
        },
    }))
}

/// POST /api/v1/delivery/checkout/coupon
///
/// Preview only; the coupon is consumed when the order is placed.
pub async fn check_coupon(
    PublicTenant(tenant): PublicTenant,
    State(state): State<AppState>,
    Json(input): Json<CouponCheckRequest>,
) -> AppResult<impl IntoResponse> {
    validate_quoted_amount("subtotal_cents", input.subtotal_cents)
        .map_err(CoreError::Validation)?;
    validate_quoted_amount("delivery_fee_cents", input.delivery_fee_cents)
        .map_err(CoreError::Validation)?;
    let (coupon, discount_cents) = apply_coupon(
        &state.pool,
        tenant.id,
        &input.code,
        input.subtotal_cents,
        input.delivery_fee_cents,
    )
    .await?;
    Ok(Json(DataResponse {
        data: CouponCheckResponse {
            coupon: CouponPreview {
                code: coupon.code,
                discount_kind: coupon.discount_kind,
                discount_value: coupon.discount_value,
            },
            discount_cents,
        },
    }))
}

/// POST /api/v1/delivery/orders
///
/// Prices the cart from the catalog, then persists customer, address, items
/// and stock/coupon consumption in one transaction. Returns the order with
/// its `tracking_code`.
pub async fn place_order(
    PublicTenant(tenant): PublicTenant,
    State(state): State<AppState>,
    Json(input): Json<PlaceOrderRequest>,
) -> AppResult<impl IntoResponse> {
    let new_order = price_order(&state.pool, &tenant, &input).await?;

    let order = match OrderRepo::place(&state.pool, &new_order).await? {
        PlaceOrderOutcome::Placed(order) => order,
        PlaceOrderOutcome::OutOfStock { product_id } => {
            tracing::warn!(tenant_id = tenant.id, product_id, "Checkout lost stock race");
            return Err(AppError::Core(CoreError::Validation(format!(
                "Product {product_id} is out of stock"
            ))));
        }
        PlaceOrderOutcome::CouponUnavailable => {
            return Err(AppError::Core(CoreError::Validation(
                "Coupon is no longer available".into(),
            )));
        }
    };

    tracing::info!(
        tenant_id = tenant.id,
        order_id = order.id,
        number = order.number,
        order_type = %order.order_type,
        total_cents = order.total_cents,
        "Order placed"
    );

    let detail = OrderRepo::detail(&state.pool, order).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/delivery/orders/{tracking_code}
pub async fn track_order(
    PublicTenant(tenant): PublicTenant,
    State(state): State<AppState>,
    Path(tracking_code): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let order = OrderRepo::find_by_tracking_code(&state.pool, tenant.id, tracking_code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order '{tracking_code}' not found")))?;
    let detail = OrderRepo::detail(&state.pool, order).await?;
    Ok(Json(DataResponse { data: detail }))
}
