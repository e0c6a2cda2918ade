//! Route definitions for the public storefront.
//!
//! No authentication; every request carries the `x-tenant` header.
//!
//! ```text
//! GET    /tenant                        tenant_info
//! GET    /menu                          menu
//! GET    /cities                        cities
//! GET    /cities/{id}/neighborhoods     neighborhoods
//! GET    /payment-methods               payment_methods
//! POST   /checkout/delivery-fee         delivery_fee
//! POST   /checkout/coupon               check_coupon
//! POST   /orders                        place_order
//! GET    /orders/{tracking_code}        track_order
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::delivery;
use crate::state::AppState;

/// Storefront routes, mounted at `/delivery`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tenant", get(delivery::tenant_info))
        .route("/menu", get(delivery::menu))
        .route("/cities", get(delivery::cities))
        .route("/cities/{id}/neighborhoods", get(delivery::neighborhoods))
        .route("/payment-methods", get(delivery::payment_methods))
        .route("/checkout/delivery-fee", post(delivery::delivery_fee))
        .route("/checkout/coupon", post(delivery::check_coupon))
        .route("/orders", post(delivery::place_order))
        .route("/orders/{tracking_code}", get(delivery::track_order))
}
