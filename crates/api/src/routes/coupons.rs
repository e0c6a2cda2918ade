//! Route definitions for coupons.
//!
//! ```text
//! GET    /                              list
//! POST   /                              create
//! GET    /{id}                          get_by_id
//! PUT    /{id}                          update
//! DELETE /{id}                          deactivate
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::coupons;
use crate::state::AppState;

/// Coupon routes, mounted at `/coupons`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(coupons::list).post(coupons::create))
        .route(
            "/{id}",
            get(coupons::get_by_id)
                .put(coupons::update)
                .delete(coupons::deactivate),
        )
}
