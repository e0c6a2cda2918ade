//! Route definitions for payment methods.
//!
//! ```text
//! GET    /                              list
//! POST   /                              create
//! PUT    /{id}                          update
//! DELETE /{id}                          deactivate
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::payment_methods;
use crate::state::AppState;

/// Payment method routes, mounted at `/payment-methods`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(payment_methods::list).post(payment_methods::create),
        )
        .route(
            "/{id}",
            put(payment_methods::update).delete(payment_methods::deactivate),
        )
}
