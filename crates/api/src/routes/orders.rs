//! Route definitions for order management.
//!
//! ```text
//! GET    /                              list (paginated)
//! GET    /{id}                          get_by_id
//! PUT    /{id}/status                   update_status
//! GET    /{id}/history                  history
//! GET    /{id}/tickets                  tickets
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Order routes, mounted at `/orders`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/{id}", get(orders::get_by_id))
        .route("/{id}/status", put(orders::update_status))
        .route("/{id}/history", get(orders::history))
        .route("/{id}/tickets", get(orders::tickets))
}
