//! Route definitions for units of measure.
//!
//! ```text
//! GET    /                              list
//! POST   /                              create
//! PUT    /{id}                          update
//! DELETE /{id}                          deactivate
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::units;
use crate::state::AppState;

/// Unit routes, mounted at `/units`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(units::list).post(units::create))
        .route("/{id}", put(units::update).delete(units::deactivate))
}
