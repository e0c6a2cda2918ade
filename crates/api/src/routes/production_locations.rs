//! Route definitions for production locations.
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

use crate::handlers::production_locations;
use crate::state::AppState;

/// Production location routes, mounted at `/production-locations`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(production_locations::list).post(production_locations::create),
        )
        .route(
            "/{id}",
            get(production_locations::get_by_id)
                .put(production_locations::update)
                .delete(production_locations::deactivate),
        )
}
