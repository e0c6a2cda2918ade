//! Route definitions for categories.
//!
//! ```text
//! GET    /                              list
//! POST   /                              create
//! GET    /tree                          tree
//! PUT    /reorder                       reorder
//! GET    /{id}                          get_by_id
//! PUT    /{id}                          update
//! DELETE /{id}                          deactivate
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category routes, mounted at `/categories`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route("/tree", get(categories::tree))
        .route("/reorder", put(categories::reorder))
        .route(
            "/{id}",
            get(categories::get_by_id)
                .put(categories::update)
                .delete(categories::deactivate),
        )
}
