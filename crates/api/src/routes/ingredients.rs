//! Route definitions for ingredients.
//!
//! ```text
//! GET    /                              list
//! POST   /                              create
//! GET    /{id}                          get_by_id
//! PUT    /{id}                          update
//! DELETE /{id}                          deactivate
//! POST   /{id}/stock                    adjust_stock
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ingredients;
use crate::state::AppState;

/// Ingredient routes, mounted at `/ingredients`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ingredients::list).post(ingredients::create))
        .route(
            "/{id}",
            get(ingredients::get_by_id)
                .put(ingredients::update)
                .delete(ingredients::deactivate),
        )
        .route("/{id}/stock", post(ingredients::adjust_stock))
}
