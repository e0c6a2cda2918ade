//! Route definitions for products.
//!
//! ```text
//! GET    /                              list (paginated)
//! POST   /                              create
//! PUT    /reorder                       reorder
//! GET    /{id}                          get_by_id
//! PUT    /{id}                          update
//! DELETE /{id}                          deactivate
//! PUT    /{id}/complement-groups        set_complement_groups
//! PUT    /{id}/flavors                  set_flavors
//! GET    /{id}/technical-sheet          get_technical_sheet
//! PUT    /{id}/technical-sheet          set_technical_sheet
//! GET    /{id}/cost                     cost
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Product routes, mounted at `/products`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/reorder", put(products::reorder))
        .route(
            "/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::deactivate),
        )
        .route(
            "/{id}/complement-groups",
            put(products::set_complement_groups),
        )
        .route("/{id}/flavors", put(products::set_flavors))
        .route(
            "/{id}/technical-sheet",
            get(products::get_technical_sheet).put(products::set_technical_sheet),
        )
        .route("/{id}/cost", get(products::cost))
}
