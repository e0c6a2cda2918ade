//! Route definitions for complement groups and their complements.
//!
//! ```text
//! GET    /                                       list
//! POST   /                                       create
//! GET    /{id}                                   get_by_id
//! PUT    /{id}                                   update
//! DELETE /{id}                                   deactivate
//! POST   /{id}/complements                       add_complement
//! PUT    /{id}/complements/{complement_id}       update_complement
//! DELETE /{id}/complements/{complement_id}       deactivate_complement
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::complement_groups;
use crate::state::AppState;

/// Complement group routes, mounted at `/complement-groups`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(complement_groups::list).post(complement_groups::create),
        )
        .route(
            "/{id}",
            get(complement_groups::get_by_id)
                .put(complement_groups::update)
                .delete(complement_groups::deactivate),
        )
        .route("/{id}/complements", post(complement_groups::add_complement))
        .route(
            "/{id}/complements/{complement_id}",
            put(complement_groups::update_complement)
                .delete(complement_groups::deactivate_complement),
        )
}
