//! Route definitions for user management (admin only).
//!
//! ```text
//! GET    /                              list
//! POST   /                              create
//! PUT    /{id}                          update
//! DELETE /{id}                          deactivate
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User routes, mounted at `/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/{id}", put(users::update).delete(users::deactivate))
}
