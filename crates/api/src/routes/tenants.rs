//! Route definitions for tenants.
//!
//! ```text
//! TENANTS:
//! POST   /                              create (public bootstrap)
//!
//! TENANT:
//! GET    /                              get_current
//! PUT    /                              update_current (admin or manager)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tenants;
use crate::state::AppState;

/// Tenant bootstrap, mounted at `/tenants`.
pub fn bootstrap_router() -> Router<AppState> {
    Router::new().route("/", post(tenants::create))
}

/// Settings of the caller's own tenant, mounted at `/tenant`.
pub fn current_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(tenants::get_current).put(tenants::update_current),
    )
}
