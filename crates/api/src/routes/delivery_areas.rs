//! Route definitions for the delivery area table.
//!
//! Provides two routers:
//! - `city_router()` mounted at `/cities`
//! - `neighborhood_router()` mounted at `/neighborhoods`
//!
//! ```text
//! CITIES:
//! GET    /                              list_cities
//! POST   /                              create_city
//! PUT    /{id}                          update_city
//! DELETE /{id}                          deactivate_city
//! GET    /{id}/neighborhoods            list_neighborhoods
//! POST   /{id}/neighborhoods            create_neighborhood
//!
//! NEIGHBORHOODS:
//! PUT    /{id}                          update_neighborhood
//! DELETE /{id}                          deactivate_neighborhood
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::delivery_areas;
use crate::state::AppState;

/// City routes, mounted at `/cities`.
pub fn city_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(delivery_areas::list_cities).post(delivery_areas::create_city),
        )
        .route(
            "/{id}",
            put(delivery_areas::update_city).delete(delivery_areas::deactivate_city),
        )
        .route(
            "/{id}/neighborhoods",
            get(delivery_areas::list_neighborhoods).post(delivery_areas::create_neighborhood),
        )
}

/// Neighborhood routes, mounted at `/neighborhoods`.
pub fn neighborhood_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(delivery_areas::update_neighborhood).delete(delivery_areas::deactivate_neighborhood),
    )
}
