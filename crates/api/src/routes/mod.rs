pub mod auth;
pub mod categories;
pub mod complement_groups;
pub mod coupons;
pub mod delivery;
pub mod delivery_areas;
pub mod health;
pub mod ingredients;
pub mod orders;
pub mod payment_methods;
pub mod production_locations;
pub mod products;
pub mod tenants;
pub mod units;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/logout                                 logout
/// /auth/me                                     current user
///
/// /tenants                                     bootstrap tenant + admin (public)
/// /tenant                                      get, update own tenant
///
/// /users                                       list, create (admin only)
/// /users/{id}                                  update, deactivate (admin only)
///
/// /production-locations                        list, create
/// /production-locations/{id}                   get, update, deactivate
///
/// /units                                       list, create
/// /units/{id}                                  update, deactivate
///
/// /categories                                  list, create
/// /categories/tree                             nested tree
/// /categories/reorder                          bulk sort order (PUT)
/// /categories/{id}                             get, update, deactivate
///
/// /complement-groups                           list, create
/// /complement-groups/{id}                      get, update, deactivate
/// /complement-groups/{id}/complements          add complement (POST)
/// /complement-groups/{id}/complements/{cid}    update, deactivate complement
///
/// /products                                    list (paginated), create
/// /products/reorder                            bulk sort order (PUT)
/// /products/{id}                               get, update, deactivate
/// /products/{id}/complement-groups             replace links (PUT)
/// /products/{id}/flavors                       replace flavors (PUT)
/// /products/{id}/technical-sheet               get, replace
/// /products/{id}/cost                          costing (GET)
///
/// /ingredients                                 list, create
/// /ingredients/{id}                            get, update, deactivate
/// /ingredients/{id}/stock                      adjust stock (POST)
///
/// /cities                                      list, create
/// /cities/{id}                                 update, deactivate
/// /cities/{id}/neighborhoods                   list, create
/// /neighborhoods/{id}                          update, deactivate
///
/// /payment-methods                             list, create
/// /payment-methods/{id}                        update, deactivate
///
/// /coupons                                     list, create
/// /coupons/{id}                                get, update, deactivate
///
/// /orders                                      list (paginated)
/// /orders/{id}                                 detail
/// /orders/{id}/status                          transition (PUT)
/// /orders/{id}/history                         status history
/// /orders/{id}/tickets                         kitchen tickets
///
/// /delivery/...                                public storefront (x-tenant)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication.
        .nest("/auth", auth::router())
        // Tenant bootstrap and settings.
        .nest("/tenants", tenants::bootstrap_router())
        .nest("/tenant", tenants::current_router())
        // Staff accounts.
        .nest("/users", users::router())
        // Catalog.
        .nest("/production-locations", production_locations::router())
        .nest("/units", units::router())
        .nest("/categories", categories::router())
        .nest("/complement-groups", complement_groups::router())
        .nest("/products", products::router())
        .nest("/ingredients", ingredients::router())
        // Delivery setup.
        .nest("/cities", delivery_areas::city_router())
        .nest("/neighborhoods", delivery_areas::neighborhood_router())
        .nest("/payment-methods", payment_methods::router())
        .nest("/coupons", coupons::router())
        // Orders.
        .nest("/orders", orders::router())
        // Public storefront.
        .nest("/delivery", delivery::router())
}
