#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use comanda_api::auth::jwt::JwtConfig;
use comanda_api::config::{DatabaseConfig, LogFormat, ServerConfig};
use comanda_api::router::build_app_router;
use comanda_api::state::AppState;

pub const ADMIN_PASSWORD: &str = "admin-password-1";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        log_format: LogFormat::Pretty,
        // The pool handed to `build_test_app` is used; this is never dialed.
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            expiry_hours: 1,
            cookie_name: "token".to_string(),
            cookie_secure: false,
        },
    }
}

/// Build the full application router, with the same middleware stack as
/// `main.rs`, over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// A logged-in staff member: bearer token plus the tenant slug sent in
/// `x-tenant`.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub tenant: String,
    pub user_id: i64,
    pub tenant_id: i64,
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    tenant: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    if let Some(tenant) = tenant {
        builder = builder.header("x-tenant", tenant);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, None, Some(body)).await
}

pub async fn get_auth(app: Router, uri: &str, session: &Session) -> Response<Body> {
    send(
        app,
        Method::GET,
        uri,
        Some(&session.token),
        Some(&session.tenant),
        None,
    )
    .await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: Value,
    session: &Session,
) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        Some(&session.token),
        Some(&session.tenant),
        Some(body),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: Value,
    session: &Session,
) -> Response<Body> {
    send(
        app,
        Method::PUT,
        uri,
        Some(&session.token),
        Some(&session.tenant),
        Some(body),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, session: &Session) -> Response<Body> {
    send(
        app,
        Method::DELETE,
        uri,
        Some(&session.token),
        Some(&session.tenant),
        None,
    )
    .await
}

/// Request with a token but an explicit (possibly wrong) tenant header.
pub async fn get_with_tenant(
    app: Router,
    uri: &str,
    token: &str,
    tenant: Option<&str>,
) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), tenant, None).await
}

pub async fn get_public(app: Router, uri: &str, tenant: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(tenant), None).await
}

pub async fn post_json_public(
    app: Router,
    uri: &str,
    body: Value,
    tenant: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(tenant), Some(body)).await
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Bootstrap a tenant through the API and log its admin in.
pub async fn bootstrap_tenant(app: &Router, slug: &str) -> Session {
    let body = json!({
        "name": format!("Restaurant {slug}"),
        "slug": slug,
        "admin": {
            "username": "admin",
            "email": format!("admin@{slug}.test"),
            "password": ADMIN_PASSWORD,
        },
    });
    let response = post_json(app.clone(), "/api/v1/tenants", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    login(app, slug, "admin", ADMIN_PASSWORD).await
}

/// Log in through the API and return a session.
pub async fn login(app: &Router, slug: &str, username: &str, password: &str) -> Session {
    let body = json!({ "tenant_slug": slug, "username": username, "password": password });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    Session {
        token: json["access_token"].as_str().unwrap().to_string(),
        tenant: slug.to_string(),
        user_id: json["user"]["id"].as_i64().unwrap(),
        tenant_id: json["user"]["tenant_id"].as_i64().unwrap(),
    }
}

/// POST as `session` and return the created resource's `data`.
pub async fn create(app: &Router, uri: &str, body: Value, session: &Session) -> Value {
    let response = post_json_auth(app.clone(), uri, body, session).await;
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {json}");
    json["data"].clone()
}

/// A tenant with a small delivery setup: two production locations, a pizza
/// with flavors and a crust group, a stock-controlled soda, a city with two
/// neighborhoods and two payment methods.
#[derive(Debug, Clone)]
pub struct Store {
    pub admin: Session,
    pub kitchen_id: i64,
    pub bar_id: i64,
    pub pizza_id: i64,
    pub calabresa_id: i64,
    pub mussarela_id: i64,
    pub catupiry_id: i64,
    pub soda_id: i64,
    pub city_id: i64,
    /// Uses the city fee (500), no minimum.
    pub centro_id: i64,
    /// Overrides the fee (800) and requires 5000 minimum.
    pub jardins_id: i64,
    pub cash_id: i64,
    pub pix_id: i64,
}

pub async fn setup_store(app: &Router, slug: &str) -> Store {
    let admin = bootstrap_tenant(app, slug).await;
    let id = |v: Value| v["id"].as_i64().unwrap();

    let kitchen_id = id(create(app, "/api/v1/production-locations", json!({ "name": "Forno" }), &admin).await);
    let bar_id = id(create(app, "/api/v1/production-locations", json!({ "name": "Bar" }), &admin).await);

    let pizzas = id(create(
        app,
        "/api/v1/categories",
        json!({ "name": "Pizzas", "production_location_id": kitchen_id }),
        &admin,
    )
    .await);
    let drinks = id(create(
        app,
        "/api/v1/categories",
        json!({ "name": "Bebidas", "production_location_id": bar_id }),
        &admin,
    )
    .await);

    let crust = create(
        app,
        "/api/v1/complement-groups",
        json!({
            "name": "Borda",
            "min_select": 0,
            "max_select": 1,
            "complements": [{ "name": "Catupiry", "price_cents": 800 }],
        }),
        &admin,
    )
    .await;
    let catupiry_id = crust["complements"][0]["id"].as_i64().unwrap();

    let calabresa_id = id(create(
        app,
        "/api/v1/products",
        json!({ "code": "SAB-CAL", "name": "Calabresa", "price_cents": 4500, "available_for_delivery": false }),
        &admin,
    )
    .await);
    let mussarela_id = id(create(
        app,
        "/api/v1/products",
        json!({ "code": "SAB-MUS", "name": "Mussarela", "price_cents": 4000, "available_for_delivery": false }),
        &admin,
    )
    .await);
    let pizza_id = id(create(
        app,
        "/api/v1/products",
        json!({
            "code": "PIZZA-G",
            "name": "Pizza Grande",
            "price_cents": 4000,
            "category_id": pizzas,
            "max_flavors": 2,
            "flavor_pricing": "average",
            "complement_group_ids": [crust["id"]],
            "flavor_ids": [calabresa_id, mussarela_id],
        }),
        &admin,
    )
    .await);
    let soda_id = id(create(
        app,
        "/api/v1/products",
        json!({
            "code": "REFRI",
            "name": "Refrigerante",
            "price_cents": 600,
            "category_id": drinks,
            "controls_stock": true,
            "stock_quantity": 5,
        }),
        &admin,
    )
    .await);

    let city_id = id(create(
        app,
        "/api/v1/cities",
        json!({ "name": "Campinas", "state": "SP", "delivery_fee_cents": 500 }),
        &admin,
    )
    .await);
    let centro_id = id(create(
        app,
        &format!("/api/v1/cities/{city_id}/neighborhoods"),
        json!({ "name": "Centro" }),
        &admin,
    )
    .await);
    let jardins_id = id(create(
        app,
        &format!("/api/v1/cities/{city_id}/neighborhoods"),
        json!({ "name": "Jardins", "delivery_fee_cents": 800, "min_order_cents": 5000 }),
        &admin,
    )
    .await);

    let cash_id = id(create(app, "/api/v1/payment-methods", json!({ "name": "Dinheiro", "kind": "cash" }), &admin).await);
    let pix_id = id(create(app, "/api/v1/payment-methods", json!({ "name": "Pix", "kind": "pix" }), &admin).await);

    Store {
        admin,
        kitchen_id,
        bar_id,
        pizza_id,
        calabresa_id,
        mussarela_id,
        catupiry_id,
        soda_id,
        city_id,
        centro_id,
        jardins_id,
        cash_id,
        pix_id,
    }
}

/// Half calabresa, half mussarela with catupiry crust, plus two sodas,
/// delivered to Centro. Subtotal 4250 + 800 + 2 x 600 = 6250, fee 500.
pub fn sample_order(store: &Store) -> Value {
    json!({
        "customer": { "name": "Ana Souza", "phone": "(19) 98765-4321" },
        "order_type": "delivery",
        "address": { "neighborhood_id": store.centro_id, "street": "Rua Barão", "number": "120" },
        "payment_method_id": store.pix_id,
        "items": [
            {
                "product_id": store.pizza_id,
                "quantity": 1,
                "flavor_ids": [store.calabresa_id, store.mussarela_id],
                "complements": [{ "complement_id": store.catupiry_id }],
                "notes": "well done",
            },
            { "product_id": store.soda_id, "quantity": 2 },
        ],
    })
}

/// Place an order on the storefront and return its `data`.
pub async fn place_order(app: &Router, tenant: &str, body: Value) -> Value {
    let response = post_json_public(app.clone(), "/api/v1/delivery/orders", body, tenant).await;
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "order rejected: {json}");
    json["data"].clone()
}
