//! HTTP-level tests for staff order management: listing, status workflow,
//! history, cancellation and kitchen tickets.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create, get_auth, login, place_order, put_json_auth, sample_order,
    setup_store, Store,
};
use serde_json::{json, Value};
use sqlx::PgPool;

const SLUG: &str = "pizzaria-do-ze";

async fn set_status(app: &axum::Router, store: &Store, order_id: &Value, status: &str) -> StatusCode {
    put_json_auth(
        app.clone(),
        &format!("/api/v1/orders/{order_id}/status"),
        json!({ "status": status }),
        &store.admin,
    )
    .await
    .status()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_and_paginates(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;

    let first = place_order(&app, SLUG, sample_order(&store)).await;
    let mut pickup = sample_order(&store);
    pickup["order_type"] = json!("pickup");
    pickup["address"] = json!(null);
    place_order(&app, SLUG, pickup).await;
    place_order(&app, SLUG, sample_order(&store)).await;

    assert_eq!(set_status(&app, &store, &first["id"], "confirmed").await, StatusCode::OK);

    let response = get_auth(app.clone(), "/api/v1/orders", &store.admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    // Newest first.
    assert_eq!(json["data"][0]["number"], 3);
    assert_eq!(json["data"][0]["customer_name"], "Ana Souza");

    let response = get_auth(app.clone(), "/api/v1/orders?status=pending", &store.admin).await;
    assert_eq!(body_json(response).await["total"], 2);

    let response = get_auth(app.clone(), "/api/v1/orders?order_type=pickup", &store.admin).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["number"], 2);

    let response = get_auth(app.clone(), "/api/v1/orders?sort=number&limit=1&page=2", &store.admin).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["number"], 2);

    let response = get_auth(app, "/api/v1/orders?status=lost", &store.admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delivery_order_walks_the_workflow(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let order = place_order(&app, SLUG, sample_order(&store)).await;
    let id = &order["id"];

    // No skipping ahead.
    assert_eq!(set_status(&app, &store, id, "preparing").await, StatusCode::BAD_REQUEST);

    for status in ["confirmed", "preparing", "delivering", "completed"] {
        assert_eq!(set_status(&app, &store, id, status).await, StatusCode::OK, "{status}");
    }

    // Terminal.
    assert_eq!(set_status(&app, &store, id, "cancelled").await, StatusCode::BAD_REQUEST);

    let response = get_auth(app.clone(), &format!("/api/v1/orders/{id}/history"), &store.admin).await;
    let json = body_json(response).await;
    let history = json["data"].as_array().unwrap();
    assert_eq!(history.len(), 5);
    assert!(history[0]["from_status"].is_null());
    assert_eq!(history[0]["to_status"], "pending");
    assert!(history[0]["changed_by"].is_null());
    assert_eq!(history[4]["from_status"], "delivering");
    assert_eq!(history[4]["to_status"], "completed");
    assert_eq!(history[4]["changed_by"], store.admin.user_id);

    let response = get_auth(app, &format!("/api/v1/orders/{id}"), &store.admin).await;
    assert_eq!(body_json(response).await["data"]["status"], "completed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pickup_order_skips_delivering(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let mut body = sample_order(&store);
    body["order_type"] = json!("pickup");
    body["address"] = json!(null);
    let order = place_order(&app, SLUG, body).await;
    let id = &order["id"];

    assert_eq!(set_status(&app, &store, id, "confirmed").await, StatusCode::OK);
    assert_eq!(set_status(&app, &store, id, "preparing").await, StatusCode::OK);
    assert_eq!(set_status(&app, &store, id, "delivering").await, StatusCode::BAD_REQUEST);
    assert_eq!(set_status(&app, &store, id, "completed").await, StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelling_restores_stock_and_coupon(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let coupon = create(
        &app,
        "/api/v1/coupons",
        json!({ "code": "UMAVEZ", "discount_kind": "fixed", "discount_value": 1000, "max_uses": 1 }),
        &store.admin,
    )
    .await;

    let mut body = sample_order(&store);
    body["coupon_code"] = json!("UMAVEZ");
    let order = place_order(&app, SLUG, body.clone()).await;
    assert_eq!(order["discount_cents"], 1000);

    let soda_uri = format!("/api/v1/products/{}", store.soda_id);
    let response = get_auth(app.clone(), &soda_uri, &store.admin).await;
    assert_eq!(body_json(response).await["data"]["stock_quantity"], 3);

    assert_eq!(set_status(&app, &store, &order["id"], "confirmed").await, StatusCode::OK);
    assert_eq!(set_status(&app, &store, &order["id"], "cancelled").await, StatusCode::OK);

    let response = get_auth(app.clone(), &soda_uri, &store.admin).await;
    assert_eq!(body_json(response).await["data"]["stock_quantity"], 5);
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/coupons/{}", coupon["id"]),
        &store.admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["used_count"], 0);

    // The coupon can be used again.
    place_order(&app, SLUG, body).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelling_ignores_stock_tracking_enabled_after_placement(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let order = place_order(&app, SLUG, sample_order(&store)).await;

    let pizza_uri = format!("/api/v1/products/{}", store.pizza_id);
    let response = put_json_auth(
        app.clone(),
        &pizza_uri,
        json!({ "controls_stock": true, "stock_quantity": 10 }),
        &store.admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(set_status(&app, &store, &order["id"], "cancelled").await, StatusCode::OK);

    let response = get_auth(app.clone(), &pizza_uri, &store.admin).await;
    assert_eq!(body_json(response).await["data"]["stock_quantity"], 10);
    let soda_uri = format!("/api/v1/products/{}", store.soda_id);
    let response = get_auth(app, &soda_uri, &store.admin).await;
    assert_eq!(body_json(response).await["data"]["stock_quantity"], 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tickets_are_grouped_by_production_location(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;

    let mut body = sample_order(&store);
    let loose = create(
        &app,
        "/api/v1/products",
        json!({ "code": "BRINDE", "name": "Brinde", "price_cents": 100 }),
        &store.admin,
    )
    .await;
    body["items"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "product_id": loose["id"], "quantity": 1 }));
    let order = place_order(&app, SLUG, body).await;

    let response = get_auth(
        app,
        &format!("/api/v1/orders/{}/tickets", order["id"]),
        &store.admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let tickets = json["data"].as_array().unwrap();
    assert_eq!(tickets.len(), 3);

    assert_eq!(tickets[0]["production_location_name"], "Bar");
    assert_eq!(tickets[0]["lines"][0]["product_name"], "Refrigerante");
    assert_eq!(tickets[0]["lines"][0]["quantity"], 2);

    assert_eq!(tickets[1]["production_location_name"], "Forno");
    assert_eq!(tickets[1]["production_location_id"], store.kitchen_id);
    let pizza = &tickets[1]["lines"][0];
    assert_eq!(pizza["notes"], "well done");
    assert_eq!(
        pizza["extras"],
        json!(["1/2 Calabresa", "1/2 Mussarela", "1x Catupiry"])
    );

    // No location anywhere in its chain.
    assert!(tickets[2]["production_location_id"].is_null());
    assert_eq!(tickets[2]["lines"][0]["product_name"], "Brinde");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_can_work_orders_of_own_tenant_only(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let other = setup_store(&app, "outra-loja").await;
    let order = place_order(&app, SLUG, sample_order(&store)).await;

    create(
        &app,
        "/api/v1/users",
        json!({ "username": "cozinha", "email": "cozinha@ze.test", "password": "staff-password", "role": "staff" }),
        &store.admin,
    )
    .await;
    let staff = login(&app, SLUG, "cozinha", "staff-password").await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/orders/{}/status", order["id"]),
        json!({ "status": "confirmed" }),
        &staff,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        app,
        &format!("/api/v1/orders/{}", order["id"]),
        &other.admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
