//! HTTP-level tests for the public storefront: tenant resolution, menu,
//! delivery fee quotes, coupon preview, order placement and tracking.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create, get, get_auth, get_public, place_order, post_json_public, put_json_auth,
    sample_order, setup_store,
};
use serde_json::json;
use sqlx::PgPool;

const SLUG: &str = "pizzaria-do-ze";

// ---------------------------------------------------------------------------
// Tenant resolution and catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn storefront_requires_known_tenant(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_store(&app, SLUG).await;

    let response = get(app.clone(), "/api/v1/delivery/menu").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_public(app.clone(), "/api/v1/delivery/menu", "nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_public(app, "/api/v1/delivery/tenant", SLUG).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], SLUG);
    assert_eq!(json["data"]["is_open"], true);
    assert!(json["data"].get("id").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn menu_lists_only_deliverable_products(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_store(&app, SLUG).await;

    let response = get_public(app, "/api/v1/delivery/menu", SLUG).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let sections = json["data"].as_array().unwrap();
    assert_eq!(sections.len(), 2);

    let codes: Vec<&str> = sections
        .iter()
        .flat_map(|s| s["products"].as_array().unwrap())
        .map(|p| p["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"PIZZA-G"));
    assert!(codes.contains(&"REFRI"));
    // Flavor-only products are not sold on their own.
    assert!(!codes.contains(&"SAB-CAL"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn neighborhoods_of_inactive_city_are_hidden(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let uri = format!("/api/v1/delivery/cities/{}/neighborhoods", store.city_id);

    let response = get_public(app.clone(), &uri, SLUG).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/cities/{}", store.city_id),
        json!({ "is_active": false }),
        &store.admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_public(app.clone(), &uri, SLUG).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get_public(app, "/api/v1/delivery/cities", SLUG).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Fee quotes and coupons
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delivery_fee_uses_neighborhood_override(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let uri = "/api/v1/delivery/checkout/delivery-fee";

    let response = post_json_public(
        app.clone(),
        uri,
        json!({ "neighborhood_id": store.centro_id, "subtotal_cents": 1000 }),
        SLUG,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["fee_cents"], 500);
    assert_eq!(json["data"]["estimated_delivery_mins"], 45);

    let response = post_json_public(
        app.clone(),
        uri,
        json!({ "neighborhood_id": store.jardins_id, "subtotal_cents": 6000 }),
        SLUG,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["fee_cents"], 800);
    assert_eq!(json["data"]["min_order_cents"], 5000);

    // Below the neighborhood minimum.
    let response = post_json_public(
        app.clone(),
        uri,
        json!({ "neighborhood_id": store.jardins_id, "subtotal_cents": 4999 }),
        SLUG,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown neighborhood.
    let response = post_json_public(
        app.clone(),
        uri,
        json!({ "neighborhood_id": 999_999, "subtotal_cents": 6000 }),
        SLUG,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_public(
        app,
        uri,
        json!({ "neighborhood_id": store.centro_id, "subtotal_cents": -1 }),
        SLUG,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn coupon_preview(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let uri = "/api/v1/delivery/checkout/coupon";

    create(
        &app,
        "/api/v1/coupons",
        json!({ "code": "bemvindo", "discount_kind": "percent", "discount_value": 15, "min_order_cents": 3000 }),
        &store.admin,
    )
    .await;
    create(
        &app,
        "/api/v1/coupons",
        json!({ "code": "FRETE", "discount_kind": "free_delivery", "discount_value": 0 }),
        &store.admin,
    )
    .await;

    let response = post_json_public(
        app.clone(),
        uri,
        json!({ "code": " BemVindo ", "subtotal_cents": 4999 }),
        SLUG,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["coupon"]["code"], "BEMVINDO");
    // 15% of 4999 rounds down.
    assert_eq!(json["data"]["discount_cents"], 749);

    let response = post_json_public(
        app.clone(),
        uri,
        json!({ "code": "FRETE", "subtotal_cents": 1000, "delivery_fee_cents": 700 }),
        SLUG,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["discount_cents"], 700);

    let response = post_json_public(
        app.clone(),
        uri,
        json!({ "code": "BEMVINDO", "subtotal_cents": 2000 }),
        SLUG,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_public(app.clone(), uri, json!({ "code": "NOPE", "subtotal_cents": 2000 }), SLUG).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for body in [
        json!({ "code": "FRETE", "subtotal_cents": -5000 }),
        json!({ "code": "FRETE", "subtotal_cents": 1000, "delivery_fee_cents": -700 }),
    ] {
        let response = post_json_public(app.clone(), uri, body.clone(), SLUG).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "accepted {body}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

// ---------------------------------------------------------------------------
// Order placement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn place_order_prices_server_side(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;

    let mut body = sample_order(&store);
    // Client-side amounts are ignored.
    body["total_cents"] = json!(1);
    body["items"][0]["unit_price_cents"] = json!(1);

    let order = place_order(&app, SLUG, body).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["number"], 1);
    assert_eq!(order["subtotal_cents"], 6250);
    assert_eq!(order["delivery_fee_cents"], 500);
    assert_eq!(order["discount_cents"], 0);
    assert_eq!(order["total_cents"], 6750);
    assert_eq!(order["customer"]["phone"], "19987654321");
    assert_eq!(order["delivery_address"]["street"], "Rua Barão");

    let pizza = &order["items"][0];
    // Average of 4500 and 4000, plus the crust.
    assert_eq!(pizza["unit_price_cents"], 5050);
    assert_eq!(pizza["flavors"].as_array().unwrap().len(), 2);
    assert_eq!(pizza["complements"][0]["name"], "Catupiry");
    assert_eq!(pizza["production_location_id"], store.kitchen_id);
    assert_eq!(order["items"][1]["production_location_id"], store.bar_id);

    let response = get_auth(
        app,
        &format!("/api/v1/products/{}", store.soda_id),
        &store.admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["stock_quantity"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn order_numbers_are_sequential_per_tenant(pool: PgPool) {
    let app = common::build_test_app(pool);
    let first = setup_store(&app, SLUG).await;
    let second = setup_store(&app, "outra-loja").await;

    assert_eq!(place_order(&app, SLUG, sample_order(&first)).await["number"], 1);
    assert_eq!(place_order(&app, SLUG, sample_order(&first)).await["number"], 2);
    assert_eq!(place_order(&app, "outra-loja", sample_order(&second)).await["number"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn place_order_applies_coupon_and_consumes_it(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let coupon = create(
        &app,
        "/api/v1/coupons",
        json!({ "code": "DEZ", "discount_kind": "percent", "discount_value": 10, "max_uses": 1 }),
        &store.admin,
    )
    .await;

    let mut body = sample_order(&store);
    body["coupon_code"] = json!("dez");
    let order = place_order(&app, SLUG, body.clone()).await;
    assert_eq!(order["discount_cents"], 625);
    assert_eq!(order["total_cents"], 6125);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/coupons/{}", coupon["id"]),
        &store.admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["used_count"], 1);

    // Exhausted.
    let response = post_json_public(app, "/api/v1/delivery/orders", body, SLUG).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn place_order_rejects_invalid_carts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let uri = "/api/v1/delivery/orders";

    let mut cases = Vec::new();

    let mut body = sample_order(&store);
    body["items"] = json!([]);
    cases.push(("empty cart", body));

    let mut body = sample_order(&store);
    body["items"][1]["quantity"] = json!(6);
    cases.push(("soda out of stock", body));

    let mut body = sample_order(&store);
    body["items"][0]["flavor_ids"] = json!([store.calabresa_id, store.calabresa_id]);
    cases.push(("repeated flavor", body));

    let mut body = sample_order(&store);
    body["items"][0]["flavor_ids"] = json!([store.soda_id]);
    cases.push(("flavor not offered", body));

    let mut body = sample_order(&store);
    body["items"][0]["complements"][0]["quantity"] = json!(2);
    cases.push(("crust above group maximum", body));

    let mut body = sample_order(&store);
    body["items"][0]["product_id"] = json!(store.calabresa_id);
    body["items"][0]["flavor_ids"] = json!([]);
    body["items"][0]["complements"] = json!([]);
    cases.push(("product not sold for delivery", body));

    let mut body = sample_order(&store);
    body["address"] = json!(null);
    cases.push(("delivery without address", body));

    let mut body = sample_order(&store);
    body["customer"]["phone"] = json!("1234");
    cases.push(("short phone", body));

    let mut body = sample_order(&store);
    body["change_for_cents"] = json!(10000);
    cases.push(("change on pix", body));

    let mut body = sample_order(&store);
    body["payment_method_id"] = json!(store.cash_id);
    body["change_for_cents"] = json!(5000);
    cases.push(("change below total", body));

    let mut body = sample_order(&store);
    body["address"]["neighborhood_id"] = json!(store.jardins_id);
    body["items"] = json!([{ "product_id": store.soda_id, "quantity": 1 }]);
    cases.push(("below neighborhood minimum", body));

    for (name, body) in cases {
        let response = post_json_public(app.clone(), uri, body, SLUG).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{name}");
    }

    // Nothing was reserved by the rejected attempts.
    let response = get_auth(
        app,
        &format!("/api/v1/products/{}", store.soda_id),
        &store.admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["stock_quantity"], 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closed_store_and_disabled_modes_reject_orders(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let uri = "/api/v1/delivery/orders";

    let response = put_json_auth(
        app.clone(),
        "/api/v1/tenant",
        json!({ "is_open": false }),
        &store.admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = post_json_public(app.clone(), uri, sample_order(&store), SLUG).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    put_json_auth(
        app.clone(),
        "/api/v1/tenant",
        json!({ "is_open": true, "pickup_enabled": false }),
        &store.admin,
    )
    .await;

    let mut pickup = sample_order(&store);
    pickup["order_type"] = json!("pickup");
    pickup["address"] = json!(null);
    let response = post_json_public(app.clone(), uri, pickup.clone(), SLUG).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    put_json_auth(
        app.clone(),
        "/api/v1/tenant",
        json!({ "pickup_enabled": true }),
        &store.admin,
    )
    .await;
    let order = place_order(&app, SLUG, pickup).await;
    assert_eq!(order["order_type"], "pickup");
    assert_eq!(order["delivery_fee_cents"], 0);
    assert!(order["delivery_address"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn track_order_by_code(pool: PgPool) {
    let app = common::build_test_app(pool);
    let store = setup_store(&app, SLUG).await;
    let other = setup_store(&app, "outra-loja").await;

    let order = place_order(&app, SLUG, sample_order(&store)).await;
    let code = order["tracking_code"].as_str().unwrap();

    let response = get_public(app.clone(), &format!("/api/v1/delivery/orders/{code}"), SLUG).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], order["id"]);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);

    // Codes are scoped to their tenant.
    let response = get_public(
        app.clone(),
        &format!("/api/v1/delivery/orders/{code}"),
        &other.admin.tenant,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_public(
        app,
        "/api/v1/delivery/orders/00000000-0000-0000-0000-000000000000",
        SLUG,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
