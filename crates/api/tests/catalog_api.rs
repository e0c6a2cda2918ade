//! HTTP-level tests for the catalog: categories, complement groups, products
//! with their nested graph, and ingredients.

mod common;

use axum::http::StatusCode;
use common::{body_json, bootstrap_tenant, create, delete_auth, get_auth, post_json_auth, put_json_auth, Session};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_product(app: &axum::Router, session: &Session, code: &str, price: i64) -> Value {
    create(
        app,
        "/api/v1/products",
        json!({ "code": code, "name": format!("Product {code}"), "price_cents": price }),
        session,
    )
    .await
}

fn id(value: &Value) -> i64 {
    value["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_tree_rejects_cycles_and_depth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = bootstrap_tenant(&app, "cantina").await;

    let root = create(&app, "/api/v1/categories", json!({ "name": "Bebidas" }), &admin).await;
    let mid = create(
        &app,
        "/api/v1/categories",
        json!({ "name": "Sucos", "parent_id": id(&root) }),
        &admin,
    )
    .await;
    let leaf = create(
        &app,
        "/api/v1/categories",
        json!({ "name": "Naturais", "parent_id": id(&mid) }),
        &admin,
    )
    .await;

    // Fourth level.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        json!({ "name": "Laranja", "parent_id": id(&leaf) }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Root under its own grandchild.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/categories/{}", id(&root)),
        json!({ "parent_id": id(&leaf) }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Itself as parent.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/categories/{}", id(&mid)),
        json!({ "parent_id": id(&mid) }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Moving the leaf to the root is fine.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/categories/{}", id(&leaf)),
        json!({ "parent_id": null }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, "/api/v1/categories/tree", &admin).await;
    let json = body_json(response).await;
    let roots = json["data"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    let bebidas = roots.iter().find(|n| n["name"] == "Bebidas").unwrap();
    assert_eq!(bebidas["children"][0]["name"], "Sucos");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_reorder_and_deactivate(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = bootstrap_tenant(&app, "cantina").await;

    let a = create(&app, "/api/v1/categories", json!({ "name": "A" }), &admin).await;
    let b = create(&app, "/api/v1/categories", json!({ "name": "B" }), &admin).await;

    let response = put_json_auth(
        app.clone(),
        "/api/v1/categories/reorder",
        json!([{ "id": id(&a), "sort_order": 2 }, { "id": id(&b), "sort_order": 1 }]),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["updated"], 2);

    let response = get_auth(app.clone(), "/api/v1/categories", &admin).await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["name"], "B");

    let response = delete_auth(app.clone(), &format!("/api/v1/categories/{}", id(&a)), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app.clone(), &format!("/api/v1/categories/{}", id(&a)), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/v1/categories?include_inactive=true", &admin).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Complement groups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn complement_group_bounds_are_validated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = bootstrap_tenant(&app, "cantina").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/complement-groups",
        json!({ "name": "Molhos", "min_select": 3, "max_select": 2 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let group = create(
        &app,
        "/api/v1/complement-groups",
        json!({
            "name": "Adicionais",
            "min_select": 0,
            "max_select": 2,
            "complements": [
                { "name": "Bacon", "price_cents": 400 },
                { "name": "Cheddar", "price_cents": 300 },
            ],
        }),
        &admin,
    )
    .await;
    assert_eq!(group["complements"].as_array().unwrap().len(), 2);

    // Merged with stored max_select = 2, min 5 is invalid.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/complement-groups/{}", id(&group)),
        json!({ "min_select": 5 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        &format!("/api/v1/complement-groups/{}/complements", id(&group)),
        json!({ "name": "Ovo", "price_cents": -1 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_created_with_full_graph(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = bootstrap_tenant(&app, "pizzaria").await;

    let kitchen = create(&app, "/api/v1/production-locations", json!({ "name": "Forno" }), &admin).await;
    let unit = create(&app, "/api/v1/units", json!({ "name": "Grama", "symbol": "g" }), &admin).await;
    let category = create(&app, "/api/v1/categories", json!({ "name": "Pizzas" }), &admin).await;
    let group = create(
        &app,
        "/api/v1/complement-groups",
        json!({ "name": "Borda", "min_select": 0, "max_select": 1, "complements": [{ "name": "Catupiry", "price_cents": 800 }] }),
        &admin,
    )
    .await;
    let flour = create(
        &app,
        "/api/v1/ingredients",
        json!({ "name": "Farinha", "unit_id": id(&unit), "cost_cents": 2 }),
        &admin,
    )
    .await;
    let calabresa = create_product(&app, &admin, "CAL", 4500).await;
    let mussarela = create_product(&app, &admin, "MUS", 4000).await;

    let pizza = create(
        &app,
        "/api/v1/products",
        json!({
            "code": "PIZZA-G",
            "name": "Pizza Grande",
            "price_cents": 4000,
            "category_id": id(&category),
            "production_location_id": id(&kitchen),
            "unit_id": id(&unit),
            "max_flavors": 2,
            "flavor_pricing": "average",
            "yield_portions": 8,
            "complement_group_ids": [id(&group)],
            "flavor_ids": [id(&calabresa), id(&mussarela)],
            "technical_sheet": [{ "ingredient_id": id(&flour), "quantity": 400.0 }],
        }),
        &admin,
    )
    .await;

    assert_eq!(pizza["code"], "PIZZA-G");
    assert_eq!(pizza["complement_groups"][0]["complements"][0]["name"], "Catupiry");
    assert_eq!(pizza["flavors"].as_array().unwrap().len(), 2);
    assert_eq!(pizza["technical_sheet"][0]["ingredient_name"], "Farinha");

    // 400 g at 2 cents = 800, over 8 portions = 100 per portion.
    let response = get_auth(app.clone(), &format!("/api/v1/products/{}/cost", id(&pizza)), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cost = body_json(response).await;
    assert_eq!(cost["data"]["total_cost_cents"], 800);
    assert_eq!(cost["data"]["cost_per_portion_cents"], 100);
    assert_eq!(cost["data"]["margin_percent"], 97.5);

    // Replacing one collection leaves the others alone.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/products/{}/flavors", id(&pizza)),
        json!({ "flavor_ids": [id(&mussarela)] }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &format!("/api/v1/products/{}", id(&pizza)), &admin).await;
    let detail = body_json(response).await;
    assert_eq!(detail["data"]["flavors"].as_array().unwrap().len(), 1);
    assert_eq!(detail["data"]["complement_groups"].as_array().unwrap().len(), 1);
    assert_eq!(detail["data"]["technical_sheet"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_product_code_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = bootstrap_tenant(&app, "cantina").await;

    create_product(&app, &admin, "X-BURGER", 2500).await;
    let other = create_product(&app, &admin, "X-SALADA", 2700).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/products",
        json!({ "code": "X-BURGER", "name": "Copy", "price_cents": 100 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/products/{}", id(&other)),
        json!({ "code": "X-BURGER" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Keeping its own code is not a clash.
    let response = put_json_auth(
        app,
        &format!("/api/v1/products/{}", id(&other)),
        json!({ "code": "X-SALADA", "price_cents": 2900 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["price_cents"], 2900);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_links_must_belong_to_tenant(pool: PgPool) {
    let app = common::build_test_app(pool);
    let first = bootstrap_tenant(&app, "first").await;
    let second = bootstrap_tenant(&app, "second").await;

    let foreign_group = create(
        &app,
        "/api/v1/complement-groups",
        json!({ "name": "Extras", "min_select": 0, "max_select": 1 }),
        &second,
    )
    .await;
    let foreign_product = create_product(&app, &second, "FOREIGN", 1000).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/products",
        json!({ "code": "A", "name": "A", "price_cents": 100, "complement_group_ids": [id(&foreign_group)] }),
        &first,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/products",
        json!({ "code": "B", "name": "B", "price_cents": 100, "flavor_ids": [id(&foreign_product)] }),
        &first,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let own = create_product(&app, &first, "OWN", 1000).await;
    let response = put_json_auth(
        app,
        &format!("/api/v1/products/{}/flavors", id(&own)),
        json!({ "flavor_ids": [id(&own)] }),
        &first,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_validation_rules(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = bootstrap_tenant(&app, "cantina").await;

    for body in [
        json!({ "code": "", "name": "No code", "price_cents": 100 }),
        json!({ "code": "HAS SPACE", "name": "Bad code", "price_cents": 100 }),
        json!({ "code": "FREE", "name": "Free", "price_cents": 0 }),
        json!({ "code": "FLV", "name": "Flavors", "price_cents": 100, "max_flavors": 0 }),
        json!({ "code": "PRC", "name": "Pricing", "price_cents": 100, "flavor_pricing": "cheapest" }),
        json!({ "code": "YLD", "name": "Yield", "price_cents": 100, "yield_portions": 0 }),
    ] {
        let response = post_json_auth(app.clone(), "/api/v1/products", body.clone(), &admin).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "accepted {body}");
    }

    // A complement group listed twice is a client error, not a key violation.
    let group = create(
        &app,
        "/api/v1/complement-groups",
        json!({ "name": "Molhos", "min_select": 0, "max_select": 2 }),
        &admin,
    )
    .await;
    let twice = json!([id(&group), id(&group)]);
    let response = post_json_auth(
        app.clone(),
        "/api/v1/products",
        json!({ "code": "DUP", "name": "Dup", "price_cents": 100, "complement_group_ids": twice }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let product = create_product(&app, &admin, "LANCHE", 1500).await;
    let response = put_json_auth(
        app,
        &format!("/api/v1/products/{}/complement-groups", id(&product)),
        json!({ "complement_group_ids": twice }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_list_paginates_filters_and_sorts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = bootstrap_tenant(&app, "cantina").await;

    create_product(&app, &admin, "AGUA", 300).await;
    create_product(&app, &admin, "SUCO", 800).await;
    create_product(&app, &admin, "CERVEJA", 1200).await;

    let response = get_auth(app.clone(), "/api/v1/products?limit=2&sort=-price_cents", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 2);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["code"], "CERVEJA");
    assert_eq!(data[1]["code"], "SUCO");

    let response = get_auth(app.clone(), "/api/v1/products?limit=2&page=2&sort=-price_cents", &admin).await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["code"], "AGUA");

    let response = get_auth(app.clone(), "/api/v1/products?search=suc", &admin).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["code"], "SUCO");

    // `%` is matched literally, not as a wildcard.
    let response = get_auth(app.clone(), "/api/v1/products?search=%25", &admin).await;
    assert_eq!(body_json(response).await["total"], 0);

    let response = get_auth(app, "/api/v1/products?sort=password_hash", &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Ingredients
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn ingredient_stock_adjustments(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = bootstrap_tenant(&app, "cantina").await;

    let cheese = create(
        &app,
        "/api/v1/ingredients",
        json!({ "name": "Queijo", "cost_cents": 5, "stock_quantity": 2.0, "min_stock": 5.0 }),
        &admin,
    )
    .await;
    assert_eq!(cheese["below_min_stock"], true);
    let uri = format!("/api/v1/ingredients/{}/stock", id(&cheese));

    let response = post_json_auth(app.clone(), &uri, json!({ "delta": -3.0 }), &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(app.clone(), &uri, json!({ "delta": 10.5 }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["stock_quantity"], 12.5);
    assert_eq!(json["data"]["below_min_stock"], false);

    create(&app, "/api/v1/ingredients", json!({ "name": "Tomate", "stock_quantity": 1.0, "min_stock": 2.0 }), &admin).await;
    let response = get_auth(app, "/api/v1/ingredients?below_min=true", &admin).await;
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "Tomate");
}
