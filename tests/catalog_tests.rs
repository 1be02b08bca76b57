//! Catalog CRUD over HTTP: billboards, categories, sizes, colors, products.

mod common;

use axum::http::StatusCode;
use common::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

// =============================================================================
// Billboards
// =============================================================================

#[tokio::test]
async fn test_billboard_crud_roundtrip() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Sample Store").await;

    let created = app.billboard(&store_id).await;
    assert_eq!(created["label"], "Winter Sale");
    assert_eq!(created["storeId"], store_id.as_str());
    let id = id_of(&created);

    let fetched = app
        .server
        .get(&format!("/api/{}/billboards/{}", store_id, id))
        .await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["imageUrl"], "https://cdn.example.com/winter.png");

    let updated = app
        .server
        .patch(&format!("/api/{}/billboards/{}", store_id, id))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "label": "Spring Sale", "imageUrl": "https://cdn.example.com/spring.png" }))
        .await;
    updated.assert_status_ok();
    let body: Value = updated.json();
    assert_eq!(body["label"], "Spring Sale");
    assert_eq!(body["labelRu"], "Зимняя распродажа");

    let deleted = app
        .server
        .delete(&format!("/api/{}/billboards/{}", store_id, id))
        .authorization_bearer(OWNER_TOKEN)
        .await;
    deleted.assert_status_ok();
    assert_eq!(id_of(&deleted.json::<Value>()), id);

    app.server
        .get(&format!("/api/{}/billboards/{}", store_id, id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_billboard_create_requires_every_label() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Sample Store").await;

    let response = app
        .server
        .post(&format!("/api/{}/billboards", store_id))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "label": "Winter Sale", "imageUrl": "https://cdn.example.com/w.png" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("is required"));
}

#[tokio::test]
async fn test_billboard_list_is_localized() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Sample Store").await;
    app.billboard(&store_id).await;

    let response = app
        .server
        .get(&format!("/api/{}/billboards?lang=ru", store_id))
        .await;
    response.assert_status_ok();
    let list: Vec<Value> = response.json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["label"], "Зимняя распродажа");
}

#[tokio::test]
async fn test_billboard_in_use_cannot_be_deleted() {
    let app = app();
    let fixture = app.stocked_store().await;

    let response = app
        .server
        .delete(&format!(
            "/api/{}/billboards/{}",
            fixture.store_id, fixture.billboard_id
        ))
        .authorization_bearer(OWNER_TOKEN)
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "ENTITY_IN_USE");
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_category_embeds_localized_billboard() {
    let app = app();
    let fixture = app.stocked_store().await;

    let response = app
        .server
        .get(&format!(
            "/api/{}/categories/{}?lang=kg",
            fixture.store_id, fixture.category_id
        ))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Clothing");
    assert_eq!(body["billboard"]["id"], fixture.billboard_id.as_str());
    assert_eq!(body["billboard"]["label"], "Кышкы арзандатуу");
}

#[tokio::test]
async fn test_category_rejects_foreign_billboard() {
    let app = app();
    let fixture = app.stocked_store().await;
    let other_store = app.create_store(OWNER_TOKEN, "Second Store").await;

    let response = app
        .server
        .post(&format!("/api/{}/categories", other_store))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "name": "Shoes", "billboardId": fixture.billboard_id }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_needs_a_name_in_some_language() {
    let app = app();
    let fixture = app.stocked_store().await;

    let response = app
        .server
        .post(&format!("/api/{}/categories", fixture.store_id))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "billboardId": fixture.billboard_id }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post(&format!("/api/{}/categories", fixture.store_id))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "nameKg": "Бут кийим", "billboardId": fixture.billboard_id }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["name"], "Бут кийим");
}

// =============================================================================
// Sizes and colors
// =============================================================================

#[tokio::test]
async fn test_color_value_must_be_hex() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Sample Store").await;

    let response = app
        .server
        .post(&format!("/api/{}/colors", store_id))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "name": "Red", "value": "red" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(
        response.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .contains("valid hex code")
    );
}

#[tokio::test]
async fn test_size_update_and_list() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Sample Store").await;
    let size = app.size(&store_id).await;

    let response = app
        .server
        .put(&format!("/api/{}/sizes/{}", store_id, id_of(&size)))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "name": "Extra Large", "value": "XL" }))
        .await;
    response.assert_status_ok();

    let list: Vec<Value> = app
        .server
        .get(&format!("/api/{}/sizes", store_id))
        .await
        .json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["value"], "XL");
}

#[tokio::test]
async fn test_size_used_by_product_cannot_be_deleted() {
    let app = app();
    let fixture = app.stocked_store().await;
    app.product(&fixture, "Jacket", "79.99").await;

    let response = app
        .server
        .delete(&format!("/api/{}/sizes/{}", fixture.store_id, fixture.size_id))
        .authorization_bearer(OWNER_TOKEN)
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let response = app
        .server
        .delete(&format!("/api/{}/colors/{}", fixture.store_id, fixture.color_id))
        .authorization_bearer(OWNER_TOKEN)
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_records_are_scoped_to_their_store() {
    let app = app();
    let fixture = app.stocked_store().await;
    let other_store = app.create_store(OWNER_TOKEN, "Second Store").await;

    app.server
        .get(&format!("/api/{}/sizes/{}", other_store, fixture.size_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let list: Vec<Value> = app
        .server
        .get(&format!("/api/{}/sizes", other_store))
        .await
        .json();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_malformed_ids_are_bad_requests() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Sample Store").await;

    app.server
        .get("/api/not-a-uuid/sizes")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .get(&format!("/api/{}/sizes/not-a-uuid", store_id))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_ENTITY_ID");
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_price_is_rounded_and_relations_embedded() {
    let app = app();
    let fixture = app.stocked_store().await;

    let created = app.product(&fixture, "Jacket", "79.994").await;
    assert_eq!(decimal(&created["price"]), Decimal::from_str("79.99").unwrap());
    assert_eq!(created["images"].as_array().unwrap().len(), 1);

    let response = app
        .server
        .get(&format!(
            "/api/{}/products/{}",
            fixture.store_id,
            id_of(&created)
        ))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["category"]["id"], fixture.category_id.as_str());
    assert_eq!(body["color"]["value"], "#FF0000");
    assert_eq!(body["size"]["value"], "L");
}

#[tokio::test]
async fn test_product_rejects_non_positive_price() {
    let app = app();
    let fixture = app.stocked_store().await;

    let response = app
        .server
        .post(&format!("/api/{}/products", fixture.store_id))
        .authorization_bearer(OWNER_TOKEN)
        .json(&fixture.product_body("Jacket", "0"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Price must be greater than 0"
    );
}

#[tokio::test]
async fn test_product_rejects_unknown_category() {
    let app = app();
    let fixture = app.stocked_store().await;
    let mut body = fixture.product_body("Jacket", "10");
    body["categoryId"] = json!(uuid::Uuid::new_v4());

    let response = app
        .server
        .post(&format!("/api/{}/products", fixture.store_id))
        .authorization_bearer(OWNER_TOKEN)
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_list_filters() {
    let app = app();
    let fixture = app.stocked_store().await;

    let mut featured = fixture.product_body("Featured Jacket", "10");
    featured["isFeatured"] = json!(true);
    app.create(&fixture.store_id, "products", featured).await;

    let mut archived = fixture.product_body("Old Jacket", "10");
    archived["isArchived"] = json!(true);
    app.create(&fixture.store_id, "products", archived).await;

    let mut sizeless = fixture.product_body("Scarf", "5");
    sizeless["sizeId"] = Value::Null;
    app.create(&fixture.store_id, "products", sizeless).await;

    let all: Vec<Value> = app
        .server
        .get(&format!("/api/{}/products", fixture.store_id))
        .await
        .json();
    assert_eq!(all.len(), 2, "archived products are hidden");

    let featured: Vec<Value> = app
        .server
        .get(&format!("/api/{}/products?isFeatured=true", fixture.store_id))
        .await
        .json();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["name"], "Featured Jacket");

    let sized: Vec<Value> = app
        .server
        .get(&format!(
            "/api/{}/products?sizeId={}",
            fixture.store_id, fixture.size_id
        ))
        .await
        .json();
    assert_eq!(sized.len(), 1);

    let by_category: Vec<Value> = app
        .server
        .get(&format!(
            "/api/{}/products?categoryId={},{}",
            fixture.store_id,
            fixture.category_id,
            uuid::Uuid::new_v4()
        ))
        .await
        .json();
    assert_eq!(by_category.len(), 2);

    let repeated = app
        .server
        .get(&format!(
            "/api/{}/products?categoryId={}&categoryId={}&colorId={}",
            fixture.store_id,
            uuid::Uuid::new_v4(),
            fixture.category_id,
            fixture.color_id
        ))
        .await;
    repeated.assert_status_ok();
    assert_eq!(repeated.json::<Vec<Value>>().len(), 2);
}

#[tokio::test]
async fn test_malformed_query_uses_error_shape() {
    let app = app();
    let fixture = app.stocked_store().await;

    let response = app
        .server
        .get(&format!(
            "/api/{}/sizes/{}?lang=ru&lang=kg",
            fixture.store_id, fixture.size_id
        ))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_QUERY");
}

#[tokio::test]
async fn test_product_filter_with_bad_id_is_rejected() {
    let app = app();
    let fixture = app.stocked_store().await;

    app.server
        .get(&format!("/api/{}/products?colorId=nope", fixture.store_id))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_update_requires_size() {
    let app = app();
    let fixture = app.stocked_store().await;
    let product = app.product(&fixture, "Jacket", "10").await;

    let mut body = fixture.product_body("Jacket", "12.50");
    body["sizeId"] = Value::Null;
    let response = app
        .server
        .patch(&format!(
            "/api/{}/products/{}",
            fixture.store_id,
            id_of(&product)
        ))
        .authorization_bearer(OWNER_TOKEN)
        .json(&body)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .patch(&format!(
            "/api/{}/products/{}",
            fixture.store_id,
            id_of(&product)
        ))
        .authorization_bearer(OWNER_TOKEN)
        .json(&fixture.product_body("Jacket", "12.50"))
        .await;
    response.assert_status_ok();
    assert_eq!(
        decimal(&response.json::<Value>()["price"]),
        Decimal::from_str("12.5").unwrap()
    );
}

#[tokio::test]
async fn test_invalid_json_is_a_validation_error() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Sample Store").await;

    let response = app
        .server
        .post(&format!("/api/{}/sizes", store_id))
        .authorization_bearer(OWNER_TOKEN)
        .bytes("{ not json".into())
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
