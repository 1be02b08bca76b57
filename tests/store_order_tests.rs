//! Stores, the order overview and health routes.

mod common;

use axum::http::StatusCode;
use common::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shopdesk::core::service::OrderService;
use shopdesk::entities::Order;
use std::str::FromStr;
use uuid::Uuid;

#[tokio::test]
async fn test_health() {
    let app = app();
    for path in ["/health", "/healthz"] {
        let response = app.server.get(path).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok", "service": "shopdesk" }));
    }
}

// =============================================================================
// Stores
// =============================================================================

#[tokio::test]
async fn test_stores_are_listed_per_owner() {
    let app = app();
    app.create_store(OWNER_TOKEN, "First").await;
    app.create_store(OWNER_TOKEN, "Second").await;
    app.create_store(OTHER_TOKEN, "Elsewhere").await;

    let stores: Vec<Value> = app
        .server
        .get("/api/stores")
        .authorization_bearer(OWNER_TOKEN)
        .await
        .json();
    let names: Vec<&str> = stores.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    assert!(stores.iter().all(|s| s["userId"] == OWNER));
}

#[tokio::test]
async fn test_store_name_is_required() {
    let app = app();
    app.server
        .post("/api/stores")
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "name": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_rename() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Old Name").await;

    let response = app
        .server
        .patch(&format!("/api/stores/{}", store_id))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "name": "New Name" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "New Name");

    app.server
        .patch(&format!("/api/stores/{}", store_id))
        .authorization_bearer(OTHER_TOKEN)
        .json(&json!({ "name": "Hijacked" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_store_with_catalog_cannot_be_deleted() {
    let app = app();
    let fixture = app.stocked_store().await;

    let response = app
        .server
        .delete(&format!("/api/stores/{}", fixture.store_id))
        .authorization_bearer(OWNER_TOKEN)
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>()["message"],
        "Make sure you removed all products and categories first"
    );
}

#[tokio::test]
async fn test_empty_store_delete_purges_orders() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Sample Store").await;
    let store_uuid = Uuid::parse_str(&store_id).unwrap();
    app.catalog
        .orders
        .create_with_items(Order::pending(store_uuid, &[(Uuid::new_v4(), 1)]))
        .await
        .unwrap();

    app.server
        .delete(&format!("/api/stores/{}", store_id))
        .authorization_bearer(OWNER_TOKEN)
        .await
        .assert_status_ok();

    assert!(app.catalog.orders.list_by_store(&store_uuid).await.unwrap().is_empty());
    app.server
        .get(&format!("/api/stores/{}", store_id))
        .authorization_bearer(OWNER_TOKEN)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_overview_joins_products() {
    let app = app();
    let fixture = app.stocked_store().await;
    let shirt = app.product(&fixture, "Shirt", "10.00").await;
    let hat = app.product(&fixture, "Hat", "25.00").await;

    app.server
        .post(&format!("/api/{}/checkout", fixture.store_id))
        .json(&json!({ "products": [
            { "id": id_of(&shirt), "count": 2 },
            { "id": id_of(&hat), "count": 1 }
        ]}))
        .await
        .assert_status_ok();

    let response = app
        .server
        .get(&format!("/api/{}/orders", fixture.store_id))
        .authorization_bearer(OWNER_TOKEN)
        .await;
    response.assert_status_ok();

    let summaries: Vec<Value> = response.json();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["products"], "Shirt, Hat");
    assert_eq!(summaries[0]["quantity"], "2, 1");
    assert_eq!(summaries[0]["isPaid"], false);
    let total = Decimal::from_str(summaries[0]["totalPrice"].as_str().unwrap()).unwrap();
    assert_eq!(total, Decimal::from(45));
}

#[tokio::test]
async fn test_order_total_overflow_is_an_integrity_error() {
    let app = app();
    let fixture = app.stocked_store().await;
    let shirt = app.product(&fixture, "Shirt", "10.00").await;

    app.server
        .post(&format!("/api/{}/checkout", fixture.store_id))
        .json(&json!({ "products": [{ "id": id_of(&shirt), "count": 2 }] }))
        .await
        .assert_status_ok();

    app.server
        .patch(&format!("/api/{}/products/{}", fixture.store_id, id_of(&shirt)))
        .authorization_bearer(OWNER_TOKEN)
        .json(&fixture.product_body("Shirt", "50000000000000000000000000000"))
        .await
        .assert_status_ok();

    let response = app
        .server
        .get(&format!("/api/{}/orders", fixture.store_id))
        .authorization_bearer(OWNER_TOKEN)
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "DATA_INTEGRITY_ERROR");
    assert_eq!(body["message"], "Internal error");
}

#[tokio::test]
async fn test_orders_are_newest_first() {
    let app = app();
    let store_id = app.create_store(OWNER_TOKEN, "Sample Store").await;
    let store_uuid = Uuid::parse_str(&store_id).unwrap();

    let first = app
        .catalog
        .orders
        .create_with_items(Order::pending(store_uuid, &[]))
        .await
        .unwrap();
    let second = app
        .catalog
        .orders
        .create_with_items(Order::pending(store_uuid, &[]))
        .await
        .unwrap();

    let summaries: Vec<Value> = app
        .server
        .get(&format!("/api/{}/orders", store_id))
        .authorization_bearer(OWNER_TOKEN)
        .await
        .json();
    assert_eq!(summaries[0]["id"], second.id.to_string());
    assert_eq!(summaries[1]["id"], first.id.to_string());
}
