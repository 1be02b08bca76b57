//! Shared harness for the HTTP-level tests.
//!
//! Builds the full REST router over an in-memory catalog, two bearer
//! identities and a recording payment provider.

#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use shopdesk::config::AppConfig;
use shopdesk::core::auth::StaticTokenAuthProvider;
use shopdesk::payment::RecordingPaymentProvider;
use shopdesk::server::ServerBuilder;
use shopdesk::storage::Catalog;
use std::sync::Arc;

pub const OWNER: &str = "owner-1";
pub const OWNER_TOKEN: &str = "owner-token";
pub const OTHER: &str = "owner-2";
pub const OTHER_TOKEN: &str = "other-token";
pub const WEBHOOK_SECRET: &str = "whsec_test_secret";
pub const FRONTEND_URL: &str = "http://shop.test";

pub struct TestApp {
    pub server: TestServer,
    pub catalog: Catalog,
    pub payments: RecordingPaymentProvider,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.frontend_store_url = FRONTEND_URL.to_string();
    config.payment.webhook_secret = Some(WEBHOOK_SECRET.to_string());
    config
}

pub fn app() -> TestApp {
    app_with(Catalog::in_memory(), RecordingPaymentProvider::new())
}

pub fn app_with(catalog: Catalog, payments: RecordingPaymentProvider) -> TestApp {
    app_with_config(test_config(), catalog, payments)
}

pub fn app_with_config(
    config: AppConfig,
    catalog: Catalog,
    payments: RecordingPaymentProvider,
) -> TestApp {
    let auth = StaticTokenAuthProvider::default()
        .with_token(OWNER_TOKEN, OWNER)
        .with_token(OTHER_TOKEN, OTHER);

    let router = ServerBuilder::new()
        .with_config(config)
        .with_catalog(catalog.clone())
        .with_auth_provider(auth)
        .with_payment_provider(Arc::new(payments.clone()))
        .with_default_descriptors()
        .build()
        .unwrap();

    TestApp {
        server: TestServer::new(router),
        catalog,
        payments,
    }
}

impl TestApp {
    /// Create a store owned by the holder of `token`, returning its id
    pub async fn create_store(&self, token: &str, name: &str) -> String {
        let response = self
            .server
            .post("/api/stores")
            .authorization_bearer(token)
            .json(&json!({ "name": name }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["id"].as_str().unwrap().to_string()
    }

    /// POST a record as the owner and return the created body
    pub async fn create(&self, store_id: &str, plural: &str, body: Value) -> Value {
        let response = self
            .server
            .post(&format!("/api/{}/{}", store_id, plural))
            .authorization_bearer(OWNER_TOKEN)
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    pub async fn billboard(&self, store_id: &str) -> Value {
        self.create(
            store_id,
            "billboards",
            json!({
                "label": "Winter Sale",
                "labelRu": "Зимняя распродажа",
                "labelKg": "Кышкы арзандатуу",
                "imageUrl": "https://cdn.example.com/winter.png"
            }),
        )
        .await
    }

    pub async fn category(&self, store_id: &str, billboard_id: &str) -> Value {
        self.create(
            store_id,
            "categories",
            json!({
                "name": "Clothing",
                "nameRu": "Одежда",
                "billboardId": billboard_id
            }),
        )
        .await
    }

    pub async fn size(&self, store_id: &str) -> Value {
        self.create(store_id, "sizes", json!({ "name": "Large", "value": "L" }))
            .await
    }

    pub async fn color(&self, store_id: &str) -> Value {
        self.create(
            store_id,
            "colors",
            json!({ "name": "Red", "nameKg": "Кызыл", "value": "#FF0000" }),
        )
        .await
    }

    /// A store with one billboard, category, size and color
    pub async fn stocked_store(&self) -> Fixture {
        let store_id = self.create_store(OWNER_TOKEN, "Sample Store").await;
        let billboard = self.billboard(&store_id).await;
        let category = self
            .category(&store_id, billboard["id"].as_str().unwrap())
            .await;
        let size = self.size(&store_id).await;
        let color = self.color(&store_id).await;

        Fixture {
            store_id,
            billboard_id: id_of(&billboard),
            category_id: id_of(&category),
            size_id: id_of(&size),
            color_id: id_of(&color),
        }
    }

    pub async fn product(&self, fixture: &Fixture, name: &str, price: &str) -> Value {
        self.create(&fixture.store_id, "products", fixture.product_body(name, price))
            .await
    }
}

pub struct Fixture {
    pub store_id: String,
    pub billboard_id: String,
    pub category_id: String,
    pub size_id: String,
    pub color_id: String,
}

impl Fixture {
    pub fn product_body(&self, name: &str, price: &str) -> Value {
        json!({
            "name": name,
            "description": format!("{} description", name),
            "price": price,
            "weight": "0.5",
            "categoryId": self.category_id,
            "colorId": self.color_id,
            "sizeId": self.size_id,
            "images": [{ "url": "https://cdn.example.com/p.png" }]
        })
    }
}

pub fn id_of(body: &Value) -> String {
    body["id"].as_str().unwrap().to_string()
}
