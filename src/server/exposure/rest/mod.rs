//! REST API exposure
//!
//! Merges health, entity, checkout and webhook routes, then wraps them in
//! CORS and request tracing. CORS is open to any origin so the storefront can
//! call checkout from its own domain.

use super::super::host::ServerHost;
use crate::checkout::handlers::create_checkout;
use crate::payment::webhook::handle_webhook;
use anyhow::Result;
use axum::http::{HeaderName, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Store, catalog and order routes
    /// - Checkout and webhook routes
    /// - Custom routes
    pub fn build_router(
        host: Arc<ServerHost>,
        custom_routes: Vec<Router<Arc<ServerHost>>>,
    ) -> Result<Router> {
        let mut app = Self::health_routes()
            .merge(host.entity_registry.build_routes())
            .merge(Self::payment_routes());

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app
            .layer(Self::cors_layer())
            .layer(TraceLayer::new_for_http())
            .with_state(host))
    }

    fn health_routes() -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    fn payment_routes() -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/api/{store_id}/checkout", post(create_checkout))
            .route("/api/webhook", post(handle_webhook))
    }

    fn cors_layer() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                HeaderName::from_static("x-requested-with"),
            ])
            .max_age(Duration::from_secs(3600))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "shopdesk"
        }))
    }
}
