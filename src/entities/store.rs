//! Stores: the tenant scope every other record belongs to
//!
//! Routes under `/api/stores` are always authenticated; a caller only ever
//! sees the stores they own.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::entity::Entity;
use crate::core::error::{EntityError, OperationContext, ShopResult};
use crate::core::extractors::{Authenticated, parse_uuid};
use crate::core::validation::{
    EntityValidationConfig, Operation, Validated, ValidatedPayload, filters, validators,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    /// Identity of the owner as reported by the auth provider
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl Entity for Store {
    fn resource_name() -> &'static str {
        "stores"
    }

    fn resource_name_singular() -> &'static str {
        "store"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn store_id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorePayload {
    pub name: String,
}

impl ValidatedPayload for StorePayload {
    fn validation_config(_operation: Operation) -> EntityValidationConfig {
        EntityValidationConfig::new("store")
            .filter("name", filters::trim())
            .rule("name", validators::required())
    }
}

// =============================================================================
// Handlers
// =============================================================================

pub async fn create_store(
    State(host): State<Arc<ServerHost>>,
    user: Authenticated,
    Validated(payload): Validated<StorePayload>,
) -> ShopResult<(StatusCode, Json<Store>)> {
    let store = Store::new(payload.name, user.user_id);
    let created = host
        .catalog
        .stores
        .create(store)
        .await
        .operation("STORES_POST")?;

    tracing::info!(store_id = %created.id, owner = %created.user_id, "store created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_stores(
    State(host): State<Arc<ServerHost>>,
    user: Authenticated,
) -> ShopResult<Json<Vec<Store>>> {
    let stores = host
        .catalog
        .stores
        .list()
        .await
        .operation("STORES_GET")?
        .into_iter()
        .filter(|s| s.is_owned_by(&user.user_id))
        .collect();

    Ok(Json(stores))
}

pub async fn get_store(
    State(host): State<Arc<ServerHost>>,
    Path(store_id): Path<String>,
    user: Authenticated,
) -> ShopResult<Json<Store>> {
    let store_id = parse_uuid("Store id", &store_id)?;
    let store = host.require_store_owner(&store_id, &user).await?;
    Ok(Json(store))
}

pub async fn update_store(
    State(host): State<Arc<ServerHost>>,
    Path(store_id): Path<String>,
    user: Authenticated,
    Validated(payload): Validated<StorePayload>,
) -> ShopResult<Json<Store>> {
    let store_id = parse_uuid("Store id", &store_id)?;
    let mut store = host.require_store_owner(&store_id, &user).await?;

    store.name = payload.name;
    store.touch();

    let updated = host
        .catalog
        .stores
        .update(&store_id, store)
        .await
        .operation("STORE_PATCH")?;
    Ok(Json(updated))
}

/// Delete a store once it no longer owns catalog records; its orders go with it
pub async fn delete_store(
    State(host): State<Arc<ServerHost>>,
    Path(store_id): Path<String>,
    user: Authenticated,
) -> ShopResult<Json<Store>> {
    let store_id = parse_uuid("Store id", &store_id)?;
    host.require_store_owner(&store_id, &user).await?;

    if host
        .catalog
        .store_has_records(&store_id)
        .await
        .operation("STORE_DELETE")?
    {
        return Err(EntityError::in_use(
            "Make sure you removed all products and categories first",
        )
        .into());
    }

    let orders = host
        .catalog
        .orders
        .delete_by_store(&store_id)
        .await
        .operation("STORE_DELETE")?;
    let deleted = host
        .catalog
        .stores
        .delete(&store_id)
        .await
        .operation("STORE_DELETE")?
        .ok_or_else(|| EntityError::not_found("store", store_id))?;

    tracing::info!(store_id = %store_id, orders_removed = orders, "store deleted");
    Ok(Json(deleted))
}

/// Routes for `/api/stores`
pub struct StoreDescriptor;

impl EntityDescriptor for StoreDescriptor {
    fn entity_type(&self) -> &str {
        Store::resource_name_singular()
    }

    fn plural(&self) -> &str {
        Store::resource_name()
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        let collection = format!("/api/{}", self.plural());
        let item = format!("{}/{{store_id}}", collection);

        Router::new()
            .route(&collection, get(list_stores).post(create_store))
            .route(
                &item,
                get(get_store).patch(update_store).delete(delete_store),
            )
    }
}
