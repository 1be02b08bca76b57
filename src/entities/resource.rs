//! The seam between generic CRUD handlers and each catalog record type

use crate::core::entity::Entity;
use crate::core::error::{EntityError, ShopError, ShopResult};
use crate::core::locale::{Lang, Localize};
use crate::core::query::HasLang;
use crate::core::service::DataService;
use crate::core::validation::ValidatedPayload;
use crate::storage::Catalog;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A record type managed through the admin CRUD routes
///
/// Implementors describe how payloads become records, which references must
/// resolve, when deletion is refused and how reads are shaped. The generic
/// handlers in [`handlers`](super::handlers) do the rest.
#[async_trait]
pub trait Resource: Entity + Localize {
    /// Body accepted by create and update
    type Payload: ValidatedPayload + Send + Sync + 'static;

    /// Query string accepted by the list route
    type ListQuery: DeserializeOwned + HasLang + Send + Sync + 'static;

    /// Service holding this record type
    fn service(catalog: &Catalog) -> &Arc<dyn DataService<Self>>;

    /// Build a fresh record from a validated create payload
    fn create_from(store_id: Uuid, payload: Self::Payload) -> Self;

    /// Apply a validated update payload
    fn apply_update(&mut self, payload: Self::Payload);

    /// Check that ids referenced by the payload exist in the same store
    async fn check_references(
        _catalog: &Catalog,
        _store_id: Uuid,
        _payload: &Self::Payload,
    ) -> ShopResult<()> {
        Ok(())
    }

    /// Refuse deletion while other records point at this one
    async fn check_unreferenced(&self, _catalog: &Catalog) -> ShopResult<()> {
        Ok(())
    }

    /// Records returned by the list route
    async fn list_records(
        catalog: &Catalog,
        store_id: Uuid,
        _query: &Self::ListQuery,
    ) -> ShopResult<Vec<Self>> {
        Ok(Self::service(catalog).list_by_store(&store_id).await?)
    }

    /// JSON shape returned by reads
    async fn present(self, _catalog: &Catalog, lang: Lang) -> anyhow::Result<Value> {
        Ok(serde_json::to_value(self.localize(lang))?)
    }
}

/// Resolve `id` to a record of the same store or fail with a 400
pub async fn ensure_in_store<T: Entity>(
    service: &Arc<dyn DataService<T>>,
    store_id: Uuid,
    field: &str,
    id: Uuid,
) -> ShopResult<T> {
    match service.get(&id).await? {
        Some(record) if record.store_id() == store_id => Ok(record),
        _ => Err(EntityError::InvalidReference {
            entity_type: T::resource_name_singular().to_string(),
            field: field.to_string(),
            id,
        }
        .into()),
    }
}

/// Fetch a record of the given store, treating other stores' records as missing
pub async fn find_in_store<T: Entity>(
    service: &Arc<dyn DataService<T>>,
    store_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<T>> {
    Ok(service
        .get(&id)
        .await?
        .filter(|record| record.store_id() == store_id))
}

/// Fail with 409 when `count` other records still reference the target
pub fn refuse_if_referenced(count: usize, message: &str) -> Result<(), ShopError> {
    if count > 0 {
        Err(EntityError::in_use(message).into())
    } else {
        Ok(())
    }
}
