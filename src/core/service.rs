//! Service traits for catalog and order persistence

use crate::core::entity::Entity;
use crate::entities::order::Order;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for managing catalog records
///
/// Implementations provide CRUD operations for a specific record type.
/// Handlers never see the storage mechanism, only this trait.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Persist a new record
    async fn create(&self, entity: T) -> Result<T>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// Fetch several records in one call
    ///
    /// Unknown ids are skipped. The result follows the order of `ids`.
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>>;

    /// List every record, oldest first
    async fn list(&self) -> Result<Vec<T>>;

    /// List the records owned by one store, oldest first
    async fn list_by_store(&self, store_id: &Uuid) -> Result<Vec<T>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|entity| &entity.store_id() == store_id)
            .collect())
    }

    /// Replace an existing record
    ///
    /// Fails when no record with `id` exists.
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Delete a record, returning it when it existed
    async fn delete(&self, id: &Uuid) -> Result<Option<T>>;

    /// Delete every record owned by a store, returning how many went away
    async fn delete_by_store(&self, store_id: &Uuid) -> Result<usize> {
        let owned = self.list_by_store(store_id).await?;
        let mut removed = 0;
        for entity in owned {
            if self.delete(&entity.id()).await?.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Service trait for orders
///
/// An order and its items are written together; items are never created or
/// changed on their own.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Persist an order together with its items in one step
    async fn create_with_items(&self, order: Order) -> Result<Order>;

    async fn get(&self, id: &Uuid) -> Result<Option<Order>>;

    /// Orders of one store, newest first
    async fn list_by_store(&self, store_id: &Uuid) -> Result<Vec<Order>>;

    /// Flip an order to paid and record the shipping contact
    ///
    /// Returns `None` when the order does not exist.
    async fn mark_paid(&self, id: &Uuid, phone: &str, address: &str) -> Result<Option<Order>>;

    async fn delete_by_store(&self, store_id: &Uuid) -> Result<usize>;
}
