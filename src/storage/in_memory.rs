//! In-memory storage for development and tests
//!
//! Records live in an insertion-ordered map behind a `RwLock`, so listing
//! returns them oldest first without sorting.

use crate::core::entity::Entity;
use crate::core::error::{EntityError, ShopError};
use crate::core::service::{DataService, OrderService};
use crate::entities::order::Order;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory data service implementation
///
/// Cloning shares the underlying map.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    records: Arc<RwLock<IndexMap<Uuid, T>>>,
}

impl<T> InMemoryDataService<T> {
    /// Create an empty service
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexMap<Uuid, T>>> {
        self.records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexMap<Uuid, T>>> {
        self.records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut records = self.write()?;
        records.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>> {
        let records = self.read()?;
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn list_by_store(&self, store_id: &Uuid) -> Result<Vec<T>> {
        Ok(self
            .read()?
            .values()
            .filter(|entity| &entity.store_id() == store_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut records = self.write()?;

        let slot = records.get_mut(id).ok_or_else(|| {
            ShopError::from(EntityError::not_found(T::resource_name_singular(), *id))
        })?;
        *slot = entity.clone();

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<Option<T>> {
        Ok(self.write()?.shift_remove(id))
    }

    async fn delete_by_store(&self, store_id: &Uuid) -> Result<usize> {
        let mut records = self.write()?;
        let before = records.len();
        records.retain(|_, entity| &entity.store_id() != store_id);
        Ok(before - records.len())
    }
}

#[async_trait]
impl OrderService for InMemoryDataService<Order> {
    async fn create_with_items(&self, order: Order) -> Result<Order> {
        // one insert under one lock: the order and its items land together
        DataService::create(self, order).await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Order>> {
        DataService::get(self, id).await
    }

    async fn list_by_store(&self, store_id: &Uuid) -> Result<Vec<Order>> {
        let mut orders = DataService::list_by_store(self, store_id).await?;
        orders.reverse();
        Ok(orders)
    }

    async fn mark_paid(&self, id: &Uuid, phone: &str, address: &str) -> Result<Option<Order>> {
        let mut records = self.write()?;

        let Some(order) = records.get_mut(id) else {
            return Ok(None);
        };
        order.is_paid = true;
        order.phone = phone.to_string();
        order.address = address.to_string();
        order.touch();

        Ok(Some(order.clone()))
    }

    async fn delete_by_store(&self, store_id: &Uuid) -> Result<usize> {
        DataService::delete_by_store(self, store_id).await
    }
}
