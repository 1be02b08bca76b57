//! The set of services backing one deployment

use crate::core::service::{DataService, OrderService};
use crate::entities::billboard::Billboard;
use crate::entities::category::Category;
use crate::entities::color::Color;
use crate::entities::order::Order;
use crate::entities::product::Product;
use crate::entities::size::Size;
use crate::entities::store::Store;
use crate::storage::in_memory::InMemoryDataService;
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Every persistence seam the handlers use
///
/// Fields are public so a deployment (or a test) can swap a single backend
/// while keeping the rest, e.g. `Catalog { products, ..Catalog::in_memory() }`.
#[derive(Clone)]
pub struct Catalog {
    pub stores: Arc<dyn DataService<Store>>,
    pub billboards: Arc<dyn DataService<Billboard>>,
    pub categories: Arc<dyn DataService<Category>>,
    pub sizes: Arc<dyn DataService<Size>>,
    pub colors: Arc<dyn DataService<Color>>,
    pub products: Arc<dyn DataService<Product>>,
    pub orders: Arc<dyn OrderService>,
}

impl Catalog {
    /// A catalog where every service is in-memory
    pub fn in_memory() -> Self {
        Self {
            stores: Arc::new(InMemoryDataService::<Store>::new()),
            billboards: Arc::new(InMemoryDataService::<Billboard>::new()),
            categories: Arc::new(InMemoryDataService::<Category>::new()),
            sizes: Arc::new(InMemoryDataService::<Size>::new()),
            colors: Arc::new(InMemoryDataService::<Color>::new()),
            products: Arc::new(InMemoryDataService::<Product>::new()),
            orders: Arc::new(InMemoryDataService::<Order>::new()),
        }
    }

    /// Whether a store still owns catalog records
    pub async fn store_has_records(&self, store_id: &Uuid) -> Result<bool> {
        Ok(!self.billboards.list_by_store(store_id).await?.is_empty()
            || !self.categories.list_by_store(store_id).await?.is_empty()
            || !self.sizes.list_by_store(store_id).await?.is_empty()
            || !self.colors.list_by_store(store_id).await?.is_empty()
            || !self.products.list_by_store(store_id).await?.is_empty())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::in_memory()
    }
}
