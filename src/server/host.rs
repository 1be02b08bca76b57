//! Shared state behind every route
//!
//! `ServerHost` is built once by [`ServerBuilder`](super::ServerBuilder) and
//! handed to handlers as `State<Arc<ServerHost>>`.

use crate::config::AppConfig;
use crate::core::auth::AuthProvider;
use crate::core::error::{OperationContext, RequestError, ShopResult};
use crate::core::extractors::Authenticated;
use crate::entities::store::Store;
use crate::payment::PaymentProvider;
use crate::server::entity_registry::EntityRegistry;
use crate::storage::Catalog;
use std::sync::Arc;
use uuid::Uuid;

/// Host context containing all application state
pub struct ServerHost {
    pub config: Arc<AppConfig>,

    /// Persistence for every record type
    pub catalog: Catalog,

    /// Resolves request identities
    pub auth: Arc<dyn AuthProvider>,

    /// Opens hosted payment sessions for checkout
    pub payments: Arc<dyn PaymentProvider>,

    /// Route descriptors for the REST surface
    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    pub fn new(
        config: AppConfig,
        catalog: Catalog,
        auth: Arc<dyn AuthProvider>,
        payments: Arc<dyn PaymentProvider>,
        entity_registry: EntityRegistry,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            auth,
            payments,
            entity_registry,
        }
    }

    /// Get entity types registered in the host
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }

    /// The store, if `user` owns it
    ///
    /// A missing store and someone else's store both answer 403, so callers
    /// cannot discover which store ids exist.
    pub async fn require_store_owner(
        &self,
        store_id: &Uuid,
        user: &Authenticated,
    ) -> ShopResult<Store> {
        let store = self
            .catalog
            .stores
            .get(store_id)
            .await
            .operation("STORE_OWNER")?;

        match store {
            Some(store) if store.is_owned_by(&user.user_id) => Ok(store),
            _ => {
                tracing::debug!(
                    store_id = %store_id,
                    user_id = %user.user_id,
                    "ownership check failed"
                );
                Err(RequestError::forbidden("Unauthorized").into())
            }
        }
    }
}
