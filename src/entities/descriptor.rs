//! Route descriptors for catalog resources

use axum::Router;
use axum::routing::get;
use std::marker::PhantomData;
use std::sync::Arc;

use super::handlers::{create_record, delete_record, get_record, list_records, update_record};
use super::resource::Resource;
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;

/// Mounts the five CRUD routes of a [`Resource`] under `/api/{store_id}`
pub struct CatalogDescriptor<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> CatalogDescriptor<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Resource> Default for CatalogDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> EntityDescriptor for CatalogDescriptor<T> {
    fn entity_type(&self) -> &str {
        T::resource_name_singular()
    }

    fn plural(&self) -> &str {
        T::resource_name()
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        let collection = format!("/api/{{store_id}}/{}", self.plural());
        let item = format!("{}/{{id}}", collection);

        Router::new()
            .route(&collection, get(list_records::<T>).post(create_record::<T>))
            .route(
                &item,
                get(get_record::<T>)
                    .patch(update_record::<T>)
                    .put(update_record::<T>)
                    .delete(delete_record::<T>),
            )
    }
}
