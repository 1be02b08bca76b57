//! Entity registry for collecting route descriptors

use axum::Router;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::host::ServerHost;

/// Trait that describes how to build routes for an entity
///
/// Routes stay generic over the shared state; the exposure layer attaches it
/// once with `with_state`.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "billboard")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "billboards")
    fn plural(&self) -> &str;

    fn build_routes(&self) -> Router<Arc<ServerHost>>;
}

/// Registry for all entities exposed by the server
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Register an entity descriptor, replacing one with the same type name
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge the routes of every registered descriptor
    pub fn build_routes(&self) -> Router<Arc<ServerHost>> {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
