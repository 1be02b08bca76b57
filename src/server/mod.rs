//! HTTP server assembly
//!
//! [`ServerBuilder`] collects configuration, services and route descriptors
//! into a [`ServerHost`] and exposes it over REST.

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use host::ServerHost;
