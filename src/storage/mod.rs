//! Storage implementations
//!
//! Only the in-memory backend ships; a relational backend implements the
//! same [`DataService`](crate::core::DataService) and
//! [`OrderService`](crate::core::OrderService) traits.

pub mod catalog;
pub mod in_memory;

pub use catalog::Catalog;
pub use in_memory::InMemoryDataService;
