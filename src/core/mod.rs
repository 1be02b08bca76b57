//! Core module containing fundamental traits and types for shopdesk

pub mod auth;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod locale;
pub mod query;
pub mod service;
pub mod validation;

pub use auth::{AuthContext, AuthProvider, NoAuthProvider, StaticTokenAuthProvider};
pub use entity::Entity;
pub use error::{ShopError, ShopResult};
pub use extractors::Authenticated;
pub use locale::{Lang, Localize};
pub use service::{DataService, OrderService};
