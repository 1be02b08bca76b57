//! # shopdesk
//!
//! A store-scoped catalog administration API with a hosted-payment checkout.
//!
//! ## Features
//!
//! - **Stores**: each owner manages their own stores; every other route is
//!   scoped under `/api/{store_id}`
//! - **Catalog**: billboards, categories, sizes, colors and products with
//!   English, Russian and Kyrgyz text selected through `?lang=`
//! - **Checkout**: server-side pricing, an unpaid order and a hosted payment
//!   session; a signed webhook marks the order paid
//! - **Orders**: an owner overview with product names, quantities and totals
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shopdesk::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_config(AppConfig::load()?)
//!     .with_default_descriptors()
//!     .build()?;
//! ```

pub mod checkout;
pub mod config;
pub mod core;
pub mod demo;
pub mod entities;
pub mod payment;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthProvider, NoAuthProvider, StaticTokenAuthProvider},
        entity::Entity,
        error::{ShopError, ShopResult},
        extractors::Authenticated,
        locale::{Lang, Localize},
        service::{DataService, OrderService},
    };

    // === Macros ===
    pub use crate::impl_store_entity;

    // === Records ===
    pub use crate::entities::{
        Billboard, Category, Color, Image, Order, OrderItem, Product, Resource, Size, Store,
    };

    // === Checkout and payments ===
    pub use crate::checkout::{CheckoutRequest, CheckoutResponse, CheckoutSettings};
    pub use crate::payment::{PaymentProvider, RecordingPaymentProvider, StripePaymentProvider};

    // === Storage ===
    pub use crate::storage::{Catalog, InMemoryDataService};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
