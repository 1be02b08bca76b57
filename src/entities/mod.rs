//! Records managed by shopdesk and their routes

pub mod macros;

pub mod billboard;
pub mod category;
pub mod color;
pub mod descriptor;
pub mod handlers;
pub mod order;
pub mod product;
pub mod resource;
pub mod size;
pub mod store;

pub use billboard::Billboard;
pub use category::Category;
pub use color::Color;
pub use descriptor::CatalogDescriptor;
pub use order::{Order, OrderDescriptor, OrderItem};
pub use product::{Image, Product};
pub use resource::Resource;
pub use size::Size;
pub use store::{Store, StoreDescriptor};
