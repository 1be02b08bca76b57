//! Base trait shared by every persisted record

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// A record owned by a store
///
/// Everything the catalog persists implements this trait: stores themselves,
/// the five admin-managed record types and orders. Storage backends only rely
/// on these accessors, so they stay agnostic of the concrete record shape.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Plural resource name used in routes and logs (e.g. "billboards")
    fn resource_name() -> &'static str;

    /// Singular resource name used in messages (e.g. "billboard")
    fn resource_name_singular() -> &'static str;

    fn id(&self) -> Uuid;

    /// Store that owns this record; a store returns its own id
    fn store_id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Refresh `updated_at` after a mutation
    fn touch(&mut self);
}

/// Operation tag used in log lines, e.g. `BILLBOARDS_POST`
pub fn operation_tag<T: Entity>(method: &str) -> String {
    format!("{}_{}", T::resource_name().to_uppercase(), method)
}
