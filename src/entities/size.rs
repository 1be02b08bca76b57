//! Sizes offered by a store

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::ShopResult;
use crate::core::locale::{Lang, Localize};
use crate::core::query::LangQuery;
use crate::core::service::DataService;
use crate::core::validation::{
    EntityValidationConfig, Operation, ValidatedPayload, filters, validators,
};
use crate::entities::category::first_present;
use crate::entities::resource::{Resource, refuse_if_referenced};
use crate::storage::Catalog;

crate::impl_store_entity!(Size, "sizes", "size", {
    name: String,
    name_ru: Option<String>,
    name_kg: Option<String>,
    /// Short label printed on the tag, e.g. "XL"
    value: String,
});

impl Localize for Size {
    fn localize(mut self, lang: Lang) -> Self {
        self.name = lang.pick(&self.name, self.name_ru.as_deref(), self.name_kg.as_deref());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePayload {
    pub name: Option<String>,
    pub name_ru: Option<String>,
    pub name_kg: Option<String>,
    pub value: String,
}

impl ValidatedPayload for SizePayload {
    fn validation_config(_operation: Operation) -> EntityValidationConfig {
        EntityValidationConfig::new("size")
            .filter("name", filters::trim())
            .filter("nameRu", filters::blank_to_null())
            .filter("nameKg", filters::blank_to_null())
            .filter("value", filters::trim())
            .any_of(&["name", "nameRu", "nameKg"], "At least one name is required")
            .rule("value", validators::required())
    }
}

#[async_trait]
impl Resource for Size {
    type Payload = SizePayload;
    type ListQuery = LangQuery;

    fn service(catalog: &Catalog) -> &Arc<dyn DataService<Self>> {
        &catalog.sizes
    }

    fn create_from(store_id: Uuid, payload: SizePayload) -> Self {
        let name = first_present(&payload.name, &payload.name_ru, &payload.name_kg);
        Size::new(
            store_id,
            name,
            payload.name_ru,
            payload.name_kg,
            payload.value,
        )
    }

    fn apply_update(&mut self, payload: SizePayload) {
        if let Some(name) = payload.name.filter(|n| !n.is_empty()) {
            self.name = name;
        }
        if payload.name_ru.is_some() {
            self.name_ru = payload.name_ru;
        }
        if payload.name_kg.is_some() {
            self.name_kg = payload.name_kg;
        }
        self.value = payload.value;
    }

    async fn check_unreferenced(&self, catalog: &Catalog) -> ShopResult<()> {
        let products = catalog.products.list_by_store(&self.store_id).await?;
        let using = products
            .iter()
            .filter(|p| p.size_id == Some(self.id))
            .count();
        refuse_if_referenced(
            using,
            "Make sure you removed all products using this size first",
        )
    }
}
