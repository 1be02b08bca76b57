//! Categories group products and point at a billboard

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::ShopResult;
use crate::core::locale::{Lang, Localize};
use crate::core::query::LangQuery;
use crate::core::service::DataService;
use crate::core::validation::{
    EntityValidationConfig, Operation, ValidatedPayload, filters, validators,
};
use crate::entities::resource::{Resource, ensure_in_store, refuse_if_referenced};
use crate::storage::Catalog;

crate::impl_store_entity!(Category, "categories", "category", {
    name: String,
    name_ru: Option<String>,
    name_kg: Option<String>,
    billboard_id: Uuid,
});

impl Localize for Category {
    fn localize(mut self, lang: Lang) -> Self {
        self.name = lang.pick(&self.name, self.name_ru.as_deref(), self.name_kg.as_deref());
        self
    }
}

/// Create and update body for categories
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub name_ru: Option<String>,
    pub name_kg: Option<String>,
    pub billboard_id: Uuid,
}

impl ValidatedPayload for CategoryPayload {
    fn validation_config(_operation: Operation) -> EntityValidationConfig {
        EntityValidationConfig::new("category")
            .filter("name", filters::trim())
            .filter("nameRu", filters::blank_to_null())
            .filter("nameKg", filters::blank_to_null())
            .filter("billboardId", filters::trim())
            .any_of(&["name", "nameRu", "nameKg"], "At least one name is required")
            .rule("billboardId", validators::required())
            .rule("billboardId", validators::uuid())
    }
}

#[async_trait]
impl Resource for Category {
    type Payload = CategoryPayload;
    type ListQuery = LangQuery;

    fn service(catalog: &Catalog) -> &Arc<dyn DataService<Self>> {
        &catalog.categories
    }

    fn create_from(store_id: Uuid, payload: CategoryPayload) -> Self {
        let name = first_present(&payload.name, &payload.name_ru, &payload.name_kg);
        Category::new(
            store_id,
            name,
            payload.name_ru,
            payload.name_kg,
            payload.billboard_id,
        )
    }

    fn apply_update(&mut self, payload: CategoryPayload) {
        if let Some(name) = payload.name.filter(|n| !n.is_empty()) {
            self.name = name;
        }
        if payload.name_ru.is_some() {
            self.name_ru = payload.name_ru;
        }
        if payload.name_kg.is_some() {
            self.name_kg = payload.name_kg;
        }
        self.billboard_id = payload.billboard_id;
    }

    async fn check_references(
        catalog: &Catalog,
        store_id: Uuid,
        payload: &CategoryPayload,
    ) -> ShopResult<()> {
        ensure_in_store(
            &catalog.billboards,
            store_id,
            "billboardId",
            payload.billboard_id,
        )
        .await?;
        Ok(())
    }

    async fn check_unreferenced(&self, catalog: &Catalog) -> ShopResult<()> {
        let products = catalog.products.list_by_store(&self.store_id).await?;
        let using = products
            .iter()
            .filter(|p| p.category_id == self.id)
            .count();
        refuse_if_referenced(
            using,
            "Make sure you removed all products using this category first",
        )
    }

    async fn present(self, catalog: &Catalog, lang: Lang) -> anyhow::Result<Value> {
        let billboard = catalog
            .billboards
            .get(&self.billboard_id)
            .await?
            .map(|b| b.localize(lang));

        let mut json = serde_json::to_value(self.localize(lang))?;
        json["billboard"] = serde_json::to_value(billboard)?;
        Ok(json)
    }
}

/// The default text of a record created with only a localized name
pub(crate) fn first_present(
    default: &Option<String>,
    ru: &Option<String>,
    kg: &Option<String>,
) -> String {
    [default, ru, kg]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .cloned()
        .unwrap_or_default()
}
