//! Billboards: promotional banners that categories point at

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::core::error::ShopResult;
use crate::core::locale::{Lang, Localize};
use crate::core::query::LangQuery;
use crate::core::service::DataService;
use crate::core::validation::{
    EntityValidationConfig, Operation, ValidatedPayload, filters, validators,
};
use crate::entities::resource::{Resource, refuse_if_referenced};
use crate::storage::Catalog;

crate::impl_store_entity!(Billboard, "billboards", "billboard", {
    /// Default label text
    label: String,
    label_ru: Option<String>,
    label_kg: Option<String>,
    image_url: String,
});

impl Localize for Billboard {
    fn localize(mut self, lang: Lang) -> Self {
        self.label = lang.pick(
            &self.label,
            self.label_ru.as_deref(),
            self.label_kg.as_deref(),
        );
        self
    }
}

/// Create and update body for billboards
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardPayload {
    pub label: Option<String>,
    pub label_ru: Option<String>,
    pub label_kg: Option<String>,
    pub image_url: String,
}

impl ValidatedPayload for BillboardPayload {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let config = EntityValidationConfig::new("billboard")
            .filter("label", filters::trim())
            .filter("labelRu", filters::trim())
            .filter("labelKg", filters::trim())
            .filter("imageUrl", filters::trim());

        let config = match operation {
            Operation::Create => config
                .rule("label", validators::required())
                .rule("labelRu", validators::required())
                .rule("labelKg", validators::required()),
            Operation::Update => config.any_of(
                &["label", "labelRu", "labelKg"],
                "At least one label is required",
            ),
        };

        config
            .rule("imageUrl", validators::required())
            .rule("imageUrl", validators::url())
    }
}

#[async_trait]
impl Resource for Billboard {
    type Payload = BillboardPayload;
    type ListQuery = LangQuery;

    fn service(catalog: &Catalog) -> &Arc<dyn DataService<Self>> {
        &catalog.billboards
    }

    fn create_from(store_id: uuid::Uuid, payload: BillboardPayload) -> Self {
        Billboard::new(
            store_id,
            payload.label.unwrap_or_default(),
            payload.label_ru,
            payload.label_kg,
            payload.image_url,
        )
    }

    fn apply_update(&mut self, payload: BillboardPayload) {
        if let Some(label) = payload.label.filter(|l| !l.is_empty()) {
            self.label = label;
        }
        if let Some(label_ru) = payload.label_ru.filter(|l| !l.is_empty()) {
            self.label_ru = Some(label_ru);
        }
        if let Some(label_kg) = payload.label_kg.filter(|l| !l.is_empty()) {
            self.label_kg = Some(label_kg);
        }
        self.image_url = payload.image_url;
    }

    async fn check_unreferenced(&self, catalog: &Catalog) -> ShopResult<()> {
        let categories = catalog.categories.list_by_store(&self.store_id).await?;
        let using = categories
            .iter()
            .filter(|c| c.billboard_id == self.id)
            .count();
        refuse_if_referenced(
            using,
            "Make sure you removed all categories using this billboard first",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn billboard() -> Billboard {
        Billboard::new(
            uuid::Uuid::new_v4(),
            "Winter Sale".to_string(),
            Some("Зимняя распродажа".to_string()),
            None,
            "https://cdn.example.com/winter.png".to_string(),
        )
    }

    #[test]
    fn test_localize_picks_variant_with_fallback() {
        assert_eq!(billboard().localize(Lang::Ru).label, "Зимняя распродажа");
        assert_eq!(billboard().localize(Lang::Kg).label, "Winter Sale");
        assert_eq!(billboard().localize(Lang::En).label, "Winter Sale");
    }

    #[test]
    fn test_create_requires_every_label_and_image() {
        let err = BillboardPayload::from_value(
            Operation::Create,
            json!({"label": "Sale", "imageUrl": "https://x.io/a.png"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Label ru is required"));

        let err = BillboardPayload::from_value(
            Operation::Create,
            json!({"label": "Sale", "labelRu": "a", "labelKg": "b"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Image url is required"));
    }

    #[test]
    fn test_update_accepts_any_single_label() {
        let payload = BillboardPayload::from_value(
            Operation::Update,
            json!({"labelKg": "Кышкы", "imageUrl": "https://x.io/b.png"}),
        )
        .unwrap();

        let mut record = billboard();
        record.apply_update(payload);
        assert_eq!(record.label, "Winter Sale");
        assert_eq!(record.label_kg.as_deref(), Some("Кышкы"));
        assert_eq!(record.label_ru.as_deref(), Some("Зимняя распродажа"));
        assert_eq!(record.image_url, "https://x.io/b.png");
    }

    #[test]
    fn test_update_without_labels_is_rejected() {
        let err = BillboardPayload::from_value(
            Operation::Update,
            json!({"imageUrl": "https://x.io/b.png"}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "At least one label is required");
    }
}
