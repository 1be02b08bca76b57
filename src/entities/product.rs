//! Products and their images
//!
//! Prices and weights are fixed-point decimals. The product list is the
//! storefront's main query, so it carries its own filters: category, color
//! and size id lists plus a featured flag. Archived products never appear in
//! the list but stay readable by id, because existing orders point at them.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::ShopResult;
use crate::core::locale::{Lang, Localize};
use crate::core::query::ProductQuery;
use crate::core::service::DataService;
use crate::core::validation::{
    EntityValidationConfig, Operation, ValidatedPayload, filters, validators,
};
use crate::entities::category::first_present;
use crate::entities::resource::{Resource, ensure_in_store};
use crate::storage::Catalog;

/// An image attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: Uuid,
    pub url: String,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
        }
    }
}

crate::impl_store_entity!(Product, "products", "product", {
    name: String,
    name_ru: Option<String>,
    name_kg: Option<String>,
    description: String,
    description_ru: Option<String>,
    description_kg: Option<String>,
    /// Unit price in the store currency
    price: Decimal,
    weight: Decimal,
    category_id: Uuid,
    color_id: Uuid,
    size_id: Option<Uuid>,
    is_featured: bool,
    is_archived: bool,
    images: Vec<Image>,
});

impl Localize for Product {
    fn localize(mut self, lang: Lang) -> Self {
        self.name = lang.pick(&self.name, self.name_ru.as_deref(), self.name_kg.as_deref());
        self.description = lang.pick(
            &self.description,
            self.description_ru.as_deref(),
            self.description_kg.as_deref(),
        );
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageInput {
    pub url: String,
}

/// Create and update body for products
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: Option<String>,
    pub name_ru: Option<String>,
    pub name_kg: Option<String>,
    pub description: Option<String>,
    pub description_ru: Option<String>,
    pub description_kg: Option<String>,
    pub price: Decimal,
    pub weight: Decimal,
    pub category_id: Uuid,
    pub color_id: Uuid,
    #[serde(default)]
    pub size_id: Option<Uuid>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
    pub images: Vec<ImageInput>,
}

impl ValidatedPayload for ProductPayload {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let config = EntityValidationConfig::new("product")
            .filter("name", filters::trim())
            .filter("nameRu", filters::blank_to_null())
            .filter("nameKg", filters::blank_to_null())
            .filter("description", filters::trim())
            .filter("descriptionRu", filters::blank_to_null())
            .filter("descriptionKg", filters::blank_to_null())
            .filter("price", filters::round_decimals(2))
            .filter("weight", filters::round_decimals(3))
            .filter("sizeId", filters::blank_to_null());

        let config = match operation {
            Operation::Create => config
                .rule("name", validators::required())
                .rule("description", validators::required()),
            Operation::Update => config
                .any_of(&["name", "nameRu", "nameKg"], "At least one name is required")
                .any_of(
                    &["description", "descriptionRu", "descriptionKg"],
                    "At least one description is required",
                )
                .rule("sizeId", validators::required()),
        };

        config
            .rule("price", validators::required())
            .rule("price", validators::positive())
            .rule("weight", validators::required())
            .rule("weight", validators::positive())
            .rule("categoryId", validators::required())
            .rule("categoryId", validators::uuid())
            .rule("colorId", validators::required())
            .rule("colorId", validators::uuid())
            .rule("sizeId", validators::uuid())
            .rule("images", validators::required())
            .rule("images", validators::image_list())
    }
}

#[async_trait]
impl Resource for Product {
    type Payload = ProductPayload;
    type ListQuery = ProductQuery;

    fn service(catalog: &Catalog) -> &Arc<dyn DataService<Self>> {
        &catalog.products
    }

    fn create_from(store_id: Uuid, payload: ProductPayload) -> Self {
        let name = first_present(&payload.name, &payload.name_ru, &payload.name_kg);
        let description = first_present(
            &payload.description,
            &payload.description_ru,
            &payload.description_kg,
        );

        Product::new(
            store_id,
            name,
            payload.name_ru,
            payload.name_kg,
            description,
            payload.description_ru,
            payload.description_kg,
            payload.price,
            payload.weight,
            payload.category_id,
            payload.color_id,
            payload.size_id,
            payload.is_featured,
            payload.is_archived,
            payload.images.into_iter().map(|i| Image::new(i.url)).collect(),
        )
    }

    fn apply_update(&mut self, payload: ProductPayload) {
        if let Some(name) = payload.name.filter(|n| !n.is_empty()) {
            self.name = name;
        }
        if payload.name_ru.is_some() {
            self.name_ru = payload.name_ru;
        }
        if payload.name_kg.is_some() {
            self.name_kg = payload.name_kg;
        }
        if let Some(description) = payload.description.filter(|d| !d.is_empty()) {
            self.description = description;
        }
        if payload.description_ru.is_some() {
            self.description_ru = payload.description_ru;
        }
        if payload.description_kg.is_some() {
            self.description_kg = payload.description_kg;
        }
        self.price = payload.price;
        self.weight = payload.weight;
        self.category_id = payload.category_id;
        self.color_id = payload.color_id;
        self.size_id = payload.size_id;
        self.is_featured = payload.is_featured;
        self.is_archived = payload.is_archived;
        self.images = payload
            .images
            .into_iter()
            .map(|i| Image::new(i.url))
            .collect();
    }

    async fn check_references(
        catalog: &Catalog,
        store_id: Uuid,
        payload: &ProductPayload,
    ) -> ShopResult<()> {
        ensure_in_store(
            &catalog.categories,
            store_id,
            "categoryId",
            payload.category_id,
        )
        .await?;
        ensure_in_store(&catalog.colors, store_id, "colorId", payload.color_id).await?;
        if let Some(size_id) = payload.size_id {
            ensure_in_store(&catalog.sizes, store_id, "sizeId", size_id).await?;
        }
        Ok(())
    }

    async fn list_records(
        catalog: &Catalog,
        store_id: Uuid,
        query: &ProductQuery,
    ) -> ShopResult<Vec<Self>> {
        let filter = ProductFilter::from_query(query)?;
        let mut products: Vec<Product> = catalog
            .products
            .list_by_store(&store_id)
            .await?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();

        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn present(self, catalog: &Catalog, lang: Lang) -> anyhow::Result<Value> {
        let category = catalog
            .categories
            .get(&self.category_id)
            .await?
            .map(|c| c.localize(lang));
        let color = catalog
            .colors
            .get(&self.color_id)
            .await?
            .map(|c| c.localize(lang));
        let size = match self.size_id {
            Some(id) => catalog.sizes.get(&id).await?.map(|s| s.localize(lang)),
            None => None,
        };

        let mut json = serde_json::to_value(self.localize(lang))?;
        json["category"] = serde_json::to_value(category)?;
        json["color"] = serde_json::to_value(color)?;
        json["size"] = serde_json::to_value(size)?;
        Ok(json)
    }
}

/// Parsed product list filters
#[derive(Debug, Default)]
pub struct ProductFilter {
    pub category_ids: Option<Vec<Uuid>>,
    pub color_ids: Option<Vec<Uuid>>,
    pub size_ids: Option<Vec<Uuid>>,
    pub featured_only: bool,
}

impl ProductFilter {
    pub fn from_query(query: &ProductQuery) -> ShopResult<Self> {
        Ok(Self {
            category_ids: query.category_ids()?,
            color_ids: query.color_ids()?,
            size_ids: query.size_ids()?,
            featured_only: query.featured_only(),
        })
    }

    pub fn matches(&self, product: &Product) -> bool {
        if product.is_archived {
            return false;
        }
        if self.featured_only && !product.is_featured {
            return false;
        }
        if let Some(ids) = &self.category_ids {
            if !ids.contains(&product.category_id) {
                return false;
            }
        }
        if let Some(ids) = &self.color_ids {
            if !ids.contains(&product.color_id) {
                return false;
            }
        }
        if let Some(ids) = &self.size_ids {
            if !product.size_id.is_some_and(|id| ids.contains(&id)) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn product(category_id: Uuid, featured: bool, archived: bool) -> Product {
        Product::new(
            Uuid::new_v4(),
            "Red Jacket".to_string(),
            Some("Красная куртка".to_string()),
            None,
            "Warm".to_string(),
            None,
            Some("Жылуу".to_string()),
            Decimal::from_str("79.99").unwrap(),
            Decimal::ONE,
            category_id,
            Uuid::new_v4(),
            None,
            featured,
            archived,
            vec![Image::new("https://cdn.example.com/1.png")],
        )
    }

    fn valid_body() -> Value {
        json!({
            "name": "Red Jacket",
            "description": "Warm",
            "price": 79.99,
            "weight": "1.2",
            "categoryId": Uuid::new_v4(),
            "colorId": Uuid::new_v4(),
            "images": [{"url": "https://cdn.example.com/1.png"}]
        })
    }

    #[test]
    fn test_price_is_parsed_as_exact_decimal() {
        let payload = ProductPayload::from_value(Operation::Create, valid_body()).unwrap();
        assert_eq!(payload.price, Decimal::from_str("79.99").unwrap());
        assert_eq!(payload.weight, Decimal::from_str("1.2").unwrap());
        assert_eq!(payload.size_id, None);
    }

    #[test]
    fn test_price_must_be_positive() {
        let mut body = valid_body();
        body["price"] = json!(0);
        let err = ProductPayload::from_value(Operation::Create, body).unwrap_err();
        assert_eq!(err.to_string(), "Price must be greater than 0");
    }

    #[test]
    fn test_images_are_required() {
        let mut body = valid_body();
        body["images"] = json!([]);
        let err = ProductPayload::from_value(Operation::Create, body).unwrap_err();
        assert_eq!(err.to_string(), "Images is required");
    }

    #[test]
    fn test_update_requires_size() {
        let err = ProductPayload::from_value(Operation::Update, valid_body()).unwrap_err();
        assert_eq!(err.to_string(), "Size id is required");
    }

    #[test]
    fn test_update_replaces_images() {
        let mut record = product(Uuid::new_v4(), false, false);
        let old_image = record.images[0].id;

        let mut body = valid_body();
        body["sizeId"] = json!(Uuid::new_v4());
        body["images"] = json!([
            { "url": "https://cdn.example.com/a.png" },
            { "url": "https://cdn.example.com/b.png" }
        ]);
        let payload = ProductPayload::from_value(Operation::Update, body).unwrap();

        record.apply_update(payload);
        assert_eq!(record.images.len(), 2);
        assert!(record.images.iter().all(|i| i.id != old_image));
        assert_eq!(record.name_ru.as_deref(), Some("Красная куртка"));
    }

    #[test]
    fn test_localize_name_and_description() {
        let p = product(Uuid::new_v4(), false, false).localize(Lang::Kg);
        assert_eq!(p.name, "Red Jacket");
        assert_eq!(p.description, "Жылуу");
    }

    #[test]
    fn test_filter_excludes_archived_and_applies_lists() {
        let category = Uuid::new_v4();
        let filter = ProductFilter {
            category_ids: Some(vec![category]),
            featured_only: true,
            ..Default::default()
        };

        assert!(filter.matches(&product(category, true, false)));
        assert!(!filter.matches(&product(category, false, false)));
        assert!(!filter.matches(&product(category, true, true)));
        assert!(!filter.matches(&product(Uuid::new_v4(), true, false)));
    }

    #[test]
    fn test_size_filter_skips_products_without_size() {
        let filter = ProductFilter {
            size_ids: Some(vec![Uuid::new_v4()]),
            ..Default::default()
        };
        assert!(!filter.matches(&product(Uuid::new_v4(), false, false)));
    }
}
