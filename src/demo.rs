//! Sample data for local development
//!
//! One store owned by `user123` with a billboard, category, size, color, a
//! product with two images and one paid order for it.

use anyhow::Result;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::entities::{Billboard, Category, Color, Image, Order, Product, Size, Store};
use crate::storage::Catalog;

pub const DEMO_USER: &str = "user123";

/// Ids of the seeded records
#[derive(Debug, Clone, Copy)]
pub struct DemoIds {
    pub store: Uuid,
    pub billboard: Uuid,
    pub category: Uuid,
    pub size: Uuid,
    pub color: Uuid,
    pub product: Uuid,
    pub order: Uuid,
}

/// Seed `catalog` with the sample store
pub async fn seed(catalog: &Catalog) -> Result<DemoIds> {
    let store = catalog
        .stores
        .create(Store::new("Sample Store", DEMO_USER))
        .await?;

    let billboard = catalog
        .billboards
        .create(Billboard::new(
            store.id,
            "Winter Sale".to_string(),
            Some("Зимняя распродажа".to_string()),
            Some("Кышкы арзандатуу".to_string()),
            "https://example.com/image.png".to_string(),
        ))
        .await?;

    let category = catalog
        .categories
        .create(Category::new(
            store.id,
            "Clothing".to_string(),
            Some("Одежда".to_string()),
            Some("Кийим".to_string()),
            billboard.id,
        ))
        .await?;

    let size = catalog
        .sizes
        .create(Size::new(
            store.id,
            "Large".to_string(),
            None,
            None,
            "L".to_string(),
        ))
        .await?;

    let color = catalog
        .colors
        .create(Color::new(
            store.id,
            "Red".to_string(),
            Some("Красный".to_string()),
            Some("Кызыл".to_string()),
            "#FF0000".to_string(),
        ))
        .await?;

    let product = catalog
        .products
        .create(Product::new(
            store.id,
            "Red Jacket".to_string(),
            None,
            None,
            "A warm red jacket for winter".to_string(),
            None,
            None,
            Decimal::new(7999, 2),
            Decimal::new(1200, 3),
            category.id,
            color.id,
            Some(size.id),
            true,
            false,
            vec![
                Image::new("https://example.com/jacket1.png"),
                Image::new("https://example.com/jacket2.png"),
            ],
        ))
        .await?;

    let order = catalog
        .orders
        .create_with_items(Order::pending(store.id, &[(product.id, 1)]))
        .await?;
    let order = catalog
        .orders
        .mark_paid(&order.id, "123-456-7890", "123 Example St, Sample City")
        .await?
        .ok_or_else(|| anyhow::anyhow!("seeded order {} vanished", order.id))?;

    tracing::info!(store_id = %store.id, user_id = DEMO_USER, "demo data seeded");

    Ok(DemoIds {
        store: store.id,
        billboard: billboard.id,
        category: category.id,
        size: size.id,
        color: color.id,
        product: product.id,
        order: order.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_creates_linked_records() {
        let catalog = Catalog::in_memory();
        let ids = seed(&catalog).await.unwrap();

        let store = catalog.stores.get(&ids.store).await.unwrap().unwrap();
        assert!(store.is_owned_by(DEMO_USER));

        let product = catalog.products.get(&ids.product).await.unwrap().unwrap();
        assert_eq!(product.category_id, ids.category);
        assert_eq!(product.images.len(), 2);

        let orders = catalog.orders.list_by_store(&ids.store).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert!(orders[0].is_paid);
        assert_eq!(orders[0].order_items[0].product_id, ids.product);
        assert!(catalog.store_has_records(&ids.store).await.unwrap());
    }
}
