//! Orders created by checkout and the owner's order overview

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::entity::Entity;
use crate::core::error::{OperationContext, ShopResult, StorageError};
use crate::core::extractors::{Authenticated, parse_uuid};
use crate::entities::Product;
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;

/// One requested product inside an order; never changed after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
}

crate::impl_store_entity!(Order, "orders", "order", {
    is_paid: bool,
    /// Filled in from the payment provider once paid
    phone: String,
    address: String,
    order_items: Vec<OrderItem>,
});

impl Order {
    /// A fresh unpaid order with one item per `(product_id, quantity)` line
    pub fn pending(store_id: Uuid, lines: &[(Uuid, u32)]) -> Self {
        let mut order = Order::new(store_id, false, String::new(), String::new(), Vec::new());
        order.order_items = lines
            .iter()
            .map(|(product_id, quantity)| OrderItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: *product_id,
                quantity: *quantity,
            })
            .collect();
        order
    }
}

/// Row of the owner's order overview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: Uuid,
    pub phone: String,
    pub address: String,
    pub is_paid: bool,
    /// Product names, comma-joined
    pub products: String,
    /// Quantities, comma-joined in the same order as `products`
    pub quantity: String,
    /// Σ(current product price × quantity)
    pub total_price: Decimal,
    pub order_items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

/// `GET /api/{store_id}/orders`, newest first
pub async fn list_orders(
    State(host): State<Arc<ServerHost>>,
    Path(store_id): Path<String>,
    user: Authenticated,
) -> ShopResult<Json<Vec<OrderSummary>>> {
    let store_id = parse_uuid("Store id", &store_id)?;
    host.require_store_owner(&store_id, &user).await?;

    let orders = host
        .catalog
        .orders
        .list_by_store(&store_id)
        .await
        .operation("ORDERS_GET")?;

    let product_ids: Vec<Uuid> = orders
        .iter()
        .flat_map(|o| o.order_items.iter().map(|i| i.product_id))
        .collect();
    let products: HashMap<Uuid, _> = host
        .catalog
        .products
        .get_many(&product_ids)
        .await
        .operation("ORDERS_GET")?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let summaries = orders
        .into_iter()
        .map(|order| summarize(order, &products))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(summaries))
}

fn summarize(
    order: Order,
    products: &HashMap<Uuid, Product>,
) -> Result<OrderSummary, StorageError> {
    let mut names = Vec::with_capacity(order.order_items.len());
    let mut total = Decimal::ZERO;
    for item in &order.order_items {
        match products.get(&item.product_id) {
            Some(product) => {
                names.push(product.name.clone());
                total = product
                    .price
                    .checked_mul(Decimal::from(item.quantity))
                    .and_then(|line| total.checked_add(line))
                    .ok_or_else(|| {
                        StorageError::integrity(format!("order {} total overflows", order.id))
                    })?;
            }
            None => names.push("(deleted product)".to_string()),
        }
    }

    Ok(OrderSummary {
        id: order.id,
        phone: order.phone,
        address: order.address,
        is_paid: order.is_paid,
        products: names.join(", "),
        quantity: order
            .order_items
            .iter()
            .map(|i| i.quantity.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        total_price: total,
        order_items: order.order_items,
        created_at: order.created_at,
    })
}

pub struct OrderDescriptor;

impl EntityDescriptor for OrderDescriptor {
    fn entity_type(&self) -> &str {
        Order::resource_name_singular()
    }

    fn plural(&self) -> &str {
        Order::resource_name()
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        let path = format!("/api/{{store_id}}/{}", self.plural());
        Router::new().route(&path, get(list_orders))
    }
}
