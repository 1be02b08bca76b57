//! Cart to order to payment session
//!
//! The steps run strictly in sequence:
//!
//! 1. validate the cart and merge repeated product ids
//! 2. load every referenced product in one batch, keeping the store's own
//! 3. price each line from the stored product
//! 4. persist one unpaid order with its items
//! 5. open a payment session carrying the order id as metadata
//!
//! Unknown ids are dropped silently. A provider failure after step 4 leaves
//! the unpaid order in place.

use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use super::{CheckoutRequest, EMPTY_CART_MESSAGE};
use crate::config::AppConfig;
use crate::core::error::{OperationContext, ShopError, ShopResult, StorageError, ValidationError};
use crate::entities::order::Order;
use crate::entities::product::Product;
use crate::payment::{CheckoutSession, LineItem, PaymentProvider, SessionRequest};
use crate::storage::Catalog;

const TAG: &str = "CHECKOUT_POST";

/// Deployment values a checkout needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Lowercase ISO currency code
    pub currency: String,
    /// Storefront base URL the shopper returns to
    pub frontend_url: String,
}

impl CheckoutSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            currency: config.payment.currency.to_lowercase(),
            frontend_url: config.frontend_store_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn success_url(&self) -> String {
        format!("{}/cart?success=1", self.frontend_url)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/cart?canceled=1", self.frontend_url)
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub session: CheckoutSession,
}

/// Price in minor units, rounded half away from zero
pub fn minor_units(price: Decimal) -> Option<i64> {
    price
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Parse cart ids and sum the counts of repeated ids, keeping first-seen order
fn merge_lines(request: &CheckoutRequest) -> ShopResult<IndexMap<Uuid, u32>> {
    let mut lines: IndexMap<Uuid, u32> = IndexMap::new();
    for line in &request.products {
        let id = Uuid::parse_str(line.id.trim())
            .map_err(|_| ValidationError::invalid_request(EMPTY_CART_MESSAGE))?;
        let count = lines.entry(id).or_insert(0);
        *count = count
            .checked_add(line.quantity())
            .ok_or_else(|| ValidationError::invalid_request("Count is too large"))?;
    }
    Ok(lines)
}

fn line_item(product: &Product, quantity: u32, currency: &str) -> ShopResult<LineItem> {
    if product.price <= Decimal::ZERO {
        return Err(StorageError::integrity(format!("product {} has no price", product.id)).into());
    }
    let unit_amount = minor_units(product.price).ok_or_else(|| {
        StorageError::integrity(format!("product {} price is out of range", product.id))
    })?;
    unit_amount.checked_mul(i64::from(quantity)).ok_or_else(|| {
        StorageError::integrity(format!("line total for product {} overflows", product.id))
    })?;

    Ok(LineItem {
        name: product.name.clone(),
        unit_amount,
        quantity,
        currency: currency.to_string(),
    })
}

/// Run a checkout for `store_id`
pub async fn checkout(
    catalog: &Catalog,
    payments: &dyn PaymentProvider,
    settings: &CheckoutSettings,
    store_id: Uuid,
    request: &CheckoutRequest,
) -> ShopResult<CheckoutOutcome> {
    request.validate()?;
    let lines = merge_lines(request)?;

    let ids: Vec<Uuid> = lines.keys().copied().collect();
    let products = catalog.products.get_many(&ids).await.operation(TAG)?;
    let products: Vec<Product> = products
        .into_iter()
        .filter(|p| p.store_id == store_id)
        .collect();

    if products.len() < ids.len() {
        tracing::warn!(
            store_id = %store_id,
            requested = ids.len(),
            found = products.len(),
            "checkout dropped unknown products"
        );
    }
    if products.is_empty() {
        return Err(ValidationError::invalid_request(EMPTY_CART_MESSAGE).into());
    }

    let mut line_items = Vec::with_capacity(products.len());
    let mut order_lines = Vec::with_capacity(products.len());
    for product in &products {
        let quantity = lines.get(&product.id).copied().unwrap_or(1);
        line_items.push(line_item(product, quantity, &settings.currency)?);
        order_lines.push((product.id, quantity));
    }

    let order = catalog
        .orders
        .create_with_items(Order::pending(store_id, &order_lines))
        .await
        .operation(TAG)?;

    let session_request = SessionRequest {
        line_items,
        mode: "payment".to_string(),
        billing_address_required: true,
        phone_number_collection: true,
        success_url: settings.success_url(),
        cancel_url: settings.cancel_url(),
        metadata: BTreeMap::from([("orderId".to_string(), order.id.to_string())]),
    };

    let session = payments
        .create_checkout_session(&session_request)
        .await
        .map_err(|e| {
            tracing::error!(
                order_id = %order.id,
                provider = payments.name(),
                error = %e,
                "payment session failed, order left unpaid"
            );
            ShopError::from(e)
        })?;

    tracing::info!(
        order_id = %order.id,
        store_id = %store_id,
        items = order.order_items.len(),
        amount_total = session_request.amount_total(),
        "checkout session opened"
    );

    Ok(CheckoutOutcome { order, session })
}
