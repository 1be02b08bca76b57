//! Hosted payment sessions
//!
//! Checkout hands a [`SessionRequest`] to a [`PaymentProvider`] and redirects
//! the shopper to the returned URL. The provider later reports completion
//! through the webhook in [`webhook`].

pub mod recording;
pub mod stripe;
pub mod webhook;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::error::PaymentError;

pub use recording::RecordingPaymentProvider;
pub use stripe::StripePaymentProvider;

/// One priced entry of a payment session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub name: String,
    /// Price of one unit in minor currency units
    pub unit_amount: i64,
    pub quantity: u32,
    /// Lowercase ISO currency code
    pub currency: String,
}

impl LineItem {
    pub fn total(&self) -> i64 {
        self.unit_amount * i64::from(self.quantity)
    }
}

/// Everything the provider needs to open a hosted checkout page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRequest {
    pub line_items: Vec<LineItem>,
    /// Always `payment` for one-off purchases
    pub mode: String,
    pub billing_address_required: bool,
    pub phone_number_collection: bool,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: BTreeMap<String, String>,
}

impl SessionRequest {
    /// Sum of all line items in minor units
    pub fn amount_total(&self) -> i64 {
        self.line_items.iter().map(LineItem::total).sum()
    }
}

/// A session opened by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    /// Where the shopper is redirected to pay
    pub url: String,
}

/// Trait for hosted payment providers
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}
