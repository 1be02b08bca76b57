//! Storefront checkout
//!
//! A cart arrives as `{ products: [{ id, count }] }`. Prices are never taken
//! from the client: [`orchestrator::checkout`] re-reads every product, creates
//! one unpaid order and asks the payment provider for a hosted session.

pub mod handlers;
pub mod orchestrator;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use orchestrator::{CheckoutOutcome, CheckoutSettings, checkout};

/// Message for an empty or unusable cart
pub const EMPTY_CART_MESSAGE: &str = "Product data is required";

/// One cart line as sent by the storefront
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CartLine {
    pub id: String,
    /// Defaults to 1 when absent
    #[validate(range(min = 1, message = "Count must be at least 1"))]
    pub count: Option<u32>,
}

impl CartLine {
    pub fn quantity(&self) -> u32 {
        self.count.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CheckoutRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Product data is required"), nested)]
    pub products: Vec<CartLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub url: String,
}
