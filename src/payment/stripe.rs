//! Stripe Checkout over its form-encoded HTTP API

use async_trait::async_trait;
use serde::Deserialize;

use super::{CheckoutSession, PaymentProvider, SessionRequest};
use crate::core::error::PaymentError;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

const PROVIDER: &str = "stripe";

/// Creates Checkout Sessions through `POST /v1/checkout/sessions`
#[derive(Clone)]
pub struct StripePaymentProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl StripePaymentProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_api_base(api_key, DEFAULT_API_BASE)
    }

    /// Point at another base URL, e.g. a local stripe-mock
    pub fn with_api_base(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Flatten a session request into Stripe's bracketed form keys
pub fn form_params(request: &SessionRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_string(), request.mode.clone()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    if request.billing_address_required {
        params.push((
            "billing_address_collection".to_string(),
            "required".to_string(),
        ));
    }
    if request.phone_number_collection {
        params.push((
            "phone_number_collection[enabled]".to_string(),
            "true".to_string(),
        ));
    }

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{}]", i);
        params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
        params.push((
            format!("{}[price_data][currency]", prefix),
            item.currency.clone(),
        ));
        params.push((
            format!("{}[price_data][unit_amount]", prefix),
            item.unit_amount.to_string(),
        ));
        params.push((
            format!("{}[price_data][product_data][name]", prefix),
            item.name.clone(),
        ));
    }

    for (key, value) in &request.metadata {
        params.push((format!("metadata[{}]", key), value.clone()));
    }

    params
}

#[async_trait]
impl PaymentProvider for StripePaymentProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .form(&form_params(request))
            .send()
            .await
            .map_err(|e| PaymentError::Transport {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or(body);
            return Err(PaymentError::Rejected {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let session: SessionResponse =
            response
                .json()
                .await
                .map_err(|e| PaymentError::InvalidResponse {
                    provider: PROVIDER.to_string(),
                    message: e.to_string(),
                })?;

        let url = session.url.ok_or_else(|| PaymentError::InvalidResponse {
            provider: PROVIDER.to_string(),
            message: format!("session {} has no url", session.id),
        })?;

        tracing::debug!(session_id = %session.id, "stripe session created");
        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}
