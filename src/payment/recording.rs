//! In-process payment provider for development and tests
//!
//! Every session request is recorded and answered with a fake hosted URL.
//! A failing instance rejects every request, which exercises the checkout
//! error path without a network.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{CheckoutSession, PaymentProvider, SessionRequest};
use crate::core::error::PaymentError;

const PROVIDER: &str = "recording";

/// Records session requests and hands out fake checkout URLs
#[derive(Clone)]
pub struct RecordingPaymentProvider {
    base_url: String,
    fail_with: Option<String>,
    requests: Arc<Mutex<Vec<SessionRequest>>>,
}

impl RecordingPaymentProvider {
    pub fn new() -> Self {
        Self {
            base_url: "https://checkout.local/pay".to_string(),
            fail_with: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that rejects every session with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::new()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<SessionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for RecordingPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for RecordingPaymentProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.requests
            .lock()
            .map_err(|e| PaymentError::Transport {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?
            .push(request.clone());

        if let Some(message) = &self.fail_with {
            return Err(PaymentError::Rejected {
                provider: PROVIDER.to_string(),
                status: 402,
                message: message.clone(),
            });
        }

        let id = format!("cs_test_{}", Uuid::new_v4().simple());
        tracing::info!(
            session_id = %id,
            amount_total = request.amount_total(),
            "recorded checkout session"
        );
        Ok(CheckoutSession {
            url: format!("{}/{}", self.base_url, id),
            id,
        })
    }
}
