//! Payment provider callbacks
//!
//! `POST /api/webhook` receives the provider's event JSON. The
//! `Stripe-Signature` header carries `t=<unix seconds>` and one or more
//! `v1=<hex>` entries, each an HMAC-SHA256 of `"{t}.{raw body}"` keyed with
//! the webhook secret. A `checkout.session.completed` event flips the order
//! named in `metadata.orderId` to paid and stores the collected contact.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{Value, json};
use sha2::Sha256;
use std::sync::Arc;

use crate::core::error::{
    ConfigError, EntityError, OperationContext, RequestError, ShopError, ShopResult,
    ValidationError,
};
use crate::core::extractors::parse_uuid;
use crate::server::host::ServerHost;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Accepted clock difference between the signature timestamp and now
pub const TOLERANCE_SECS: i64 = 300;

pub const SESSION_COMPLETED: &str = "checkout.session.completed";

type HmacSha256 = Hmac<Sha256>;

fn invalid_signature(message: &str) -> ShopError {
    RequestError::InvalidSignature {
        message: message.to_string(),
    }
    .into()
}

/// Compute the `v1` signature for a payload
pub fn sign(payload: &[u8], timestamp: i64, secret: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Build a complete signature header, as the provider would send it
pub fn signature_header(payload: &[u8], timestamp: i64, secret: &str) -> Option<String> {
    sign(payload, timestamp, secret).map(|sig| format!("t={},v1={}", timestamp, sig))
}

/// Check a signature header against the payload at time `now`
pub fn verify_signature_at(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), ShopError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| invalid_signature("missing timestamp"))?;
    if signatures.is_empty() {
        return Err(invalid_signature("missing v1 signature"));
    }
    if now.abs_diff(timestamp) > TOLERANCE_SECS.unsigned_abs() {
        return Err(invalid_signature("timestamp outside tolerance"));
    }

    let matches = signatures.iter().any(|candidate| {
        let Ok(expected) = hex::decode(candidate) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.verify_slice(&expected).is_ok()
    });

    if matches {
        Ok(())
    } else {
        Err(invalid_signature("no matching signature"))
    }
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(rename = "type")]
    kind: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: SessionObject,
}

#[derive(Debug, Default, Deserialize)]
struct SessionObject {
    #[serde(default)]
    metadata: std::collections::HashMap<String, String>,
    #[serde(default)]
    customer_details: Option<CustomerDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct CustomerDetails {
    phone: Option<String>,
    address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// Present components joined with ", "
    pub fn joined(&self) -> String {
        [
            &self.line1,
            &self.line2,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .flatten()
        .filter(|c| !c.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// `POST /api/webhook`
pub async fn handle_webhook(
    State(host): State<Arc<ServerHost>>,
    headers: HeaderMap,
    body: Bytes,
) -> ShopResult<Json<Value>> {
    let secret = host
        .config
        .payment
        .webhook_secret
        .as_deref()
        .ok_or_else(|| ConfigError::Missing {
            key: "payment.webhook_secret".to_string(),
        })?;

    let header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| invalid_signature("missing signature header"))?;

    verify_signature_at(&body, header, secret, chrono::Utc::now().timestamp())?;

    let event: Event = serde_json::from_slice(&body).map_err(|e| {
        ShopError::Validation(ValidationError::InvalidJson {
            message: e.to_string(),
        })
    })?;

    if event.kind != SESSION_COMPLETED {
        tracing::debug!(event = %event.kind, "ignoring webhook event");
        return Ok(Json(json!({ "received": true })));
    }

    let session = event.data.object;
    let order_id = session
        .metadata
        .get("orderId")
        .ok_or_else(|| ValidationError::invalid_request("Order id is required"))?;
    let order_id = parse_uuid("Order id", order_id)?;

    let details = session.customer_details.unwrap_or_default();
    let phone = details.phone.unwrap_or_default();
    let address = details
        .address
        .map(|a| a.joined())
        .unwrap_or_default();

    let order = host
        .catalog
        .orders
        .mark_paid(&order_id, &phone, &address)
        .await
        .operation("WEBHOOK_POST")?
        .ok_or_else(|| EntityError::not_found("order", order_id))?;

    tracing::info!(order_id = %order.id, store_id = %order.store_id, "order paid");
    Ok(Json(json!({ "received": true })))
}
