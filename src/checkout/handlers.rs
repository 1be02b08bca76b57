//! `POST /api/{store_id}/checkout`
//!
//! Public: the storefront calls it cross-origin without an identity.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use std::sync::Arc;

use super::orchestrator::{CheckoutSettings, checkout};
use super::{CheckoutRequest, CheckoutResponse};
use crate::core::error::{EntityError, OperationContext, ShopResult, ValidationError};
use crate::core::extractors::parse_uuid;
use crate::server::host::ServerHost;

pub async fn create_checkout(
    State(host): State<Arc<ServerHost>>,
    Path(store_id): Path<String>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ShopResult<Json<CheckoutResponse>> {
    let store_id = parse_uuid("Store id", &store_id)?;
    let Json(request) = payload.map_err(|e| ValidationError::InvalidJson {
        message: e.body_text(),
    })?;

    host.catalog
        .stores
        .get(&store_id)
        .await
        .operation("CHECKOUT_POST")?
        .ok_or_else(|| EntityError::not_found("store", store_id))?;

    let settings = CheckoutSettings::from_config(&host.config);
    let outcome = checkout(
        &host.catalog,
        host.payments.as_ref(),
        &settings,
        store_id,
        &request,
    )
    .await?;

    Ok(Json(CheckoutResponse {
        url: outcome.session.url,
    }))
}
