//! Axum extractors for identities and path ids

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::{RequestError, ShopError};
use crate::server::host::ServerHost;

/// An authenticated caller
///
/// Rejects with 401 before the handler body runs, so an anonymous request
/// never reaches the data layer.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user_id: String,
}

impl FromRequestParts<Arc<ServerHost>> for Authenticated {
    type Rejection = ShopError;

    async fn from_request_parts(
        parts: &mut Parts,
        host: &Arc<ServerHost>,
    ) -> Result<Self, Self::Rejection> {
        let context = host
            .auth
            .authenticate(&parts.headers)
            .await
            .map_err(|e| ShopError::internal("AUTH", e))?;

        match context {
            AuthContext::User { user_id } => Ok(Authenticated { user_id }),
            AuthContext::Anonymous => Err(RequestError::unauthorized().into()),
        }
    }
}

/// Parse a path segment as a UUID
///
/// `label` names the segment in the 400 message, e.g. "Store id".
pub fn parse_uuid(label: &str, value: &str) -> Result<Uuid, ShopError> {
    Uuid::parse_str(value).map_err(|_| {
        RequestError::InvalidEntityId {
            label: label.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}
