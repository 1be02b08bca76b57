//! Axum extractor for validated payloads
//!
//! `Validated<T>` reads the JSON body, runs the filters and validators that
//! `T` declares for the current operation, then deserializes the filtered
//! payload into `T`.

use super::config::EntityValidationConfig;
use crate::core::error::{ShopError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Which mutation a payload is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    /// POST creates; PUT and PATCH update
    pub fn from_method(method: &Method) -> Self {
        if method == Method::PUT || method == Method::PATCH {
            Operation::Update
        } else {
            Operation::Create
        }
    }
}

/// Trait for payloads that declare their validation rules
pub trait ValidatedPayload: DeserializeOwned {
    /// Get the validation configuration for a specific operation
    fn validation_config(operation: Operation) -> EntityValidationConfig;

    /// Validate a raw payload and deserialize it
    fn from_value(operation: Operation, payload: Value) -> Result<Self, ShopError> {
        let config = Self::validation_config(operation);
        let filtered = config
            .validate_and_filter(payload)
            .map_err(ValidationError::FieldErrors)?;
        Ok(serde_json::from_value(filtered)?)
    }
}

/// Axum extractor that validates and filters a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_size(
///     Validated(payload): Validated<SizePayload>,
/// ) -> ShopResult<Json<Size>> {
///     // payload is already validated and filtered
/// }
/// ```
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatedPayload + Send,
{
    type Rejection = ShopError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = Operation::from_method(req.method());

        let Json(payload): Json<Value> = Json::from_request(req, state).await.map_err(|e| {
            ShopError::Validation(ValidationError::InvalidJson {
                message: e.body_text(),
            })
        })?;

        T::from_value(operation, payload).map(Validated)
    }
}
