//! Typed error handling for shopdesk
//!
//! Handlers return [`ShopError`], which knows its HTTP status, a stable error
//! code and the body sent to the client. Services keep returning
//! `anyhow::Result`; the conversion at the handler boundary recovers a typed
//! error when one was raised and falls back to [`ShopError::Internal`].
//!
//! # Error Categories
//!
//! - [`EntityError`]: missing records and dangling references
//! - [`ValidationError`]: rejected request payloads
//! - [`RequestError`]: malformed paths, authentication and ownership
//! - [`StorageError`]: store backends and data integrity
//! - [`PaymentError`]: the hosted payment provider
//! - [`ConfigError`]: configuration loading
//!
//! Every 5xx response carries the generic message `"Internal error"`; the
//! underlying cause is only written to the log.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Message returned to clients for every server-side failure
pub const GENERIC_INTERNAL_MESSAGE: &str = "Internal error";

/// The main error type for shopdesk
#[derive(Debug, Error)]
pub enum ShopError {
    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Anything else; the string is for the log only
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShopError {
    /// Wrap an unexpected failure, tagging it with the operation it came from
    ///
    /// The tag follows the `[BILLBOARDS_POST]` convention so log lines can be
    /// grepped per route.
    pub fn internal(operation: &str, err: impl std::fmt::Display) -> Self {
        ShopError::Internal(format!("[{}] {}", operation, err))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::Entity(e) => e.status_code(),
            ShopError::Validation(_) => StatusCode::BAD_REQUEST,
            ShopError::Request(e) => e.status_code(),
            ShopError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Payment(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::Entity(e) => e.error_code(),
            ShopError::Validation(_) => "VALIDATION_ERROR",
            ShopError::Request(e) => e.error_code(),
            ShopError::Storage(e) => e.error_code(),
            ShopError::Payment(_) => "PAYMENT_ERROR",
            ShopError::Config(_) => "CONFIG_ERROR",
            ShopError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the client sees the generic message instead of the error text
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        if self.is_server_error() {
            return ErrorResponse {
                code: self.error_code().to_string(),
                message: GENERIC_INTERNAL_MESSAGE.to_string(),
                details: None,
            };
        }

        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShopError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            ShopError::Validation(ValidationError::FieldErrors(errors)) if errors.len() > 1 => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to catalog records
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("{entity_type} not found")]
    NotFound { entity_type: String, id: Uuid },

    /// A payload points at a record that does not exist in the same store
    #[error("{field} does not reference an existing {entity_type}")]
    InvalidReference {
        entity_type: String,
        field: String,
        id: Uuid,
    },

    /// Deleting the record would leave other records dangling
    #[error("{message}")]
    InUse { message: String },
}

impl EntityError {
    pub fn not_found(entity_type: &str, id: Uuid) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id,
        }
    }

    pub fn in_use(message: impl Into<String>) -> Self {
        EntityError::InUse {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::InvalidReference { .. } => StatusCode::BAD_REQUEST,
            EntityError::InUse { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::InvalidReference { .. } => "INVALID_REFERENCE",
            EntityError::InUse { .. } => "ENTITY_IN_USE",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{}", join_messages(.0))]
    FieldErrors(Vec<FieldValidationError>),

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("{message}")]
    InvalidRequest { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_messages(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ValidationError::InvalidRequest {
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_validator_errors(&errors, "", &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

fn collect_validator_errors(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut Vec<FieldValidationError>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("'{}' is invalid", path));
                    out.push(FieldValidationError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_validator_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validator_errors(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{label} is invalid: '{value}'")]
    InvalidEntityId { label: String, value: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },

    #[error("Invalid signature: {message}")]
    InvalidSignature { message: String },
}

impl RequestError {
    pub fn unauthorized() -> Self {
        RequestError::Unauthorized {
            message: "Unauthorized".to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        RequestError::Forbidden {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidEntityId { .. } => StatusCode::BAD_REQUEST,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RequestError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidSignature { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
            RequestError::InvalidSignature { .. } => "INVALID_SIGNATURE",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Stored data breaks an invariant the caller relies on
    #[error("Data integrity error: {message}")]
    IntegrityError { message: String },
}

impl StorageError {
    pub fn integrity(message: impl Into<String>) -> Self {
        StorageError::IntegrityError {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::IntegrityError { .. } => "DATA_INTEGRITY_ERROR",
        }
    }
}

// =============================================================================
// Payment Errors
// =============================================================================

/// Errors raised while talking to the payment provider
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("{provider} rejected the request ({status}): {message}")]
    Rejected {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },

    #[error("{provider} returned an unexpected response: {message}")]
    InvalidResponse { provider: String, message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config: {message}")]
    Parse { message: String },

    #[error("Invalid value '{value}' for '{key}': {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("Missing configuration value: {key}")]
    Missing { key: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<validator::ValidationErrors> for ShopError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ShopError::Validation(errors.into())
    }
}

/// Services report through anyhow; typed errors raised inside them survive
impl From<anyhow::Error> for ShopError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ShopError>() {
            Ok(shop_err) => shop_err,
            Err(err) => match err.downcast::<StorageError>() {
                Ok(storage_err) => ShopError::Storage(storage_err),
                Err(err) => match err.downcast::<PaymentError>() {
                    Ok(payment_err) => ShopError::Payment(payment_err),
                    Err(err) => ShopError::Internal(format!("{:#}", err)),
                },
            },
        }
    }
}

/// A specialized Result type for handler-level operations
pub type ShopResult<T> = Result<T, ShopError>;

/// Tag service failures with the operation they happened in
pub trait OperationContext<T> {
    fn operation(self, tag: &str) -> ShopResult<T>;
}

impl<T> OperationContext<T> for anyhow::Result<T> {
    fn operation(self, tag: &str) -> ShopResult<T> {
        self.map_err(|err| match ShopError::from(err) {
            ShopError::Internal(message) => ShopError::Internal(format!("[{}] {}", tag, message)),
            other => {
                if other.is_server_error() {
                    tracing::error!(operation = tag, error = %other, "service call failed");
                }
                other
            }
        })
    }
}
