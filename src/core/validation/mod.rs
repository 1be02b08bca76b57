//! Validation and filtering system
//!
//! Payload types declare, per operation, which filters normalise their JSON
//! and which validators must pass. The [`Validated`] extractor applies them
//! before a handler runs, so handlers only ever see clean, typed input.

pub mod config;
pub mod extractor;
pub mod filters;
pub mod validators;

pub use config::EntityValidationConfig;
pub use extractor::{Operation, Validated, ValidatedPayload};
