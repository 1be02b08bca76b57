//! Validation configuration for a payload type

use anyhow::Result;
use serde_json::Value;

use super::validators::is_blank;
use crate::core::error::FieldValidationError;

type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type Filter = Box<dyn Fn(&str, Value) -> Result<Value> + Send + Sync>;

static NULL: Value = Value::Null;

/// A rule satisfied when at least one of several fields carries a value
struct AnyOf {
    fields: Vec<&'static str>,
    message: String,
}

/// Ordered set of filters and validators for one payload and operation
///
/// Filters run first, in registration order, and rewrite the payload.
/// Validators then run in registration order; every failure is collected.
#[derive(Default)]
pub struct EntityValidationConfig {
    pub entity_type: &'static str,
    filters: Vec<(&'static str, Filter)>,
    validators: Vec<(&'static str, Validator)>,
    any_of: Vec<AnyOf>,
}

impl EntityValidationConfig {
    pub fn new(entity_type: &'static str) -> Self {
        Self {
            entity_type,
            ..Default::default()
        }
    }

    /// Add a validator for a field
    pub fn add_validator<F>(&mut self, field: &'static str, validator: F)
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push((field, Box::new(validator)));
    }

    /// Add a filter for a field
    pub fn add_filter<F>(&mut self, field: &'static str, filter: F)
    where
        F: Fn(&str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.filters.push((field, Box::new(filter)));
    }

    /// Require a value in at least one of `fields`
    pub fn require_any(&mut self, fields: &[&'static str], message: impl Into<String>) {
        self.any_of.push(AnyOf {
            fields: fields.to_vec(),
            message: message.into(),
        });
    }

    /// Builder form of [`add_validator`](Self::add_validator)
    pub fn rule<F>(mut self, field: &'static str, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.add_validator(field, validator);
        self
    }

    /// Builder form of [`add_filter`](Self::add_filter)
    pub fn filter<F>(mut self, field: &'static str, filter: F) -> Self
    where
        F: Fn(&str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.add_filter(field, filter);
        self
    }

    /// Builder form of [`require_any`](Self::require_any)
    pub fn any_of(mut self, fields: &[&'static str], message: impl Into<String>) -> Self {
        self.require_any(fields, message);
        self
    }

    /// Apply filters, then run every validator against the filtered payload
    pub fn validate_and_filter(
        &self,
        mut payload: Value,
    ) -> Result<Value, Vec<FieldValidationError>> {
        let Some(object) = payload.as_object_mut() else {
            return Err(vec![FieldValidationError {
                field: String::new(),
                message: format!("{} payload must be a JSON object", self.entity_type),
            }]);
        };

        for (field, filter) in &self.filters {
            let Some(current) = object.remove(*field) else {
                continue;
            };
            match filter(*field, current) {
                Ok(filtered) => {
                    object.insert((*field).to_string(), filtered);
                }
                Err(e) => {
                    return Err(vec![FieldValidationError {
                        field: (*field).to_string(),
                        message: e.to_string(),
                    }]);
                }
            }
        }

        let mut errors = Vec::new();

        for rule in &self.any_of {
            let satisfied = rule
                .fields
                .iter()
                .any(|f| object.get(*f).is_some_and(|v| !is_blank(v)));
            if !satisfied {
                errors.push(FieldValidationError {
                    field: rule.fields.join("|"),
                    message: rule.message.clone(),
                });
            }
        }

        for (field, validator) in &self.validators {
            let value = object.get(*field).unwrap_or(&NULL);
            if let Err(message) = validator(*field, value) {
                let already_reported = errors.iter().any(|e| e.field == *field);
                if !already_reported {
                    errors.push(FieldValidationError {
                        field: (*field).to_string(),
                        message,
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(errors)
        }
    }
}
