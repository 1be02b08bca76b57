//! Reusable field validators
//!
//! Each validator receives the field name and its JSON value (`Null` when the
//! field is absent) and returns the client-facing message on failure.

use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid regex"));

/// Turn a camelCase field name into a sentence start: `imageUrl` -> `Image url`
pub fn humanize(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// True when a value carries nothing: null, blank string or empty array
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Read a JSON number or numeric string as a decimal
pub fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Validator: field must carry a value
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if is_blank(value) {
            Err(format!("{} is required", humanize(field)))
        } else {
            Ok(())
        }
    }
}

/// Validator: number must be strictly positive
///
/// Accepts JSON numbers and numeric strings; anything else fails.
pub fn positive() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_null() {
            return Ok(());
        }
        match as_decimal(value) {
            Some(num) if num > Decimal::ZERO => Ok(()),
            Some(_) => Err(format!("{} must be greater than 0", humanize(field))),
            None => Err(format!("{} must be a number", humanize(field))),
        }
    }
}

/// Validator: string must be a `#rgb` or `#rrggbb` colour
pub fn hex_color() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_str() {
        Some(s) if HEX_COLOR.is_match(s.trim()) => Ok(()),
        Some(_) => Err(format!("{} must be a valid hex code", humanize(field))),
        None => Ok(()),
    }
}

/// Validator: string must be an http(s) URL
pub fn url() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_str() {
        Some(s) if HTTP_URL.is_match(s.trim()) => Ok(()),
        Some(_) => Err(format!("{} must be a valid URL", humanize(field))),
        None => Ok(()),
    }
}

/// Validator: string must be a UUID
pub fn uuid() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_str() {
        Some(s) if uuid::Uuid::parse_str(s.trim()).is_ok() => Ok(()),
        Some(_) => Err(format!("{} is invalid", humanize(field))),
        None => Ok(()),
    }
}

/// Validator: every element of an image array must carry a URL
pub fn image_list() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        let Some(items) = value.as_array() else {
            return if value.is_null() {
                Ok(())
            } else {
                Err(format!("{} must be a list", humanize(field)))
            };
        };

        let all_have_url = items.iter().all(|item| {
            item.get("url")
                .and_then(Value::as_str)
                .is_some_and(|u| !u.trim().is_empty())
        });

        if all_have_url {
            Ok(())
        } else {
            Err(format!("Each entry of {} needs a url", field))
        }
    }
}
