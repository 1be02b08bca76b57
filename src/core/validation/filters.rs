//! Reusable field filters
//!
//! Filters normalise payload values before validation runs.

use anyhow::Result;
use rust_decimal::RoundingStrategy;
use serde_json::Value;

use super::validators::as_decimal;

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: blank strings become null
///
/// Used on optional localized text so that an empty form field clears it.
pub fn blank_to_null() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value.as_str() {
        Some(s) if s.trim().is_empty() => Ok(Value::Null),
        _ => Ok(value),
    }
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_lowercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: numbers become exact decimal strings rounded to `decimals` places
///
/// Rounds half away from zero. Non-numeric values pass through untouched so
/// the validators can report them.
pub fn round_decimals(
    decimals: u32,
) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    move |_: &str, value: Value| match as_decimal(&value) {
        Some(num) => Ok(Value::String(
            num.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
                .normalize()
                .to_string(),
        )),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === trim() ===

    #[test]
    fn test_trim_removes_whitespace() {
        let f = trim();
        let result = f("name", json!("  hello  ")).expect("should not fail");
        assert_eq!(result, json!("hello"));
    }

    #[test]
    fn test_trim_non_string_passthrough() {
        let f = trim();
        let result = f("age", json!(42)).expect("should not fail");
        assert_eq!(result, json!(42));
    }

    #[test]
    fn test_trim_null_passthrough() {
        let f = trim();
        let result = f("name", json!(null)).expect("should not fail");
        assert_eq!(result, json!(null));
    }

    // === blank_to_null() ===

    #[test]
    fn test_blank_to_null() {
        let f = blank_to_null();
        assert_eq!(f("nameRu", json!("  ")).unwrap(), json!(null));
        assert_eq!(f("nameRu", json!("Пальто")).unwrap(), json!("Пальто"));
    }

    // === lowercase() ===

    #[test]
    fn test_lowercase_converts_string() {
        let f = lowercase();
        let result = f("value", json!("#FFAA00")).expect("should not fail");
        assert_eq!(result, json!("#ffaa00"));
    }

    // === round_decimals() ===

    #[test]
    fn test_round_decimals_two_places() {
        let f = round_decimals(2);
        let result = f("price", json!(3.14159)).expect("should not fail");
        assert_eq!(result, json!("3.14"));
    }

    #[test]
    fn test_round_decimals_midpoint_away_from_zero() {
        let f = round_decimals(2);
        assert_eq!(f("price", json!("2.345")).unwrap(), json!("2.35"));
        assert_eq!(f("price", json!("-2.345")).unwrap(), json!("-2.35"));
    }

    #[test]
    fn test_round_decimals_keeps_integers() {
        let f = round_decimals(2);
        assert_eq!(f("price", json!(10)).unwrap(), json!("10"));
    }

    #[test]
    fn test_round_decimals_non_number_passthrough() {
        let f = round_decimals(2);
        let result = f("price", json!("cheap")).expect("should not fail");
        assert_eq!(result, json!("cheap"));
    }
}
