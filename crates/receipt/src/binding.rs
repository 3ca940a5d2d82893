//! Data binding expressions
//!
//! A binding is a JSONPath-like string resolved against the receipt data:
//! - `$.field` - Root field
//! - `$.object.field` - Nested field
//! - `$.array[0]` - Array index
//! - `$.array[0].field` - Array element field

use crate::{ReceiptError, Result};
use serde_json::Value;

/// Check that a binding expression is well formed
pub fn check_binding(path: &str) -> Result<()> {
    let invalid = || ReceiptError::Binding(path.to_string());

    let rest = path.strip_prefix("$.").ok_or_else(invalid)?;
    for segment in rest.split('.') {
        let (field, index) = split_segment(segment).ok_or_else(invalid)?;
        if field.is_empty() && index.is_none() {
            return Err(invalid());
        }
    }
    Ok(())
}

/// Resolve a binding expression against data
///
/// Returns `None` for malformed expressions and for paths that lead nowhere.
pub fn resolve_binding<'a>(path: &str, data: &'a Value) -> Option<&'a Value> {
    let rest = path.strip_prefix("$.")?;
    let mut current = data;

    for segment in rest.split('.') {
        let (field, index) = split_segment(segment)?;
        if !field.is_empty() {
            current = current.get(field)?;
        }
        if let Some(index) = index {
            current = current.get(index)?;
        }
    }

    Some(current)
}

/// Split `items[2]` into `("items", Some(2))` and `name` into `("name", None)`
fn split_segment(segment: &str) -> Option<(&str, Option<usize>)> {
    match segment.split_once('[') {
        None => Some((segment, None)),
        Some((field, rest)) => {
            let index = rest.strip_suffix(']')?.parse().ok()?;
            Some((field, Some(index)))
        }
    }
}

/// Convert a JSON value to string for rendering
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Check if a JSON value is truthy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_simple_field() {
        let data = json!({ "notes": "Merci" });
        assert_eq!(resolve_binding("$.notes", &data), Some(&json!("Merci")));
    }

    #[test]
    fn test_resolve_nested_field() {
        let data = json!({ "tenant": { "name": "Marie Martin" } });
        assert_eq!(
            resolve_binding("$.tenant.name", &data),
            Some(&json!("Marie Martin"))
        );
    }

    #[test]
    fn test_resolve_array_index() {
        let data = json!({ "tenants": [{ "name": "A" }, { "name": "B" }] });
        assert_eq!(resolve_binding("$.tenants[1].name", &data), Some(&json!("B")));
        assert_eq!(resolve_binding("$.tenants[2].name", &data), None);
    }

    #[test]
    fn test_resolve_missing_or_malformed() {
        let data = json!({ "name": "x" });
        assert_eq!(resolve_binding("$.missing", &data), None);
        assert_eq!(resolve_binding("name", &data), None);
        assert_eq!(resolve_binding("$.name[", &data), None);
    }

    #[test]
    fn test_check_binding() {
        assert!(check_binding("$.period.isPartial").is_ok());
        assert!(check_binding("$.tenants[0].name").is_ok());
        assert!(check_binding("$.[0]").is_ok());
        assert!(matches!(
            check_binding("period.start"),
            Err(ReceiptError::Binding(_))
        ));
        assert!(check_binding("$.a..b").is_err());
        assert!(check_binding("$.items[x]").is_err());
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("hello")), "hello");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(null)), "");
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(true)));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("Merci")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
    }
}
