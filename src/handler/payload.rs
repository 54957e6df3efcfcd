//! Defensive accessors for loosely-typed provider payloads
//!
//! Nothing in a provider error payload is guaranteed; every accessor here
//! returns a default instead of failing on a missing or mistyped key.

use serde_json::Value;

/// Whether a value counts as set
///
/// `null`, `false`, zero, empty strings, empty arrays and empty objects are
/// all treated as unset.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Look up a key, yielding `None` for missing keys and non-objects
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key)
}

/// Look up a key that is only of interest when truthy
pub fn truthy_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    field(value, key).filter(|v| is_truthy(v))
}

/// Render an optional value as display text
///
/// Strings are used verbatim, missing and `null` values become `""`, and
/// anything else is rendered as compact JSON.
pub fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// The top-level `message` of a provider payload, `{}` when absent
pub fn message_content(body: &Value) -> Value {
    field(body, "message")
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()))
}

/// The vendor error object inside a `message` envelope
///
/// First truthy of `error` and `data`, `{}` otherwise.
pub fn error_data(content: &Value) -> Value {
    truthy_field(content, "error")
        .or_else(|| truthy_field(content, "data"))
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()))
}
