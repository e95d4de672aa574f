//! Helpers for JSON scalars whose type varies between producers.
//!
//! MISP and the services it talks to are loose about scalar types: the same
//! field may arrive as `"12"` from one source and `12` from another. These
//! helpers normalize such values to their textual form.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render a JSON scalar as text.
///
/// Strings are returned verbatim; numbers and booleans use their JSON text.
/// `null`, arrays and objects have no scalar form and yield `None`.
#[must_use]
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// JSON truthiness: `null`, `false`, zero, and empty strings, arrays and
/// objects are all falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Deserialize an optional field that may be a string, number or boolean.
///
/// Use with `#[serde(default, deserialize_with = "scalar::optional_text")]`.
/// Non-scalar values are rejected.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => to_text(&v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a scalar, found {v}"))),
    }
}
