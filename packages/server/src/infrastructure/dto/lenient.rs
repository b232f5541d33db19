//! Lenient field deserializers for untrusted inbound payloads.
//!
//! Inbound events are best-effort-coerced rather than rejected: a field of
//! the wrong JSON type deserializes to its default instead of failing the
//! whole event. Combined with `#[serde(default)]` for absent fields, every
//! recognized event type parses.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Any non-string value coerces to the empty string
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Only a literal `true` counts as set; anything else coerces to `false`
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(matches!(value, Value::Bool(true)))
}

/// Numeric values become millis; anything non-numeric becomes `None`
pub fn opt_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64)))
}
