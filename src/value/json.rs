//! Bridge between [`Value`] and JSON.

use chrono::SecondsFormat;
use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

use super::Value;

impl Serialize for Value {
    /// Serializes the JSON-compatible subset. Object entries holding
    /// `undefined` are skipped, `undefined` array items become `null`, dates
    /// become RFC 3339 strings. Functions, patterns and symbols are errors.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Object(map) => {
                let defined = map.iter().filter(|(_, v)| !v.is_undefined());
                let mut out = serializer.serialize_map(None)?;
                for (key, value) in defined {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Value::Array(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    if item.is_undefined() {
                        out.serialize_element(&())?;
                    } else {
                        out.serialize_element(item)?;
                    }
                }
                out.end()
            }
            Value::Date(date) => {
                serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Number(_) => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Null | Value::Undefined => serializer.serialize_unit(),
            other => Err(ser::Error::custom(format!(
                "a {} has no JSON representation",
                other.kind()
            ))),
        }
    }
}

impl Value {
    /// Convert to JSON. Returns `None` for `undefined` and for values that
    /// contain a function, pattern or symbol.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        if self.is_undefined() {
            return None;
        }
        serde_json::to_value(self).ok()
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
