//! Conversions between `Value` and JSON / Rust primitives
//!
//! JSON → Value is lossless. Value → JSON is lossy and only used for
//! reporting:
//! - `Undefined` object fields are skipped (`null` elsewhere)
//! - `BigInt` becomes a decimal string
//! - `Date` becomes RFC 3339
//! - `Map` becomes `[[key, value], ...]`, `Set` becomes an array
//! - functions, promises, symbols and opaque values become `null`

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number};

use super::types::Value;

/// Largest integer a double represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
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

impl Value {
    /// Renders the value as JSON for reporting.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::BigInt(i) => serde_json::Value::String(i.to_string()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => {
                serde_json::Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Array(items) | Value::Set(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => {
                let mut out = Map::new();
                for (k, v) in map {
                    if !v.is_undefined() {
                        out.insert(k.clone(), v.to_json());
                    }
                }
                serde_json::Value::Object(out)
            }
            Value::Map(pairs) => serde_json::Value::Array(
                pairs
                    .iter()
                    .map(|(k, v)| serde_json::Value::Array(vec![k.to_json(), v.to_json()]))
                    .collect(),
            ),
            Value::Symbol(_) | Value::Function(_) | Value::Promise(_) | Value::Opaque(_) => {
                serde_json::Value::Null
            }
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

/// `i128` is the bigint type.
impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<super::types::Symbol> for Value {
    fn from(sym: super::types::Symbol) -> Self {
        Value::Symbol(sym)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_round_trip_of_plain_document() {
        let doc = json!({"name": "Alice", "tags": ["a", "b"], "age": 30, "ok": true, "none": null});
        let value = Value::from(doc.clone());
        assert_eq!(value.get("age"), Some(&Value::Number(30.0)));
        assert_eq!(value.to_json(), doc);
    }

    #[test]
    fn test_lossy_reporting_forms() {
        let value = Value::object([
            ("big", Value::BigInt(12)),
            ("gone", Value::Undefined),
            ("pairs", Value::map([("k", 1)])),
            ("members", Value::set([1, 2])),
        ]);
        assert_eq!(
            value.to_json(),
            json!({"big": "12", "pairs": [["k", 1]], "members": [1, 2]})
        );
    }

    #[test]
    fn test_non_finite_numbers_render_as_null() {
        assert_eq!(Value::Number(f64::INFINITY).to_json(), serde_json::Value::Null);
        assert_eq!(Value::Number(1.5).to_json(), json!(1.5));
    }
}
