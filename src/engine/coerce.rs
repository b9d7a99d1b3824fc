//! Best-effort conversions applied before the type check of coercing
//! schemas. The rules mirror the JavaScript `String`, `Number`,
//! `Boolean`, `BigInt` and `Date` constructors.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::value::{format_number, Value};

/// `String(value)`
pub(crate) fn to_string(value: Value) -> Value {
    let text = match value {
        Value::String(s) => return Value::String(s),
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::BigInt(i) => i.to_string(),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Undefined | Value::Null => String::new(),
                other => match to_string(other) {
                    Value::String(s) => s,
                    _ => String::new(),
                },
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    };
    Value::String(text)
}

/// `Number(value)`; NaN when the input has no numeric reading.
pub(crate) fn to_number(value: Value) -> Value {
    let n = match &value {
        Value::Number(n) => *n,
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::BigInt(i) => *i as f64,
        Value::String(s) => parse_number(s),
        Value::Date(d) => d.timestamp_millis() as f64,
        _ => f64::NAN,
    };
    Value::Number(n)
}

fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }
    // Rust also accepts "inf" and "nan" spellings, which JavaScript does not
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// JavaScript truthiness.
pub(crate) fn to_boolean(value: Value) -> Value {
    let b = match &value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::BigInt(i) => *i != 0,
        Value::String(s) => !s.is_empty(),
        _ => true,
    };
    Value::Bool(b)
}

/// `BigInt(value)`; input with no integer reading is returned unchanged
/// so the type check reports it.
pub(crate) fn to_bigint(value: Value) -> Value {
    let converted = match &value {
        Value::BigInt(i) => Some(*i),
        Value::Bool(b) => Some(i128::from(*b)),
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i128),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0)
            } else {
                s.parse::<i128>().ok()
            }
        }
        _ => None,
    };
    converted.map(Value::BigInt).unwrap_or(value)
}

/// Outcome of `new Date(value)`.
pub(crate) enum DateCoercion {
    Date(DateTime<Utc>),
    /// The input converts to an invalid date
    Invalid,
    /// The input has no date reading at all
    Unchanged(Value),
}

pub(crate) fn to_date(value: Value) -> DateCoercion {
    match value {
        Value::Date(d) => DateCoercion::Date(d),
        Value::Null => from_millis(0.0),
        Value::Bool(b) => from_millis(if b { 1.0 } else { 0.0 }),
        Value::Number(n) => from_millis(n),
        Value::BigInt(i) => from_millis(i as f64),
        Value::String(s) => parse_date(s.trim())
            .map(DateCoercion::Date)
            .unwrap_or(DateCoercion::Invalid),
        Value::Undefined => DateCoercion::Invalid,
        other => DateCoercion::Unchanged(other),
    }
}

fn from_millis(ms: f64) -> DateCoercion {
    if !ms.is_finite() {
        return DateCoercion::Invalid;
    }
    match Utc.timestamp_millis_opt(ms as i64).single() {
        Some(d) => DateCoercion::Date(d),
        None => DateCoercion::Invalid,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coercion() {
        assert_eq!(to_number(Value::from("42")), Value::Number(42.0));
        assert_eq!(to_number(Value::from(" 3.5 ")), Value::Number(3.5));
        assert_eq!(to_number(Value::from("")), Value::Number(0.0));
        assert_eq!(to_number(Value::from("0x1A")), Value::Number(26.0));
        assert_eq!(to_number(Value::Bool(true)), Value::Number(1.0));
        assert_eq!(to_number(Value::Null), Value::Number(0.0));
        assert!(to_number(Value::from("abc")).as_f64().map_or(false, f64::is_nan));
        assert!(to_number(Value::from("inf")).as_f64().map_or(false, f64::is_nan));
        assert_eq!(to_number(Value::from("-Infinity")), Value::Number(f64::NEG_INFINITY));
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(to_string(Value::from(12)), Value::from("12"));
        assert_eq!(to_string(Value::Bool(false)), Value::from("false"));
        assert_eq!(to_string(Value::Null), Value::from("null"));
        assert_eq!(
            to_string(Value::array([Value::from(1), Value::Null, Value::from("x")])),
            Value::from("1,,x")
        );
    }

    #[test]
    fn test_boolean_truthiness() {
        assert_eq!(to_boolean(Value::from("")), Value::Bool(false));
        assert_eq!(to_boolean(Value::from("false")), Value::Bool(true));
        assert_eq!(to_boolean(Value::from(0)), Value::Bool(false));
        assert_eq!(to_boolean(Value::Number(f64::NAN)), Value::Bool(false));
        assert_eq!(to_boolean(Value::array(Vec::<Value>::new())), Value::Bool(true));
    }

    #[test]
    fn test_bigint_coercion() {
        assert_eq!(to_bigint(Value::from("12345678901234567890")), Value::BigInt(12345678901234567890));
        assert_eq!(to_bigint(Value::from(7)), Value::BigInt(7));
        assert_eq!(to_bigint(Value::from(1.5)), Value::from(1.5));
        assert_eq!(to_bigint(Value::from("1.5")), Value::from("1.5"));
    }

    #[test]
    fn test_date_coercion() {
        match to_date(Value::from("2024-01-15")) {
            DateCoercion::Date(d) => assert_eq!(d.to_rfc3339(), "2024-01-15T00:00:00+00:00"),
            _ => panic!("expected a date"),
        }
        match to_date(Value::from(0)) {
            DateCoercion::Date(d) => assert_eq!(d.timestamp_millis(), 0),
            _ => panic!("expected a date"),
        }
        assert!(matches!(to_date(Value::from("yesterday")), DateCoercion::Invalid));
        assert!(matches!(
            to_date(Value::array(Vec::<Value>::new())),
            DateCoercion::Unchanged(_)
        ));
    }
}
