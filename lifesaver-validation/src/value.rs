// Loosely-typed form input and its coercions

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fmt;

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap()
});

/// A raw form value whose shape is not known in advance.
///
/// Form state arrives as strings, numbers, booleans, nulls or missing keys.
/// Every predicate accepts a `FieldValue` and coerces it to the form it
/// needs: see [`coerce_to_string`](FieldValue::coerce_to_string),
/// [`coerce_to_number`](FieldValue::coerce_to_number) and
/// [`is_truthy`](FieldValue::is_truthy).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// The field was never provided
    #[default]
    Undefined,
    /// The field was explicitly null
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Array(Vec<FieldValue>),
    /// Any object; only its identity as an object matters
    Object,
}

impl FieldValue {
    /// Whether the value counts as "provided".
    ///
    /// Undefined, null, `false`, the empty string, `0` and NaN are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Undefined | FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Array(_) | FieldValue::Object => true,
        }
    }

    /// String form used by the pattern predicates, as a browser's
    /// `String()` produces it.
    ///
    /// Undefined and null spell their names, arrays join their items with
    /// commas (absent items become empty), objects are `[object Object]`.
    pub fn coerce_to_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Undefined => "undefined".to_string(),
            FieldValue::Null => "null".to_string(),
            FieldValue::Array(items) => items
                .iter()
                .map(|item| match item {
                    FieldValue::Undefined | FieldValue::Null => String::new(),
                    other => other.coerce_to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            FieldValue::Object => "[object Object]".to_string(),
        }
    }

    /// Numeric form used by the integer predicate. Unconvertible input is NaN.
    pub fn coerce_to_number(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => parse_number(s),
            FieldValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            FieldValue::Null => 0.0,
            // Arrays go through their string form: `[]` is 0, `[5]` is 5.
            FieldValue::Array(_) => parse_number(&self.coerce_to_string()),
            FieldValue::Undefined | FieldValue::Object => f64::NAN,
        }
    }
}

/// Format a number the way a browser prints it.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }

    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exp,
    }
}

/// Parse text the way a browser's `Number()` does.
fn parse_number(raw: &str) -> f64 {
    let s = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };

    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        return digits.chars().try_fold(0.0f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
        })
        .unwrap_or(f64::NAN);
    }

    if DECIMAL_LITERAL.is_match(s) {
        s.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.coerce_to_string())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Number(value as f64)
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Number(value as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Undefined, Into::into)
    }
}

impl From<&FieldValue> for FieldValue {
    fn from(value: &FieldValue) -> Self {
        value.clone()
    }
}

impl From<&serde_json::Value> for FieldValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            serde_json::Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => FieldValue::Text(s.clone()),
            serde_json::Value::Array(items) => {
                FieldValue::Array(items.iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(_) => FieldValue::Object,
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => FieldValue::Text(s),
            other => FieldValue::from(&other),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(FieldValue::from)
    }
}
