//! Typed cell values

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value held by a row field.
///
/// Values arriving from a file are text until the import pipeline coerces
/// them; values arriving from the row store are already typed.
///
/// # Type Mapping
///
/// | Field kind | Rust Variant |
/// |------------|--------------|
/// | null | `Null` |
/// | Integer | `Int` |
/// | Decimal | `Decimal` |
/// | Text, Choice | `Text` |
/// | Timestamp | `Timestamp` |
///
/// # Example
///
/// ```
/// use tabula_lib::model::Value;
///
/// let name = Value::from("Widget");
/// let qty = Value::from(12i64);
/// let empty = Value::Null;
/// assert!(empty.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// Arbitrary precision decimal. Keeps its scale, so `100.10` stays `100.10`.
    Decimal(Decimal),
    /// Text value.
    Text(String),
    /// Point in time, always normalized to UTC.
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null and for text that is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns `true` for integer and decimal values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Decimal(_))
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
        }
    }

    /// Returns the value as a decimal when it is numeric.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(n) => Some(Decimal::from(*n)),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the value as text when it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Renders the value the way it is shown in a table cell and written to
    /// an exported file. Null renders as an empty string.
    ///
    /// Timestamps use RFC 3339 in UTC with millisecond precision.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Text(s) => s.clone(),
            Value::Timestamp(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Compares two values of compatible kinds.
    ///
    /// Integers and decimals compare numerically with each other. Values of
    /// unrelated kinds, and nulls, are not comparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                Some(a.as_decimal()?.cmp(&b.as_decimal()?))
            }
            _ => None,
        }
    }

    /// Returns the numeric value as `f64`, for callers that need a float.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

macro_rules! value_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i32 => Int,
    u32 => Int,
    i64 => Int,
    Decimal => Decimal,
    String => Text,
    &str => Text,
    DateTime<Utc> => Timestamp,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
