//! Cell coercion from spreadsheet text to typed values

use std::str::FromStr;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use rust_decimal::Decimal;

use crate::datetime::parse_timestamp;
use crate::model::Value;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid number pattern"));

/// How the cells of one field are typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Coercion {
    /// Numbers become numeric values, anything else stays text.
    #[default]
    Infer,
    /// Always text, so `0042` keeps its leading zeros.
    Text,
    /// Dates through [`parse_timestamp`].
    Timestamp,
}

/// Coerces one cell.
///
/// - empty, whitespace-only or `null` (any case) becomes [`Value::Null`]
/// - [`Coercion::Timestamp`] cells go through [`parse_timestamp`]; failures
///   log a warning and become null
/// - [`Coercion::Text`] cells are kept as the original text
/// - otherwise integers become [`Value::Int`], other numbers
///   [`Value::Decimal`] with the scale as written, and anything else is kept
///   as the original text
pub fn coerce_cell(key: &str, raw: &str, coercion: Coercion) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return Value::Null;
    }

    match coercion {
        Coercion::Timestamp => match parse_timestamp(trimmed) {
            Some(dt) => Value::Timestamp(dt),
            None => {
                warn!("Could not parse date '{trimmed}' for field '{key}', storing null");
                Value::Null
            }
        },
        Coercion::Text => Value::Text(raw.to_string()),
        Coercion::Infer => infer(raw, trimmed),
    }
}

fn infer(raw: &str, trimmed: &str) -> Value {
    if NUMBER.is_match(trimmed) {
        if !trimmed.contains('.')
            && let Ok(n) = trimmed.parse::<i64>()
        {
            return Value::Int(n);
        }
        if let Ok(d) = Decimal::from_str(trimmed) {
            return Value::Decimal(d);
        }
    }

    Value::Text(raw.to_string())
}
