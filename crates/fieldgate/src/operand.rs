//! Owned, typed clause values.
//!
//! Filter clauses arrive with loosely-typed JSON values. Compilation
//! converts each one into an [`Operand`] of the target field's
//! [`ValueType`] exactly once, so evaluation never re-parses input.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value as Json;

use crate::value::{Number, Timestamp, ValueType};

/// A clause value after conversion to its field's type.
///
/// Unlike [`Value`](crate::Value), which borrows from the record, `Operand`
/// owns its data so it can live in a compiled predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// String value.
    String(String),
    /// Numeric value, in the representation of the field's type.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Enum variant label.
    Enum(String),
    /// Boolean value.
    Bool(bool),
    /// Explicit null, only produced for nullable fields.
    Null,
}

/// Why a clause value could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

impl ConversionError {
    fn new(reason: impl Into<String>) -> Self {
        ConversionError(reason.into())
    }
}

impl Operand {
    /// Converts a loosely-typed value into an operand of type `target`.
    ///
    /// Values already of the target's JSON shape pass through; otherwise a
    /// best-effort conversion is attempted (numeric widening, numeric text,
    /// date text). `null` is accepted only when `nullable` is set.
    pub fn convert(
        value: &Json,
        target: ValueType,
        nullable: bool,
    ) -> Result<Operand, ConversionError> {
        match value {
            Json::Null if nullable => return Ok(Operand::Null),
            Json::Null => {
                return Err(ConversionError::new(
                    "null is not allowed for a non-nullable field",
                ))
            }
            Json::Array(_) | Json::Object(_) => {
                return Err(ConversionError::new("expected a scalar value"))
            }
            _ => {}
        }

        match target {
            ValueType::String => to_string(value).map(Operand::String),
            ValueType::Integer => to_i64(value).map(|n| Operand::Number(Number::I64(n))),
            ValueType::Unsigned => to_u64(value).map(|n| Operand::Number(Number::U64(n))),
            ValueType::Float => to_f64(value).map(|n| Operand::Number(Number::F64(n))),
            ValueType::Decimal => to_decimal(value).map(|d| Operand::Number(Number::Decimal(d))),
            ValueType::Bool => to_bool(value).map(Operand::Bool),
            ValueType::Timestamp => to_timestamp(value).map(Operand::Timestamp),
            ValueType::Enum => match value {
                Json::String(s) => Ok(Operand::Enum(s.clone())),
                _ => Err(ConversionError::new("expected a variant name")),
            },
        }
    }

    /// Returns `true` if this is the explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Null)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::String(s) => write!(f, "{s:?}"),
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Timestamp(t) => write!(f, "{t}"),
            Operand::Enum(label) => f.write_str(label),
            Operand::Bool(b) => write!(f, "{b}"),
            Operand::Null => f.write_str("null"),
        }
    }
}

fn to_string(value: &Json) -> Result<String, ConversionError> {
    match value {
        Json::String(s) => Ok(s.clone()),
        Json::Number(n) => Ok(n.to_string()),
        Json::Bool(b) => Ok(b.to_string()),
        _ => Err(ConversionError::new("expected text")),
    }
}

fn to_i64(value: &Json) -> Result<i64, ConversionError> {
    match value {
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(ConversionError::new("value out of range"))
            } else {
                integral_f64(n.as_f64())
                    .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
                    .ok_or_else(|| ConversionError::new("not an integer"))
            }
        }
        Json::String(s) => s
            .trim()
            .parse()
            .map_err(|e| ConversionError::new(format!("not an integer ({e})"))),
        _ => Err(ConversionError::new("expected a number")),
    }
}

fn to_u64(value: &Json) -> Result<u64, ConversionError> {
    match value {
        Json::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(u)
            } else if n.is_i64() {
                Err(ConversionError::new("negative value"))
            } else {
                integral_f64(n.as_f64())
                    .filter(|f| *f >= 0.0 && *f < u64::MAX as f64)
                    .map(|f| f as u64)
                    .ok_or_else(|| ConversionError::new("not an unsigned integer"))
            }
        }
        Json::String(s) => s
            .trim()
            .parse()
            .map_err(|e| ConversionError::new(format!("not an unsigned integer ({e})"))),
        _ => Err(ConversionError::new("expected a number")),
    }
}

fn integral_f64(f: Option<f64>) -> Option<f64> {
    f.filter(|f| f.is_finite() && f.fract() == 0.0)
}

fn to_f64(value: &Json) -> Result<f64, ConversionError> {
    let parsed = match value {
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| ConversionError::new("not representable as a float"))?,
        Json::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| ConversionError::new(format!("not a number ({e})")))?,
        _ => return Err(ConversionError::new("expected a number")),
    };
    if !parsed.is_finite() {
        return Err(ConversionError::new("not a finite number"));
    }
    Ok(parsed)
}

fn to_decimal(value: &Json) -> Result<Decimal, ConversionError> {
    let text = match value {
        Json::Number(n) => n.to_string(),
        Json::String(s) => s.trim().to_string(),
        _ => return Err(ConversionError::new("expected a number")),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| ConversionError::new(format!("not a decimal ({e})")))
}

fn to_bool(value: &Json) -> Result<bool, ConversionError> {
    match value {
        Json::Bool(b) => Ok(*b),
        Json::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        Json::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(ConversionError::new("expected true or false")),
    }
}

fn to_timestamp(value: &Json) -> Result<Timestamp, ConversionError> {
    match value {
        Json::String(s) => {
            Timestamp::parse(s).ok_or_else(|| ConversionError::new("not a recognized date or time"))
        }
        Json::Number(n) => n
            .as_i64()
            .map(Timestamp::from_millis)
            .ok_or_else(|| ConversionError::new("expected milliseconds since epoch")),
        _ => Err(ConversionError::new("expected a date or time")),
    }
}
