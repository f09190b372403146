//! Runtime value types for field comparison.
//!
//! The [`Value`] enum represents the runtime value of a field read from a record.
//! [`FieldValue`] ties each supported Rust field type to its [`ValueType`], which
//! is what the compilers check operators and clause values against.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Runtime value for comparison, borrowed from the source record.
///
/// Accessors registered in a [`FieldRegistry`](crate::FieldRegistry) produce
/// this type through [`FieldValue::to_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Enum variant label.
    Enum(&'a str),
    /// Boolean value.
    Bool(bool),
    /// Absent value of a nullable field.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// The declared type of a registered field.
///
/// Operator validity is decided on this type at compile time, never on the
/// runtime [`Value`] of a particular record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Text field.
    String,
    /// Signed integer field (`i8` through `i64`, `isize`).
    Integer,
    /// Unsigned integer field (`u8` through `u64`, `usize`).
    Unsigned,
    /// Floating point field.
    Float,
    /// Fixed-point decimal field.
    Decimal,
    /// Boolean field.
    Bool,
    /// Point in time.
    Timestamp,
    /// Host enum, compared by variant label.
    Enum,
}

impl ValueType {
    /// Returns `true` if range operators apply to this type.
    ///
    /// Only numbers and timestamps take `GreaterThan` and friends; text and
    /// bools are limited to equality and (for text) the string operators.
    pub fn supports_range(self) -> bool {
        self.is_numeric() || matches!(self, ValueType::Timestamp)
    }

    /// Returns `true` if fields of this type can be sort keys.
    ///
    /// Enum labels are identities, not positions, so they cannot be sorted.
    pub fn is_sortable(self) -> bool {
        !matches!(self, ValueType::Enum)
    }

    /// Returns `true` if this is the text type.
    pub fn is_string(self) -> bool {
        matches!(self, ValueType::String)
    }

    /// Returns `true` for the numeric types.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ValueType::Integer | ValueType::Unsigned | ValueType::Float | ValueType::Decimal
        )
    }

    /// Returns the display name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Unsigned => "unsigned integer",
            ValueType::Float => "float",
            ValueType::Decimal => "decimal",
            ValueType::Bool => "bool",
            ValueType::Timestamp => "timestamp",
            ValueType::Enum => "enum",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of four variants to preserve precision.
/// Comparisons between different variants are handled by converting to the
/// most precise common representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
    /// Fixed-point decimal.
    Decimal(Decimal),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::Decimal(a), Number::Decimal(b)) => Some(a.cmp(&b)),

            // Integers compare exactly across signedness
            (Number::I64(a), Number::U64(b)) => Some(if a < 0 {
                Ordering::Less
            } else {
                (a as u64).cmp(&b)
            }),
            (Number::U64(_), Number::I64(_)) => other.compare(self).map(Ordering::reverse),

            (Number::Decimal(a), Number::I64(b)) => Some(a.cmp(&Decimal::from(b))),
            (Number::Decimal(a), Number::U64(b)) => Some(a.cmp(&Decimal::from(b))),
            (Number::Decimal(a), Number::F64(b)) => match Decimal::try_from(b) {
                Ok(b) => Some(a.cmp(&b)),
                Err(_) => self.to_f64().partial_cmp(&b),
            },
            (_, Number::Decimal(_)) => other.compare(self).map(Ordering::reverse),

            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Total order over numbers, used for sorting.
    ///
    /// Agrees with [`Number::compare`] whenever that returns `Some`; NaN falls
    /// back to the IEEE 754 total order.
    pub fn total_cmp(self, other: Number) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|| self.to_f64().total_cmp(&other.to_f64()))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
            Number::Decimal(d) => write!(f, "{d}"),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

impl From<Decimal> for Number {
    fn from(d: Decimal) -> Self {
        Number::Decimal(d)
    }
}

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// This provides a simple, timezone-agnostic representation suitable
/// for comparison operations. `chrono` date and time types convert into it
/// through their [`FieldValue`] implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Parses a timestamp from text.
    ///
    /// Accepts RFC 3339 (`2024-01-29T10:00:00Z`, any offset), a naive
    /// date-time taken as UTC (`2024-01-29T10:00:00`, optional fraction, `T`
    /// or space separator) and a bare date taken as midnight UTC
    /// (`2024-01-29`).
    pub fn parse(text: &str) -> Option<Timestamp> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Timestamp(dt.timestamp_millis()));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Timestamp::from(dt));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(Timestamp::from)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.timestamp_millis())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Timestamp(dt.and_utc().timestamp_millis())
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(date: NaiveDate) -> Self {
        Timestamp::from(date.and_time(NaiveTime::MIN))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// A Rust type that can back a registered field.
///
/// The associated constants describe the field to the compilers; `to_value`
/// reads it at evaluation time. Implemented for strings, primitive numbers,
/// [`Decimal`], `bool`, `chrono` date and time types, [`Timestamp`] and
/// `Option<V>`.
///
/// Host enums implement it with [`ValueType::Enum`]:
///
/// ```
/// use fieldgate::{FieldValue, Value, ValueType};
///
/// enum Status {
///     Open,
///     Closed,
/// }
///
/// impl FieldValue for Status {
///     const VALUE_TYPE: ValueType = ValueType::Enum;
///
///     fn to_value(&self) -> Value<'_> {
///         match self {
///             Status::Open => Value::Enum("Open"),
///             Status::Closed => Value::Enum("Closed"),
///         }
///     }
/// }
/// ```
pub trait FieldValue {
    /// The declared type of fields holding this Rust type.
    const VALUE_TYPE: ValueType;

    /// Whether the field may be absent.
    const NULLABLE: bool = false;

    /// Reads the runtime value.
    fn to_value(&self) -> Value<'_>;
}

impl FieldValue for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl FieldValue for str {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

macro_rules! impl_field_value_number {
    ($value_type:ident, $variant:ident as $repr:ty: $($t:ty),*) => {
        $(
            impl FieldValue for $t {
                const VALUE_TYPE: ValueType = ValueType::$value_type;

                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::$variant(*self as $repr))
                }
            }
        )*
    };
}

impl_field_value_number!(Integer, I64 as i64: i8, i16, i32, i64, isize);
impl_field_value_number!(Unsigned, U64 as u64: u8, u16, u32, u64, usize);
impl_field_value_number!(Float, F64 as f64: f32, f64);

impl FieldValue for Decimal {
    const VALUE_TYPE: ValueType = ValueType::Decimal;

    fn to_value(&self) -> Value<'_> {
        Value::Number(Number::Decimal(*self))
    }
}

impl FieldValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl FieldValue for Timestamp {
    const VALUE_TYPE: ValueType = ValueType::Timestamp;

    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl FieldValue for DateTime<Utc> {
    const VALUE_TYPE: ValueType = ValueType::Timestamp;

    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl FieldValue for NaiveDateTime {
    const VALUE_TYPE: ValueType = ValueType::Timestamp;

    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl FieldValue for NaiveDate {
    const VALUE_TYPE: ValueType = ValueType::Timestamp;

    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    const VALUE_TYPE: ValueType = V::VALUE_TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value<'_> {
        match self {
            Some(v) => v.to_value(),
            None => Value::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn value_extractors() {
        assert_eq!(Value::String("hello").as_str(), Some("hello"));
        assert_eq!(
            Value::Number(Number::I64(42)).as_number(),
            Some(Number::I64(42))
        );
        assert_eq!(
            Value::Timestamp(Timestamp(1000)).as_timestamp(),
            Some(Timestamp(1000))
        );
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert!(Value::None.is_none());

        // Wrong type returns None
        assert_eq!(Value::String("test").as_number(), None);
        assert_eq!(Value::Number(Number::I64(1)).as_str(), None);
    }

    #[test]
    fn value_type_capabilities() {
        assert!(ValueType::Decimal.supports_range());
        assert!(ValueType::Timestamp.supports_range());
        assert!(!ValueType::String.supports_range());
        assert!(!ValueType::Bool.supports_range());
        assert!(!ValueType::Enum.supports_range());
        assert!(ValueType::String.is_sortable());
        assert!(ValueType::Bool.is_sortable());
        assert!(!ValueType::Enum.is_sortable());

        assert!(ValueType::String.is_string());
        assert!(!ValueType::Integer.is_string());
        assert!(ValueType::Float.is_numeric());
        assert!(!ValueType::Timestamp.is_numeric());
    }

    #[test]
    fn number_comparisons_same_type() {
        assert_eq!(
            Number::I64(5).compare(Number::I64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(10).compare(Number::U64(5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Number::F64(5.0).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(
            Number::I64(-1).compare(Number::U64(0)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(u64::MAX).compare(Number::I64(i64::MAX)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Number::I64(5).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn decimal_comparisons_are_exact() {
        let price = Number::Decimal(Decimal::from_str("1.50").unwrap());
        assert_eq!(price.compare(Number::F64(1.5)), Some(Ordering::Equal));
        assert_eq!(price.compare(Number::I64(1)), Some(Ordering::Greater));
        assert_eq!(Number::U64(2).compare(price), Some(Ordering::Greater));
    }

    #[test]
    fn number_nan_comparison() {
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
        assert_eq!(
            Number::F64(f64::NAN).total_cmp(Number::F64(1.0)),
            Ordering::Greater
        );
    }

    #[test]
    fn timestamp_parsing() {
        assert_eq!(
            Timestamp::parse("1970-01-01T00:00:01Z"),
            Some(Timestamp(1000))
        );
        assert_eq!(
            Timestamp::parse("1970-01-01T01:00:00+01:00"),
            Some(Timestamp(0))
        );
        assert_eq!(
            Timestamp::parse("1970-01-01T00:00:00.250"),
            Some(Timestamp(250))
        );
        assert_eq!(Timestamp::parse("1970-01-02"), Some(Timestamp(86_400_000)));
        assert_eq!(Timestamp::parse("yesterday"), None);
    }

    #[test]
    fn chrono_conversions() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(date.to_value(), Value::Timestamp(Timestamp(86_400_000)));

        let dt = DateTime::<Utc>::from_timestamp_millis(1500).unwrap();
        assert_eq!(dt.to_value(), Value::Timestamp(Timestamp(1500)));
    }

    #[test]
    fn option_marks_field_nullable() {
        assert!(<Option<String> as FieldValue>::NULLABLE);
        assert!(!<String as FieldValue>::NULLABLE);
        assert_eq!(
            <Option<u8> as FieldValue>::VALUE_TYPE,
            ValueType::Unsigned
        );
        assert_eq!(None::<String>.to_value(), Value::None);
        assert_eq!(Some(3i32).to_value(), Value::Number(Number::I64(3)));
    }
}
