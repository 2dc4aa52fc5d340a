//! Field value types and lookup equality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Short type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Uuid(_) => "uuid",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::Null => "null",
        }
    }

    /// Equality as used by `field = value` lookups.
    ///
    /// Integers and floats compare numerically, and a string matches an
    /// integer, boolean, UUID or datetime column when it parses to the same
    /// value. `Null` only matches `Null`. Anything else must be the same variant.
    pub fn lookup_eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Float(b))
            | (FieldValue::Float(b), FieldValue::Integer(a)) => float_is_integer(*b, *a),
            (FieldValue::String(s), FieldValue::Integer(i))
            | (FieldValue::Integer(i), FieldValue::String(s)) => {
                s.trim().parse::<i64>().is_ok_and(|parsed| parsed == *i)
            }
            (FieldValue::String(s), FieldValue::Boolean(b))
            | (FieldValue::Boolean(b), FieldValue::String(s)) => parse_bool(s) == Some(*b),
            (FieldValue::String(s), FieldValue::Uuid(u))
            | (FieldValue::Uuid(u), FieldValue::String(s)) => {
                Uuid::parse_str(s).is_ok_and(|parsed| parsed == *u)
            }
            (FieldValue::String(s), FieldValue::DateTime(d))
            | (FieldValue::DateTime(d), FieldValue::String(s)) => DateTime::parse_from_rfc3339(s)
                .is_ok_and(|parsed| parsed.with_timezone(&Utc) == *d),
            _ => self == other,
        }
    }
}

/// Exact comparison; `i64 as f64` would round above 2^53
fn float_is_integer(x: f64, i: i64) -> bool {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 && x as i64 == i
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "True" | "t" | "1" => Some(true),
        "false" | "False" | "f" | "0" => Some(false),
        _ => None,
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{:?}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Uuid(u) => write!(f, "{}", u),
            FieldValue::DateTime(d) => write!(f, "{}", d.to_rfc3339()),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Conversion from a [`FieldValue`] back into a concrete Rust field type.
///
/// Used when a stored record is written through a dynamic field name
/// (e.g. `QuerySet::update`). Returns the received type name on mismatch.
pub trait FromFieldValue: Sized {
    fn from_field_value(value: FieldValue) -> Result<Self, &'static str>;
}

impl FromFieldValue for String {
    fn from_field_value(value: FieldValue) -> Result<Self, &'static str> {
        match value {
            FieldValue::String(s) => Ok(s),
            other => Err(other.type_name()),
        }
    }
}

impl FromFieldValue for i64 {
    fn from_field_value(value: FieldValue) -> Result<Self, &'static str> {
        match value {
            FieldValue::Integer(i) => Ok(i),
            other => Err(other.type_name()),
        }
    }
}

impl FromFieldValue for f64 {
    fn from_field_value(value: FieldValue) -> Result<Self, &'static str> {
        match value {
            FieldValue::Float(x) => Ok(x),
            FieldValue::Integer(i) => Ok(i as f64),
            other => Err(other.type_name()),
        }
    }
}

impl FromFieldValue for bool {
    fn from_field_value(value: FieldValue) -> Result<Self, &'static str> {
        match value {
            FieldValue::Boolean(b) => Ok(b),
            other => Err(other.type_name()),
        }
    }
}

impl FromFieldValue for Uuid {
    fn from_field_value(value: FieldValue) -> Result<Self, &'static str> {
        match value {
            FieldValue::Uuid(u) => Ok(u),
            FieldValue::String(s) => Uuid::parse_str(&s).map_err(|_| "string"),
            other => Err(other.type_name()),
        }
    }
}

impl FromFieldValue for DateTime<Utc> {
    fn from_field_value(value: FieldValue) -> Result<Self, &'static str> {
        match value {
            FieldValue::DateTime(d) => Ok(d),
            FieldValue::String(s) => DateTime::parse_from_rfc3339(&s)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|_| "string"),
            other => Err(other.type_name()),
        }
    }
}

impl<T: FromFieldValue> FromFieldValue for Option<T> {
    fn from_field_value(value: FieldValue) -> Result<Self, &'static str> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}
