//! Typed primitive and temporal values.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::Value;

/// Text layout used when a [`Scalar::DateTime`] is turned back into a value.
/// `%.f` prints nothing for whole seconds.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Declared type of a simple field.
///
/// `Integer` and `Float` are 32-bit; `Long` and `Double` are 64-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    String,
    Date,
    DateTime,
}

impl ScalarType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
        }
    }

    /// Whether a field of this type may serve as a record identifier.
    pub const fn is_identifier_type(self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::String)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value that already conforms to a [`ScalarType`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Scalar {
    pub const fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Integer(_) => ScalarType::Integer,
            Self::Long(_) => ScalarType::Long,
            Self::Float(_) => ScalarType::Float,
            Self::Double(_) => ScalarType::Double,
            Self::Boolean(_) => ScalarType::Boolean,
            Self::String(_) => ScalarType::String,
            Self::Date(_) => ScalarType::Date,
            Self::DateTime(_) => ScalarType::DateTime,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(f64::from(*i)),
            #[allow(clippy::cast_precision_loss)]
            Self::Long(i) => Some(*i as f64),
            Self::Float(x) => Some(f64::from(*x)),
            Self::Double(x) => Some(*x),
            _ => None,
        }
    }
}

/// Numbers compare across widths; every other pair compares only within
/// the same type.
impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.partial_cmp(b),
            (Self::Long(a), Self::Long(b)) => a.partial_cmp(b),
            (Self::Boolean(a), Self::Boolean(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.partial_cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.partial_cmp(b),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Long(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Double(x) => write!(f, "{x}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

/// Temporal scalars become their ISO-8601 text, which coerces back to the
/// same scalar.
impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Integer(i) => Self::Int(i64::from(i)),
            Scalar::Long(i) => Self::Int(i),
            Scalar::Float(x) => Self::Float(f64::from(x)),
            Scalar::Double(x) => Self::Float(x),
            Scalar::Boolean(b) => Self::Bool(b),
            Scalar::String(s) => Self::String(s),
            date @ (Scalar::Date(_) | Scalar::DateTime(_)) => Self::String(date.to_string()),
        }
    }
}
