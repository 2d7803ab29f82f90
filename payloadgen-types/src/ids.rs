//! Record identifiers.
//!
//! An identifier is always the result of coercing a payload value to the
//! identifier type declared by a record type, so two ids for the same type
//! share a variant and compare by value.

use serde::Serialize;
use std::fmt;

use crate::{Scalar, ScalarType, Value};

/// Identifier of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Integer(i32),
    Long(i64),
    String(String),
}

impl RecordId {
    /// Returns the scalar type this identifier was coerced to.
    #[must_use]
    pub const fn id_type(&self) -> ScalarType {
        match self {
            Self::Integer(_) => ScalarType::Integer,
            Self::Long(_) => ScalarType::Long,
            Self::String(_) => ScalarType::String,
        }
    }

    /// Reads an identifier back out of a typed field value.
    /// Returns `None` for scalar types that cannot identify a record.
    #[must_use]
    pub fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Integer(i) => Some(Self::Integer(*i)),
            Scalar::Long(i) => Some(Self::Long(*i)),
            Scalar::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Long(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<RecordId> for Scalar {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Integer(i) => Self::Integer(i),
            RecordId::Long(i) => Self::Long(i),
            RecordId::String(s) => Self::String(s),
        }
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Scalar::from(id).into()
    }
}
