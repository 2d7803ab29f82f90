//! Scalar coercion table.
//!
//! Payload values arrive as whatever the wire format produced. Each simple
//! field declares a [`ScalarType`]; this module converts the one into the
//! other, or reports a `TypeCoercion` error naming the value and the target.

use chrono::NaiveDateTime;
use payloadgen_types::{RecordId, Scalar, ScalarType, Value};

use crate::{EngineError, EngineResult};

/// Converts `value` to `target`.
///
/// `Null` yields `None`. A value whose runtime type already satisfies the
/// target passes through; everything else is parsed from its canonical text.
/// Booleans parse leniently: only `"true"` (any case) is true.
pub fn coerce_scalar(value: &Value, target: ScalarType) -> EngineResult<Option<Scalar>> {
    let scalar = match (value, target) {
        (Value::Null, _) => return Ok(None),
        (Value::List(_) | Value::Object(_), _) => return Err(mismatch(value, target)),

        (Value::String(s), ScalarType::String) => Scalar::String(s.clone()),
        (Value::Bool(b), ScalarType::Boolean) => Scalar::Boolean(*b),
        (Value::Int(n), ScalarType::Long) => Scalar::Long(*n),
        (Value::Int(n), ScalarType::Integer) => {
            Scalar::Integer(i32::try_from(*n).map_err(|_| mismatch(value, target))?)
        }
        (Value::Int(n), ScalarType::Double) => Scalar::Double(*n as f64),
        (Value::Int(n), ScalarType::Float) => Scalar::Float(*n as f32),
        (Value::Float(x), ScalarType::Double) => Scalar::Double(*x),
        (Value::Float(x), ScalarType::Float) => Scalar::Float(*x as f32),

        (other, _) => parse_text(&other.to_string(), target)
            .ok_or_else(|| mismatch(other, target))?,
    };
    Ok(Some(scalar))
}

/// Converts a raw identifier to the identifier type of a record type.
///
/// Only `Integer`, `Long` and `String` identifiers are supported.
pub fn coerce_identifier(value: &Value, id_type: ScalarType) -> EngineResult<RecordId> {
    if !id_type.is_identifier_type() {
        return Err(EngineError::UnsupportedIdentifierType(id_type));
    }
    let scalar = coerce_scalar(value, id_type)?.ok_or(EngineError::MissingIdentifier)?;
    RecordId::from_scalar(&scalar).ok_or(EngineError::UnsupportedIdentifierType(id_type))
}

fn parse_text(text: &str, target: ScalarType) -> Option<Scalar> {
    let scalar = match target {
        ScalarType::Integer => Scalar::Integer(text.parse().ok()?),
        ScalarType::Long => Scalar::Long(text.parse().ok()?),
        ScalarType::Float => Scalar::Float(text.parse().ok()?),
        ScalarType::Double => Scalar::Double(text.parse().ok()?),
        ScalarType::Boolean => Scalar::Boolean(text.eq_ignore_ascii_case("true")),
        ScalarType::String => Scalar::String(text.to_string()),
        ScalarType::Date => Scalar::Date(text.parse().ok()?),
        ScalarType::DateTime => Scalar::DateTime(parse_datetime(text)?),
    };
    Some(scalar)
}

/// ISO local date-time, with seconds optional.
fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .ok()
}

fn mismatch(value: &Value, target: ScalarType) -> EngineError {
    EngineError::TypeCoercion {
        value: value.to_string(),
        target,
    }
}
