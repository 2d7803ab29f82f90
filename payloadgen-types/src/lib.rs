//! Core value types for payloadgen.
//!
//! This crate defines the schema-agnostic building blocks the mapping engine
//! works with:
//! - [`Value`] / [`Payload`]: the untyped request tree (scalar | object | list)
//! - [`Scalar`] / [`ScalarType`]: typed primitive and temporal values
//! - [`RecordId`]: a coerced record identifier
//!
//! Nothing here knows about registered record types; descriptors live in
//! `payloadgen-model`.

mod ids;
mod scalar;
mod value;

pub use ids::RecordId;
pub use scalar::{Scalar, ScalarType};
pub use value::{Payload, Value};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in value operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}
