//! Record type model for payloadgen.
//!
//! Defines the static schema the mapping engine works against:
//! - [`TypeDescriptor`]: a logical record type and its ordered fields
//! - [`FieldDescriptor`] / [`FieldKind`]: how each field's payload value is
//!   materialized (simple scalar, embedded object, foreign reference, lists)
//! - [`Instance`] / [`FieldValue`]: the typed object graph built from a payload
//!
//! Descriptors are declared once at startup and never change afterwards.
//! Instances live for a single request before being handed to storage.

mod error;
mod instance;
mod schema;

pub use error::{ModelError, ModelResult};
pub use instance::{FieldValue, Instance};
pub use schema::{FieldDescriptor, FieldKind, TypeDescriptor};
