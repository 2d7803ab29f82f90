//! Error types for descriptor validation.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Problems with a type descriptor, detected when it is validated at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Descriptor has an empty name.
    #[error("type descriptor name cannot be empty")]
    EmptyName,

    /// No field is marked as the identifier.
    #[error("type {0} declares no identifier field")]
    MissingIdentifier(String),

    /// More than one field is marked as the identifier.
    #[error("type {type_name} declares multiple identifier fields: {fields:?}")]
    MultipleIdentifiers {
        type_name: String,
        fields: Vec<String>,
    },

    /// Two fields share a name.
    #[error("type {type_name} declares field {field} twice")]
    DuplicateField { type_name: String, field: String },

    /// The identifier field is not a simple scalar field.
    #[error("identifier field {field} of type {type_name} must be a simple field")]
    IdentifierNotSimple { type_name: String, field: String },
}
