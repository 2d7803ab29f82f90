//! Error types for the engine.

use payloadgen_model::ModelError;
use payloadgen_storage::StorageError;
use payloadgen_types::ScalarType;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Every failure a CRUD request can end in.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An explicit entity name is not registered.
    #[error("unknown or unregistered entity type: {0}")]
    UnknownEntity(String),

    /// No registered type matched the payload fields closely enough.
    #[error("unable to determine entity type from payload fields: {0:?}")]
    AmbiguousOrUnknownEntity(Vec<String>),

    /// A value could not be converted to a field's declared type.
    #[error("cannot convert value '{value}' to type {target}")]
    TypeCoercion { value: String, target: ScalarType },

    /// The identifier field is declared with a type identifiers cannot have.
    #[error("unsupported identifier type: {0}")]
    UnsupportedIdentifierType(ScalarType),

    /// A foreign identifier names no stored record.
    #[error("related entity not found for {field} with id {id}")]
    ReferencedEntityNotFound { field: String, id: String },

    /// Mapping a field failed. `field` is a dotted path for nested fields.
    #[error("error mapping field {field}: {source}")]
    EntityMapping {
        field: String,
        source: Box<EngineError>,
    },

    /// Find was called without an `id`.
    #[error("missing 'id' for find operation")]
    MissingIdentifier,

    /// No record exists for the identifier.
    #[error("record not found for id: {0}")]
    RecordNotFound(String),

    #[error("page number cannot be negative: {0}")]
    InvalidPage(i64),

    #[error("page size must be greater than 0: {0}")]
    InvalidPageSize(i64),

    #[error("the 'ids' list cannot be empty for delete operation")]
    EmptyIdList,

    #[error("missing 'id' or 'ids' for delete operation")]
    MissingIdOrIds,

    /// Strict mode: the payload names a field the type does not declare.
    #[error("unknown field {field} for type {type_name}")]
    UnknownField { type_name: String, field: String },

    /// `sortBy` names a field the type does not declare.
    #[error("cannot sort {type_name} by unknown field {field}")]
    InvalidSortField { type_name: String, field: String },

    /// The payload has the wrong shape for the operation.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The registry could not be assembled.
    #[error("registry error: {0}")]
    Registry(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl EngineError {
    /// Stable snake_case code for the failure envelope.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "unknown_entity",
            Self::AmbiguousOrUnknownEntity(_) => "ambiguous_or_unknown_entity",
            Self::TypeCoercion { .. } => "type_coercion_error",
            Self::UnsupportedIdentifierType(_) => "unsupported_identifier_type",
            Self::ReferencedEntityNotFound { .. } => "referenced_entity_not_found",
            Self::EntityMapping { .. } => "entity_mapping_error",
            Self::MissingIdentifier => "missing_identifier",
            Self::RecordNotFound(_) => "record_not_found",
            Self::InvalidPage(_) => "invalid_page",
            Self::InvalidPageSize(_) => "invalid_page_size",
            Self::EmptyIdList => "empty_id_list",
            Self::MissingIdOrIds => "missing_id_or_ids",
            Self::UnknownField { .. } => "unknown_field",
            Self::InvalidSortField { .. } => "invalid_sort_field",
            Self::InvalidPayload(_) => "invalid_payload",
            Self::Registry(_) => "registry_error",
            Self::Config(_) => "config_error",
            Self::Model(_) => "model_error",
            Self::Storage(_) => "storage_error",
        }
    }

    /// Attaches the failing field to an error raised while mapping it.
    ///
    /// Coercion, shape and storage failures are wrapped in `EntityMapping`;
    /// an already-wrapped error gets `field` prefixed to its path. Lookup
    /// misses and strict-mode rejections pass through unchanged.
    pub(crate) fn in_field(self, field: &str) -> Self {
        match self {
            Self::EntityMapping {
                field: inner,
                source,
            } => Self::EntityMapping {
                field: format!("{field}.{inner}"),
                source,
            },
            passthrough @ (Self::ReferencedEntityNotFound { .. }
            | Self::UnknownField { .. }
            | Self::UnknownEntity(_)) => passthrough,
            other => Self::EntityMapping {
                field: field.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error under any `EntityMapping` wrappers.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::EntityMapping { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
