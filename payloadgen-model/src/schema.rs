use payloadgen_types::ScalarType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{ModelError, ModelResult};

/// Describes a record type: its logical name and the fields a payload may set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Looks up a field by its exact (case-sensitive) name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the single identifier field.
    pub fn identifier(&self) -> ModelResult<&FieldDescriptor> {
        let mut ids = self.fields.iter().filter(|f| f.identifier);
        match (ids.next(), ids.next()) {
            (Some(id), None) => Ok(id),
            (None, _) => Err(ModelError::MissingIdentifier(self.name.clone())),
            (Some(_), Some(_)) => Err(ModelError::MultipleIdentifiers {
                type_name: self.name.clone(),
                fields: self
                    .fields
                    .iter()
                    .filter(|f| f.identifier)
                    .map(|f| f.name.clone())
                    .collect(),
            }),
        }
    }

    /// Lowercased field names, used for case-insensitive payload matching.
    pub fn field_names_lowercase(&self) -> HashSet<String> {
        self.fields.iter().map(|f| f.name.to_lowercase()).collect()
    }

    /// Checks the structural rules every stored record type must satisfy:
    /// a non-empty name, unique field names, and exactly one simple
    /// identifier field.
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        self.validate_field_names()?;

        let id = self.identifier()?;
        if !matches!(id.kind, FieldKind::Simple(_)) {
            return Err(ModelError::IdentifierNotSimple {
                type_name: self.name.clone(),
                field: id.name.clone(),
            });
        }
        Ok(())
    }

    /// Relaxed check for embedded-only types, which are never stored on
    /// their own and so need no identifier.
    pub fn validate_embedded(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        self.validate_field_names()
    }

    fn validate_field_names(&self) -> ModelResult<()> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ModelError::DuplicateField {
                    type_name: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A single declared field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// Marks the identifier field. Exactly one per stored type.
    #[serde(default)]
    pub identifier: bool,
}

impl FieldDescriptor {
    fn with_kind(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            identifier: false,
        }
    }

    /// Shorthand for the identifier field.
    pub fn id(name: &str, id_type: ScalarType) -> Self {
        Self {
            identifier: true,
            ..Self::with_kind(name, FieldKind::Simple(id_type))
        }
    }

    /// Shorthand for a simple field of any scalar type.
    pub fn simple(name: &str, scalar_type: ScalarType) -> Self {
        Self::with_kind(name, FieldKind::Simple(scalar_type))
    }

    pub fn string(name: &str) -> Self {
        Self::simple(name, ScalarType::String)
    }

    pub fn integer(name: &str) -> Self {
        Self::simple(name, ScalarType::Integer)
    }

    pub fn long(name: &str) -> Self {
        Self::simple(name, ScalarType::Long)
    }

    pub fn double(name: &str) -> Self {
        Self::simple(name, ScalarType::Double)
    }

    pub fn boolean(name: &str) -> Self {
        Self::simple(name, ScalarType::Boolean)
    }

    pub fn date(name: &str) -> Self {
        Self::simple(name, ScalarType::Date)
    }

    pub fn datetime(name: &str) -> Self {
        Self::simple(name, ScalarType::DateTime)
    }

    /// Shorthand for an embedded object of another type.
    pub fn nested(name: &str, type_name: &str) -> Self {
        Self::with_kind(name, FieldKind::Nested(type_name.into()))
    }

    /// Shorthand for a foreign reference to a stored record of another type.
    pub fn reference(name: &str, type_name: &str) -> Self {
        Self::with_kind(name, FieldKind::Reference(type_name.into()))
    }

    /// Shorthand for a list of embedded objects.
    pub fn nested_list(name: &str, type_name: &str) -> Self {
        Self::with_kind(name, FieldKind::NestedList(type_name.into()))
    }

    /// Shorthand for a list of foreign references.
    pub fn reference_list(name: &str, type_name: &str) -> Self {
        Self::with_kind(name, FieldKind::ReferenceList(type_name.into()))
    }
}

/// How a field's payload value is materialized.
///
/// Non-simple kinds name their target by the target descriptor's `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Simple(ScalarType),
    Nested(String),
    Reference(String),
    NestedList(String),
    ReferenceList(String),
}

impl FieldKind {
    /// The scalar type of a simple field.
    pub const fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Self::Simple(t) => Some(*t),
            _ => None,
        }
    }

    /// The referenced type name of a non-simple field.
    pub fn target_type(&self) -> Option<&str> {
        match self {
            Self::Simple(_) => None,
            Self::Nested(t) | Self::Reference(t) | Self::NestedList(t) | Self::ReferenceList(t) => {
                Some(t)
            }
        }
    }
}
