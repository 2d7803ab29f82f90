use payloadgen_types::{Payload, Scalar, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// A typed record built from a payload.
///
/// Only non-null fields are held. A field that was never set reads back as
/// [`FieldValue::Null`], which is what lets a partial update leave the
/// stored record's other fields alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    entity_type: String,
    fields: BTreeMap<String, FieldValue>,
}

/// The value held by one field of an [`Instance`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Scalar(Scalar),
    /// An embedded object or a resolved reference.
    Object(Instance),
    List(Vec<Instance>),
}

static NULL: FieldValue = FieldValue::Null;

impl Instance {
    /// Creates an instance with every field null.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Name of the descriptor this instance was built against.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Reads a field. Unset fields read as `FieldValue::Null`.
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn get_scalar(&self, field: &str) -> Option<&Scalar> {
        match self.get(field) {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.get_scalar(field) {
            Some(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_object(&self, field: &str) -> Option<&Instance> {
        match self.get(field) {
            FieldValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn get_list(&self, field: &str) -> Option<&[Instance]> {
        match self.get(field) {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self, field: &str) -> bool {
        !self.fields.contains_key(field)
    }

    /// Assigns a field. Assigning `Null` clears it.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        let field = field.into();
        if matches!(value, FieldValue::Null) {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, value);
        }
    }

    /// Iterates the non-null fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copies every non-null field of `incoming` onto `self`.
    /// Fields that are null on `incoming` keep their current value.
    pub fn merge_non_null(&mut self, incoming: Self) {
        self.fields.extend(incoming.fields);
    }

    /// Converts the instance back into an untyped object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_payload())
    }

    pub fn to_payload(&self) -> Payload {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect()
    }
}

impl FieldValue {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Scalar(s) => s.clone().into(),
            Self::Object(o) => o.to_value(),
            Self::List(items) => Value::List(items.iter().map(Instance::to_value).collect()),
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Instance> for FieldValue {
    fn from(instance: Instance) -> Self {
        Self::Object(instance)
    }
}

/// Serializes as a flat JSON object of the non-null fields.
impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Scalar(s) => s.serialize(serializer),
            Self::Object(o) => o.serialize(serializer),
            Self::List(items) => items.serialize(serializer),
        }
    }
}
