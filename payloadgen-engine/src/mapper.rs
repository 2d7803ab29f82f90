//! Graph mapper: untyped payload → typed [`Instance`].
//!
//! Walks a descriptor's fields and fills each one present in the payload.
//! Payload keys match field names exactly. What a relation field receives
//! decides how it is handled: an object is mapped recursively against the
//! target type, a bare scalar is an identifier of a stored record that gets
//! loaded from the target type's store.

use payloadgen_model::{FieldDescriptor, FieldKind, FieldValue, Instance, TypeDescriptor};
use payloadgen_types::{Payload, Value};
use tracing::debug;

use crate::coerce::{coerce_identifier, coerce_scalar};
use crate::{EngineError, EngineResult, EntityRegistry};

pub struct GraphMapper<'r> {
    registry: &'r EntityRegistry,
    strict: bool,
}

impl<'r> GraphMapper<'r> {
    /// With `strict`, payload keys the descriptor does not declare are
    /// rejected instead of ignored.
    pub const fn new(registry: &'r EntityRegistry, strict: bool) -> Self {
        Self { registry, strict }
    }

    /// Builds an instance of `descriptor` from `payload`.
    ///
    /// Absent and null fields stay null. Failures inside a field come back
    /// as `EntityMapping` carrying the field path.
    pub fn map_instance(&self, payload: &Payload, descriptor: &TypeDescriptor) -> EngineResult<Instance> {
        if self.strict {
            if let Some(key) = payload.keys().find(|k| descriptor.field(k).is_none()) {
                return Err(EngineError::UnknownField {
                    type_name: descriptor.name.clone(),
                    field: key.clone(),
                });
            }
        }

        let mut instance = Instance::new(&descriptor.name);
        for field in &descriptor.fields {
            let Some(value) = payload.get(&field.name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let mapped = self
                .map_field(field, value)
                .map_err(|e| e.in_field(&field.name))?;
            instance.set(field.name.clone(), mapped);
        }
        Ok(instance)
    }

    fn map_field(&self, field: &FieldDescriptor, value: &Value) -> EngineResult<FieldValue> {
        match &field.kind {
            FieldKind::Simple(scalar_type) => {
                Ok(coerce_scalar(value, *scalar_type)?.map_or(FieldValue::Null, FieldValue::Scalar))
            }
            FieldKind::Nested(target) | FieldKind::Reference(target) => {
                self.map_related(&field.name, target, value).map(FieldValue::Object)
            }
            FieldKind::NestedList(target) | FieldKind::ReferenceList(target) => {
                let items = value.as_list().ok_or_else(|| {
                    EngineError::InvalidPayload(format!("expected a list, found {}", value.kind_name()))
                })?;
                items
                    .iter()
                    .map(|item| self.map_related(&field.name, target, item))
                    .collect::<EngineResult<Vec<_>>>()
                    .map(FieldValue::List)
            }
        }
    }

    fn map_related(&self, field: &str, target: &str, value: &Value) -> EngineResult<Instance> {
        match value {
            Value::Object(map) => {
                let descriptor = self
                    .registry
                    .descriptor(target)
                    .or_else(|| self.registry.lookup_by_type(target).map(|e| e.descriptor()))
                    .ok_or_else(|| EngineError::Registry(format!("no descriptor for type {target}")))?;
                self.map_instance(map, descriptor)
            }
            Value::Int(_) | Value::Float(_) | Value::String(_) => {
                self.resolve_reference(field, target, value)
            }
            other => Err(EngineError::InvalidPayload(format!(
                "expected an object or an identifier, found {}",
                other.kind_name()
            ))),
        }
    }

    fn resolve_reference(&self, field: &str, target: &str, raw_id: &Value) -> EngineResult<Instance> {
        let entry = self
            .registry
            .lookup_by_type(target)
            .ok_or_else(|| {
                EngineError::InvalidPayload(format!("{target} is embedded and has no identifier"))
            })?;
        let id = coerce_identifier(raw_id, entry.id_type())?;
        debug!("Resolving {} reference {} for field {}", entry.name(), id, field);
        entry
            .store()
            .get(&id)?
            .ok_or_else(|| EngineError::ReferencedEntityNotFound {
                field: field.to_string(),
                id: raw_id.to_string(),
            })
    }
}
