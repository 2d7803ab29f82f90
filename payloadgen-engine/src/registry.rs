//! Entity registry: logical name → type descriptor + record store.
//!
//! Built once at startup through [`RegistryBuilder`] and read-only after.
//! Names are case-insensitive and entries keep their registration order,
//! which is also the order the resolver breaks score ties in.

use payloadgen_model::{FieldDescriptor, FieldKind, TypeDescriptor};
use payloadgen_storage::{MemoryStore, RecordStore};
use payloadgen_types::ScalarType;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::{EngineError, EngineResult};

/// One registered record type.
pub struct RegistryEntry {
    name: String,
    descriptor: Arc<TypeDescriptor>,
    store: Arc<dyn RecordStore>,
    id_index: usize,
    id_type: ScalarType,
}

impl RegistryEntry {
    /// Lowercase logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// The identifier field.
    pub fn identifier(&self) -> &FieldDescriptor {
        &self.descriptor.fields[self.id_index]
    }

    pub const fn id_type(&self) -> ScalarType {
        self.id_type
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("type", &self.descriptor.name)
            .field("id_type", &self.id_type)
            .finish_non_exhaustive()
    }
}

/// Collects registrations and validates them into an [`EntityRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<(String, TypeDescriptor, Arc<dyn RecordStore>)>,
    embedded: Vec<TypeDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record type under `name`.
    ///
    /// Registering the same name twice with an identical descriptor is a
    /// no-op and the first store is kept. A different descriptor under an
    /// existing name is an error.
    pub fn register(
        mut self,
        name: &str,
        descriptor: TypeDescriptor,
        store: Arc<dyn RecordStore>,
    ) -> EngineResult<Self> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return Err(EngineError::Registry("entity name cannot be empty".to_string()));
        }
        if let Some((_, existing, _)) = self.entries.iter().find(|(n, _, _)| *n == key) {
            if *existing == descriptor {
                return Ok(self);
            }
            return Err(EngineError::Registry(format!(
                "entity '{key}' is already registered with a different type ({})",
                existing.name
            )));
        }
        self.entries.push((key, descriptor, store));
        Ok(self)
    }

    /// Registers a record type backed by a fresh [`MemoryStore`].
    pub fn register_in_memory(self, name: &str, descriptor: TypeDescriptor) -> EngineResult<Self> {
        let store = MemoryStore::new(&descriptor)?;
        self.register(name, descriptor, Arc::new(store))
    }

    /// Declares a type that only appears nested inside other records.
    /// Embedded types need no identifier and have no store.
    #[must_use]
    pub fn embed(mut self, descriptor: TypeDescriptor) -> Self {
        if !self.embedded.contains(&descriptor) {
            self.embedded.push(descriptor);
        }
        self
    }

    /// Validates every descriptor and every cross-type reference.
    pub fn build(self) -> EngineResult<EntityRegistry> {
        let mut entries = Vec::with_capacity(self.entries.len());
        let mut by_name = HashMap::new();

        for (name, descriptor, store) in self.entries {
            descriptor.validate()?;
            let id_index = descriptor
                .fields
                .iter()
                .position(|f| f.identifier)
                .ok_or_else(|| EngineError::Registry(format!("{} has no identifier", descriptor.name)))?;
            let id_type = descriptor.fields[id_index]
                .kind
                .scalar_type()
                .ok_or_else(|| EngineError::Registry(format!("{} identifier is not simple", descriptor.name)))?;
            if !id_type.is_identifier_type() {
                return Err(EngineError::UnsupportedIdentifierType(id_type));
            }
            by_name.insert(name.clone(), entries.len());
            entries.push(RegistryEntry {
                name,
                descriptor: Arc::new(descriptor),
                store,
                id_index,
                id_type,
            });
        }

        for descriptor in &self.embedded {
            descriptor.validate_embedded()?;
        }

        let registry = EntityRegistry {
            entries,
            by_name,
            embedded: self.embedded,
        };
        registry.check_targets()?;

        info!(
            "Entity registry built: {} entities, {} embedded types",
            registry.entries.len(),
            registry.embedded.len()
        );
        Ok(registry)
    }
}

/// Read-only lookup of registered record types.
#[derive(Debug)]
pub struct EntityRegistry {
    entries: Vec<RegistryEntry>,
    by_name: HashMap<String, usize>,
    embedded: Vec<TypeDescriptor>,
}

impl EntityRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Looks up an entity by logical name, ignoring case.
    pub fn lookup_by_name(&self, name: &str) -> EngineResult<&RegistryEntry> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.entries[i])
            .ok_or_else(|| EngineError::UnknownEntity(name.to_string()))
    }

    /// Finds the entry that persists records of `type_name`.
    ///
    /// An exact descriptor match wins; otherwise the first entry whose
    /// logical name contains the lowercased type name.
    pub fn lookup_by_type(&self, type_name: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|e| e.descriptor.name == type_name)
            .or_else(|| {
                let short = type_name.to_lowercase();
                self.entries.iter().find(|e| e.name.contains(&short))
            })
    }

    /// Descriptor for a registered or embedded type.
    pub fn descriptor(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.entries
            .iter()
            .map(|e| e.descriptor.as_ref())
            .chain(self.embedded.iter())
            .find(|d| d.name == type_name)
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_targets(&self) -> EngineResult<()> {
        let all = self
            .entries
            .iter()
            .map(|e| e.descriptor.as_ref())
            .chain(self.embedded.iter());
        for descriptor in all {
            for field in &descriptor.fields {
                let resolved = match &field.kind {
                    FieldKind::Simple(_) => true,
                    FieldKind::Nested(t) | FieldKind::NestedList(t) => {
                        self.descriptor(t).is_some() || self.lookup_by_type(t).is_some()
                    }
                    FieldKind::Reference(t) | FieldKind::ReferenceList(t) => {
                        self.lookup_by_type(t).is_some()
                    }
                };
                if !resolved {
                    return Err(EngineError::Registry(format!(
                        "{}.{} refers to unknown type {}",
                        descriptor.name,
                        field.name,
                        field.kind.target_type().unwrap_or_default()
                    )));
                }
            }
        }
        Ok(())
    }
}
