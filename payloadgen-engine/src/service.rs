//! CRUD orchestrator.
//!
//! `CrudService` is the one entry point the boundary layer talks to. Every
//! operation takes the request payload, resolves the target entity, and
//! drives that entity's store. The service holds no mutable state of its
//! own; concurrent requests only contend inside the stores.

use payloadgen_model::Instance;
use payloadgen_storage::{PageRequest, SortDirection, StorageError};
use payloadgen_types::{Payload, RecordId, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::coerce::coerce_identifier;
use crate::{
    DeleteOutcome, EngineConfig, EngineError, EngineResult, EntityRegistry, EntityResolver,
    GraphMapper, PageEnvelope, RegistryEntry, SaveOutcome,
};

pub const ID_KEY: &str = "id";
pub const IDS_KEY: &str = "ids";
pub const PAGE_KEY: &str = "page";
pub const SIZE_KEY: &str = "size";
pub const SORT_BY_KEY: &str = "sortBy";
pub const SORT_ORDER_KEY: &str = "sortOrder";

pub struct CrudService {
    registry: Arc<EntityRegistry>,
    config: EngineConfig,
}

impl CrudService {
    pub fn new(registry: Arc<EntityRegistry>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn resolver(&self) -> EntityResolver<'_> {
        EntityResolver::new(&self.registry, &self.config)
    }

    fn mapper(&self) -> GraphMapper<'_> {
        GraphMapper::new(&self.registry, self.config.strict_keys)
    }

    /// Turns a decoded request body into a payload.
    ///
    /// Objects pass through. A top-level list is wrapped under the data key
    /// so that it saves as a batch.
    pub fn prepare_payload(&self, body: Value) -> EngineResult<Payload> {
        match body {
            Value::Object(payload) => Ok(payload),
            Value::List(items) => {
                let mut payload = Payload::new();
                payload.insert(self.config.data_key.clone(), Value::List(items));
                Ok(payload)
            }
            other => Err(EngineError::InvalidPayload(format!(
                "request body must be an object or a list, found {}",
                other.kind_name()
            ))),
        }
    }

    /// Creates or updates one record, or each record of a list.
    ///
    /// A record whose identifier names a stored record is merged into it:
    /// non-null incoming fields overwrite, null ones leave the stored value.
    /// Batches are saved in order and stop at the first failure; records
    /// saved before it stay saved.
    pub fn save_or_update(&self, payload: &Payload) -> EngineResult<SaveOutcome> {
        let resolved = self.resolver().resolve(payload)?;
        let entry = resolved.entry;
        match &resolved.data {
            Value::Object(item) => self.save_one(entry, item).map(SaveOutcome::Single),
            Value::List(items) => {
                let mut saved = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item = item.as_object().ok_or_else(|| {
                        EngineError::InvalidPayload(format!(
                            "batch element {index} is a {}, not an object",
                            item.kind_name()
                        ))
                    })?;
                    saved.push(self.save_one(entry, item)?);
                }
                info!("Saved batch of {} {} records", saved.len(), entry.name());
                Ok(SaveOutcome::Batch(saved))
            }
            other => Err(EngineError::InvalidPayload(format!(
                "data must be an object or a list, found {}",
                other.kind_name()
            ))),
        }
    }

    fn save_one(&self, entry: &RegistryEntry, item: &Payload) -> EngineResult<Instance> {
        let mapped = self.mapper().map_instance(item, entry.descriptor())?;
        let id_field = &entry.identifier().name;

        if let Some(scalar) = mapped.get_scalar(id_field) {
            let id = coerce_identifier(&Value::from(scalar.clone()), entry.id_type())?;
            if let Some(mut existing) = entry.store().get(&id)? {
                existing.merge_non_null(mapped);
                let updated = entry.store().save(existing)?;
                info!("Updated {} record {}", entry.name(), id);
                return Ok(updated);
            }
        }

        let created = entry.store().save(mapped)?;
        info!(
            "Created {} record {}",
            entry.name(),
            created.get(id_field).to_value()
        );
        Ok(created)
    }

    /// Loads one record by the payload's `id`.
    pub fn find_by_id(&self, payload: &Payload) -> EngineResult<Instance> {
        let raw_id = non_null(payload, ID_KEY).ok_or(EngineError::MissingIdentifier)?;
        let entry = self.resolver().resolve(payload)?.entry;
        let id = coerce_identifier(raw_id, entry.id_type())?;
        debug!("Finding {} record {}", entry.name(), id);
        entry
            .store()
            .get(&id)?
            .ok_or_else(|| EngineError::RecordNotFound(raw_id.to_string()))
    }

    /// Loads one page of records, optionally sorted.
    pub fn find_all(&self, payload: &Payload) -> EngineResult<PageEnvelope> {
        let entry = self.resolver().resolve(payload)?.entry;

        let page = int_param(payload, PAGE_KEY, 0);
        if page < 0 {
            return Err(EngineError::InvalidPage(page));
        }
        let size = int_param(payload, SIZE_KEY, i64::from(self.config.default_page_size));
        if size <= 0 {
            return Err(EngineError::InvalidPageSize(size));
        }
        // Both are non-negative here; values past u32 clamp.
        let index = u32::try_from(page).unwrap_or(u32::MAX);
        let size = u32::try_from(size).unwrap_or(u32::MAX);

        let mut request = PageRequest::new(index, size);
        if let Some(field) = payload
            .get(SORT_BY_KEY)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            if entry.descriptor().field(field).is_none() {
                return Err(EngineError::InvalidSortField {
                    type_name: entry.descriptor().name.clone(),
                    field: field.to_string(),
                });
            }
            let direction = SortDirection::parse(payload.get(SORT_ORDER_KEY).and_then(Value::as_str));
            request = request.sorted(field, direction);
        }

        debug!("Finding {} page {} (size {})", entry.name(), index, size);
        let slice = entry.store().find_page(&request)?;
        Ok(PageEnvelope::new(&request, slice))
    }

    /// Deletes the record named by `id`, or every record named by `ids`.
    ///
    /// Batch deletes run in list order and stop at the first failure.
    pub fn delete(&self, payload: &Payload) -> EngineResult<DeleteOutcome> {
        match payload.get(IDS_KEY) {
            Some(ids) => {
                let ids = match ids {
                    Value::Null => &[][..],
                    Value::List(items) => items.as_slice(),
                    other => {
                        return Err(EngineError::InvalidPayload(format!(
                            "'{IDS_KEY}' must be a list, found {}",
                            other.kind_name()
                        )));
                    }
                };
                if ids.is_empty() {
                    return Err(EngineError::EmptyIdList);
                }
                let entry = self.resolver().resolve(payload)?.entry;
                let mut deleted = Vec::with_capacity(ids.len());
                for raw_id in ids {
                    deleted.push(delete_one(entry, raw_id)?);
                }
                info!("Deleted {} {} records", deleted.len(), entry.name());
                Ok(DeleteOutcome::Batch {
                    deleted: true,
                    count: deleted.len(),
                    ids: deleted,
                })
            }
            None => {
                let raw_id = non_null(payload, ID_KEY).ok_or(EngineError::MissingIdOrIds)?;
                let entry = self.resolver().resolve(payload)?.entry;
                let id = delete_one(entry, raw_id)?;
                info!("Deleted {} record {}", entry.name(), id);
                Ok(DeleteOutcome::Single { deleted: true, id })
            }
        }
    }
}

fn delete_one(entry: &RegistryEntry, raw_id: &Value) -> EngineResult<RecordId> {
    let id = coerce_identifier(raw_id, entry.id_type())?;
    entry.store().delete(&id).map_err(|e| match e {
        StorageError::NotFound(_) => EngineError::RecordNotFound(raw_id.to_string()),
        other => other.into(),
    })?;
    Ok(id)
}

fn non_null<'p>(payload: &'p Payload, key: &str) -> Option<&'p Value> {
    payload.get(key).filter(|v| !v.is_null())
}

/// Reads an integer parameter leniently: numbers are truncated, numeric
/// strings parsed, and anything else falls back to `default`.
fn int_param(payload: &Payload, key: &str, default: i64) -> i64 {
    match payload.get(key) {
        None | Some(Value::Null) => default,
        Some(Value::Int(n)) => *n,
        Some(Value::Float(x)) => *x as i64,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        Some(_) => default,
    }
}
