//! In-memory record store.

use payloadgen_model::{FieldValue, Instance, TypeDescriptor};
use payloadgen_types::{RecordId, Scalar, ScalarType};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

use crate::{PageRequest, PageSlice, RecordStore, SortDirection, StorageError, StorageResult};

/// Keeps records in identifier order behind a `RwLock`.
///
/// Instances saved without an identifier get the next sequence number for
/// `Integer`/`Long` identifiers, or a UUID v7 string for `String` ones.
pub struct MemoryStore {
    type_name: String,
    id_field: String,
    id_type: ScalarType,
    inner: RwLock<Inner>,
}

struct Inner {
    records: BTreeMap<RecordId, Instance>,
    /// Next generated numeric id. Always above every numeric id stored.
    next_seq: i64,
}

impl MemoryStore {
    /// Creates an empty store for records of `descriptor`.
    pub fn new(descriptor: &TypeDescriptor) -> StorageResult<Self> {
        let id = descriptor
            .identifier()
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;
        let id_type = id.kind.scalar_type().ok_or_else(|| {
            StorageError::InvalidData(format!("identifier {} is not a simple field", id.name))
        })?;
        Ok(Self {
            type_name: descriptor.name.clone(),
            id_field: id.name.clone(),
            id_type,
            inner: RwLock::new(Inner {
                records: BTreeMap::new(),
                next_seq: 1,
            }),
        })
    }

    /// Number of stored records.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.read()?.records.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| StorageError::LockPoisoned)
    }

    fn generate_id(&self, inner: &mut Inner) -> StorageResult<RecordId> {
        let id = match self.id_type {
            ScalarType::Integer => {
                let n = i32::try_from(inner.next_seq).map_err(|_| {
                    StorageError::InvalidData(format!("{} id sequence exhausted", self.type_name))
                })?;
                RecordId::Integer(n)
            }
            ScalarType::Long => RecordId::Long(inner.next_seq),
            ScalarType::String => RecordId::String(Uuid::now_v7().to_string()),
            other => {
                return Err(StorageError::InvalidData(format!(
                    "cannot generate {other} identifiers for {}",
                    self.type_name
                )));
            }
        };
        Ok(id)
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, id: &RecordId) -> StorageResult<Option<Instance>> {
        Ok(self.read()?.records.get(id).cloned())
    }

    fn save(&self, mut instance: Instance) -> StorageResult<Instance> {
        let mut inner = self.write()?;
        let id = match instance.get_scalar(&self.id_field) {
            Some(scalar) => RecordId::from_scalar(scalar).ok_or_else(|| {
                StorageError::InvalidData(format!(
                    "{} is not a valid {} identifier",
                    scalar, self.type_name
                ))
            })?,
            None => {
                let id = self.generate_id(&mut inner)?;
                instance.set(self.id_field.clone(), Scalar::from(id.clone()).into());
                id
            }
        };

        match &id {
            RecordId::Integer(n) => inner.next_seq = inner.next_seq.max(i64::from(*n) + 1),
            RecordId::Long(n) => inner.next_seq = inner.next_seq.max(n.saturating_add(1)),
            RecordId::String(_) => {}
        }

        debug!("Saved {} record {}", self.type_name, id);
        inner.records.insert(id, instance.clone());
        Ok(instance)
    }

    fn delete(&self, id: &RecordId) -> StorageResult<()> {
        let mut inner = self.write()?;
        match inner.records.remove(id) {
            Some(_) => {
                debug!("Deleted {} record {}", self.type_name, id);
                Ok(())
            }
            None => Err(StorageError::NotFound(id.to_string())),
        }
    }

    fn find_page(&self, request: &PageRequest) -> StorageResult<PageSlice> {
        let inner = self.read()?;
        let total_count = inner.records.len() as u64;

        let mut items: Vec<&Instance> = inner.records.values().collect();
        if let Some(sort) = &request.sort {
            items.sort_by(|a, b| {
                let ord = compare_field(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = items
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();

        Ok(PageSlice { items, total_count })
    }
}

/// Nulls sort first; values that do not compare are treated as equal.
fn compare_field(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Scalar(x), FieldValue::Scalar(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
        (FieldValue::Null, _) => Ordering::Less,
        (_, FieldValue::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
