//! The storage collaborator interface.

use payloadgen_model::Instance;
use payloadgen_types::RecordId;

use crate::StorageResult;

/// Persistence for one record type.
///
/// Implementations may block; the engine calls them synchronously from the
/// request's own execution context.
pub trait RecordStore: Send + Sync {
    /// Fetches a record by identifier.
    fn get(&self, id: &RecordId) -> StorageResult<Option<Instance>>;

    /// Inserts or replaces a record and returns what was stored.
    /// An instance saved without an identifier is assigned one.
    fn save(&self, instance: Instance) -> StorageResult<Instance>;

    /// Removes a record. Fails with `StorageError::NotFound` if absent.
    fn delete(&self, id: &RecordId) -> StorageResult<()>;

    /// Fetches one page of records, optionally sorted by a field.
    fn find_page(&self, request: &PageRequest) -> StorageResult<PageSlice>;
}

/// Zero-based page selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub index: u32,
    pub size: u32,
    pub sort: Option<SortSpec>,
}

impl PageRequest {
    pub const fn new(index: u32, size: u32) -> Self {
        Self {
            index,
            size,
            sort: None,
        }
    }

    #[must_use]
    pub fn sorted(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            field: field.into(),
            direction,
        });
        self
    }

    /// Number of records that precede this page.
    pub const fn offset(&self) -> u64 {
        self.index as u64 * self.size as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// `"desc"` (any case) selects descending; anything else ascending.
    pub fn parse(order: Option<&str>) -> Self {
        match order {
            Some(o) if o.eq_ignore_ascii_case("desc") => Self::Descending,
            _ => Self::Ascending,
        }
    }
}

/// One page of records plus the total record count across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice {
    pub items: Vec<Instance>,
    pub total_count: u64,
}
