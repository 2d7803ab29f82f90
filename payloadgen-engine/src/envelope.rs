//! Response shapes returned by the CRUD operations.

use payloadgen_model::Instance;
use payloadgen_storage::{PageRequest, PageSlice};
use payloadgen_types::RecordId;
use serde::Serialize;

use crate::EngineError;

/// Result of save-or-update: one record, or one per list element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SaveOutcome {
    Single(Instance),
    Batch(Vec<Instance>),
}

impl SaveOutcome {
    /// The saved records, in input order.
    pub fn instances(&self) -> &[Instance] {
        match self {
            Self::Single(instance) => std::slice::from_ref(instance),
            Self::Batch(items) => items,
        }
    }
}

/// Result of delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeleteOutcome {
    Batch {
        deleted: bool,
        count: usize,
        ids: Vec<RecordId>,
    },
    Single {
        deleted: bool,
        id: RecordId,
    },
}

/// One page of a paged find, plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    pub status: &'static str,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub is_first: bool,
    pub is_last: bool,
    pub has_next: bool,
    pub has_previous: bool,
    pub data: Vec<Instance>,
}

impl PageEnvelope {
    pub fn new(request: &PageRequest, slice: PageSlice) -> Self {
        let size = u64::from(request.size);
        let total_pages = if size == 0 {
            1
        } else {
            slice.total_count.div_ceil(size)
        };
        let page = u64::from(request.index);
        let has_next = page + 1 < total_pages;
        Self {
            status: "success",
            page: request.index,
            size: request.size,
            total_elements: slice.total_count,
            total_pages,
            is_first: page == 0,
            is_last: !has_next,
            has_next,
            has_previous: page > 0,
            data: slice.items,
        }
    }
}

/// Failure body: `{"status": "failed", "kind": ..., "error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub kind: &'static str,
    pub error: String,
}

impl From<&EngineError> for ErrorEnvelope {
    fn from(err: &EngineError) -> Self {
        Self {
            status: "failed",
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}
