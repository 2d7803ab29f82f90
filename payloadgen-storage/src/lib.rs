//! Storage collaborator for payloadgen.
//!
//! The mapping engine never persists anything itself. Every registered
//! record type is bound to a [`RecordStore`], which owns the record
//! lifecycle behind four calls: `get`, `save`, `delete` and `find_page`.
//!
//! # Backends
//!
//! - [`MemoryStore`] keeps records in a `BTreeMap` keyed by identifier and is
//!   the backend used by the demo server and the test suites.
//! - Real databases plug in by implementing [`RecordStore`].

mod error;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::{PageRequest, PageSlice, RecordStore, SortDirection, SortSpec};
