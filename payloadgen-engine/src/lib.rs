//! Dynamic entity resolution and object-graph mapping for payloadgen.
//!
//! One CRUD surface serves every registered record type. A request arrives
//! as an untyped [`Payload`](payloadgen_types::Payload); the engine decides
//! which type it belongs to, coerces and materializes it into a typed
//! [`Instance`](payloadgen_model::Instance), and drives the type's
//! [`RecordStore`](payloadgen_storage::RecordStore).
//!
//! # Components
//!
//! - **Registry**: logical name → descriptor + store, built once at startup
//! - **Coercion**: scalar and identifier conversion table
//! - **Resolver**: explicit entity name, or field-overlap scoring
//! - **Mapper**: recursive payload → instance construction, including
//!   lookups of referenced records
//! - **Service**: save-or-update with merge, find, paged find, delete
//!
//! # Example
//!
//! ```
//! use payloadgen_engine::{CrudService, EngineConfig, EntityRegistry};
//! use payloadgen_model::{FieldDescriptor, TypeDescriptor};
//! use payloadgen_types::{ScalarType, Value};
//! use std::sync::Arc;
//!
//! let product = TypeDescriptor::new(
//!     "Product",
//!     vec![
//!         FieldDescriptor::id("id", ScalarType::Long),
//!         FieldDescriptor::string("name"),
//!         FieldDescriptor::double("price"),
//!     ],
//! );
//! let registry = EntityRegistry::builder()
//!     .register_in_memory("product", product)?
//!     .build()?;
//! let service = CrudService::new(Arc::new(registry), EngineConfig::default());
//!
//! let payload = Value::payload_from_json_str(r#"{"name": "Widget", "price": 9.99}"#).unwrap();
//! let saved = service.save_or_update(&payload)?;
//! assert_eq!(saved.instances()[0].get_str("name"), Some("Widget"));
//! # Ok::<(), payloadgen_engine::EngineError>(())
//! ```

mod coerce;
mod config;
mod envelope;
mod error;
mod mapper;
mod registry;
mod resolver;
mod service;

pub use coerce::{coerce_identifier, coerce_scalar};
pub use config::EngineConfig;
pub use envelope::{DeleteOutcome, ErrorEnvelope, PageEnvelope, SaveOutcome};
pub use error::{EngineError, EngineResult};
pub use mapper::GraphMapper;
pub use registry::{EntityRegistry, RegistryBuilder, RegistryEntry};
pub use resolver::{EntityResolver, MatchScore, Resolved};
pub use service::{
    CrudService, IDS_KEY, ID_KEY, PAGE_KEY, SIZE_KEY, SORT_BY_KEY, SORT_ORDER_KEY,
};
