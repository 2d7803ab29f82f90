//! The demo registry the binary serves.

use payloadgen_engine::{EngineResult, EntityRegistry};
use payloadgen_model::{FieldDescriptor, TypeDescriptor};
use payloadgen_types::ScalarType;

pub fn user_type() -> TypeDescriptor {
    TypeDescriptor::new(
        "User",
        vec![
            FieldDescriptor::id("id", ScalarType::Long),
            FieldDescriptor::string("name"),
            FieldDescriptor::string("email"),
        ],
    )
}

pub fn product_type() -> TypeDescriptor {
    TypeDescriptor::new(
        "Product",
        vec![
            FieldDescriptor::id("id", ScalarType::Long),
            FieldDescriptor::string("productName"),
            FieldDescriptor::string("category"),
            FieldDescriptor::double("price"),
            FieldDescriptor::integer("stock"),
        ],
    )
}

/// `user` and `product`, each backed by an in-memory store.
pub fn demo_registry() -> EngineResult<EntityRegistry> {
    EntityRegistry::builder()
        .register_in_memory("user", user_type())?
        .register_in_memory("product", product_type())?
        .build()
}
