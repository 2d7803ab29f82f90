//! Shared fixtures for engine tests.

#![allow(dead_code)]

use payloadgen_engine::{CrudService, EngineConfig, EntityRegistry};
use payloadgen_model::{FieldDescriptor, TypeDescriptor};
use payloadgen_types::{Payload, ScalarType, Value};
use std::sync::Arc;

/// Converts a `json!` literal into a payload. Panics on non-objects.
pub fn payload(json: serde_json::Value) -> Payload {
    match Value::from(json) {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn product_type() -> TypeDescriptor {
    TypeDescriptor::new(
        "Product",
        vec![
            FieldDescriptor::id("id", ScalarType::Long),
            FieldDescriptor::string("name"),
            FieldDescriptor::double("price"),
        ],
    )
}

pub fn user_type() -> TypeDescriptor {
    TypeDescriptor::new(
        "User",
        vec![
            FieldDescriptor::id("id", ScalarType::Integer),
            FieldDescriptor::string("email"),
            FieldDescriptor::string("name"),
        ],
    )
}

pub fn address_type() -> TypeDescriptor {
    TypeDescriptor::new(
        "Address",
        vec![
            FieldDescriptor::string("street"),
            FieldDescriptor::integer("zip"),
        ],
    )
}

pub fn order_type() -> TypeDescriptor {
    TypeDescriptor::new(
        "Order",
        vec![
            FieldDescriptor::id("orderId", ScalarType::String),
            FieldDescriptor::reference("customer", "User"),
            FieldDescriptor::nested("shipTo", "Address"),
            FieldDescriptor::nested_list("stops", "Address"),
            FieldDescriptor::reference_list("products", "Product"),
            FieldDescriptor::boolean("paid"),
            FieldDescriptor::date("placedOn"),
        ],
    )
}

/// Product, User and Order, registered in that order, plus embedded Address.
pub fn shop_registry() -> EntityRegistry {
    EntityRegistry::builder()
        .register_in_memory("product", product_type())
        .and_then(|b| b.register_in_memory("user", user_type()))
        .and_then(|b| b.register_in_memory("order", order_type()))
        .map(|b| b.embed(address_type()))
        .and_then(|b| b.build())
        .unwrap()
}

pub fn shop_service() -> CrudService {
    shop_service_with(EngineConfig::default())
}

pub fn shop_service_with(config: EngineConfig) -> CrudService {
    CrudService::new(Arc::new(shop_registry()), config)
}
