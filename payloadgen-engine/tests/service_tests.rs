mod common;

use common::{payload, shop_service, shop_service_with};
use payloadgen_engine::{
    CrudService, DeleteOutcome, EngineConfig, EngineError, ErrorEnvelope, SaveOutcome,
};
use payloadgen_types::{RecordId, Scalar, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn save(service: &CrudService, body: serde_json::Value) -> SaveOutcome {
    service.save_or_update(&payload(body)).unwrap()
}

fn seed_products(service: &CrudService, n: usize) {
    let items: Vec<_> = (0..n)
        .map(|i| json!({"name": format!("p{i:02}"), "price": i as f64}))
        .collect();
    save(service, json!({"entity": "product", "data": items}));
}

// ── Save / update ────────────────────────────────────────────────

#[test]
fn guessed_payload_without_id_creates_record() {
    let service = shop_service();
    let saved = save(&service, json!({"name": "Widget", "price": 9.99}));
    let SaveOutcome::Single(product) = saved else {
        panic!("expected a single record");
    };
    assert_eq!(product.entity_type(), "Product");
    assert_eq!(product.get_scalar("id"), Some(&Scalar::Long(1)));
    assert_eq!(product.get_str("name"), Some("Widget"));
}

#[test]
fn update_merges_only_non_null_fields() {
    let service = shop_service();
    save(&service, json!({"entity": "product", "data": {"name": "Widget", "price": 9.99}}));
    let updated = save(
        &service,
        json!({"entity": "product", "data": {"id": 1, "name": null, "price": 12.5}}),
    );

    let product = &updated.instances()[0];
    assert_eq!(product.get_str("name"), Some("Widget"));
    assert_eq!(product.get_scalar("price"), Some(&Scalar::Double(12.5)));

    let found = service
        .find_by_id(&payload(json!({"entity": "product", "id": 1})))
        .unwrap();
    assert_eq!(&found, product);
}

#[test]
fn resaving_identical_payload_is_idempotent() {
    let service = shop_service();
    let body = json!({"entity": "product", "data": {"id": 4, "name": "W", "price": 1.0}});
    let first = save(&service, body.clone());
    let second = save(&service, body);
    assert_eq!(first, second);

    let page = service
        .find_all(&payload(json!({"entity": "product"})))
        .unwrap();
    assert_eq!(page.total_elements, 1);
}

#[test]
fn explicit_id_for_absent_record_creates_it() {
    let service = shop_service();
    save(&service, json!({"entity": "user", "data": {"id": 7, "name": "A", "email": "a@x"}}));
    let found = service
        .find_by_id(&payload(json!({"entity": "user", "id": "7"})))
        .unwrap();
    assert_eq!(found.get_scalar("id"), Some(&Scalar::Integer(7)));
}

#[test]
fn batch_save_returns_records_in_order() {
    let service = shop_service();
    let saved = save(
        &service,
        json!({"entity": "product", "data": [{"name": "a"}, {"name": "b"}]}),
    );
    let names: Vec<_> = saved
        .instances()
        .iter()
        .map(|p| p.get_str("name").unwrap())
        .collect();
    assert!(matches!(saved, SaveOutcome::Batch(_)));
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn top_level_list_body_saves_as_guessed_batch() {
    let service = shop_service();
    let body = Value::from(json!([
        {"email": "a@x", "name": "A"},
        {"email": "b@x", "name": "B"}
    ]));
    let prepared = service.prepare_payload(body).unwrap();
    let saved = service.save_or_update(&prepared).unwrap();
    assert_eq!(saved.instances().len(), 2);
    assert_eq!(saved.instances()[1].entity_type(), "User");
}

#[test]
fn scalar_body_is_rejected() {
    let service = shop_service();
    let err = service.prepare_payload(Value::from("hello")).unwrap_err();
    assert!(matches!(err, EngineError::InvalidPayload(_)));
}

#[test]
fn batch_stops_at_first_failure_and_keeps_earlier_items() {
    let service = shop_service();
    let err = service
        .save_or_update(&payload(json!({
            "entity": "product",
            "data": [{"name": "ok"}, {"price": "cheap"}, {"name": "never"}]
        })))
        .unwrap_err();
    assert!(matches!(err, EngineError::EntityMapping { .. }));

    let page = service
        .find_all(&payload(json!({"entity": "product"})))
        .unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.data[0].get_str("name"), Some("ok"));
}

#[test]
fn non_object_batch_element_is_invalid() {
    let service = shop_service();
    let err = service
        .save_or_update(&payload(json!({"entity": "product", "data": [{"name": "a"}, 3]})))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPayload(_)));
}

#[test]
fn order_with_reference_and_generated_string_id() {
    let service = shop_service();
    save(&service, json!({"entity": "user", "data": {"id": 1, "email": "ada@x"}}));
    let saved = save(
        &service,
        json!({"entity": "order", "data": {"customer": 1, "paid": "true", "placedOn": "2024-05-01"}}),
    );
    let order = &saved.instances()[0];
    assert!(order.get_str("orderId").is_some());
    assert_eq!(order.get_object("customer").unwrap().get_str("email"), Some("ada@x"));
    assert_eq!(order.get_scalar("paid"), Some(&Scalar::Boolean(true)));
}

#[test]
fn strict_mode_rejects_undeclared_keys() {
    let service = shop_service_with(EngineConfig {
        strict_keys: true,
        ..EngineConfig::default()
    });
    let err = service
        .save_or_update(&payload(json!({"entity": "product", "data": {"name": "W", "sku": "x"}})))
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownField { .. }));
}

#[test]
fn strict_mode_accepts_null_data_key() {
    let service = shop_service_with(EngineConfig {
        strict_keys: true,
        ..EngineConfig::default()
    });
    let saved = save(&service, json!({"entity": "product", "data": null, "name": "W"}));
    assert_eq!(saved.instances()[0].get_str("name"), Some("W"));
}

// ── Find by id ───────────────────────────────────────────────────

#[test]
fn find_without_id_fails() {
    let service = shop_service();
    let err = service
        .find_by_id(&payload(json!({"entity": "product"})))
        .unwrap_err();
    assert!(matches!(err, EngineError::MissingIdentifier));
}

#[test]
fn find_missing_record_fails() {
    let service = shop_service();
    let err = service
        .find_by_id(&payload(json!({"entity": "product", "id": 42})))
        .unwrap_err();
    assert!(matches!(err, EngineError::RecordNotFound(ref id) if id == "42"));
    assert_eq!(err.kind(), "record_not_found");
}

// ── Find all ─────────────────────────────────────────────────────

#[test]
fn pages_through_twenty_five_records() {
    let service = shop_service();
    seed_products(&service, 25);

    let first = service
        .find_all(&payload(json!({"entity": "product", "page": 0, "size": 10})))
        .unwrap();
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.total_elements, 25);
    assert!(first.is_first && first.has_next && !first.has_previous && !first.is_last);
    assert_eq!(first.data.len(), 10);

    let last = service
        .find_all(&payload(json!({"entity": "product", "page": 2, "size": 10})))
        .unwrap();
    assert_eq!(last.data.len(), 5);
    assert!(last.is_last && last.has_previous && !last.has_next && !last.is_first);
    assert_eq!(last.data[0].get_str("name"), Some("p20"));
}

#[test]
fn paging_defaults_apply() {
    let service = shop_service();
    seed_products(&service, 12);
    let page = service
        .find_all(&payload(json!({"entity": "product"})))
        .unwrap();
    assert_eq!((page.page, page.size), (0, 10));
    assert_eq!(page.data.len(), 10);
}

#[test]
fn configured_default_page_size_applies() {
    let service = shop_service_with(EngineConfig {
        default_page_size: 5,
        ..EngineConfig::default()
    });
    seed_products(&service, 12);
    let page = service
        .find_all(&payload(json!({"entity": "product"})))
        .unwrap();
    assert_eq!(page.size, 5);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn paging_parameters_are_lenient() {
    let service = shop_service();
    seed_products(&service, 25);
    let page = service
        .find_all(&payload(json!({"entity": "product", "page": "1", "size": 10.9})))
        .unwrap();
    assert_eq!((page.page, page.size), (1, 10));

    let fallback = service
        .find_all(&payload(json!({"entity": "product", "page": "first"})))
        .unwrap();
    assert_eq!(fallback.page, 0);
}

#[test]
fn negative_page_is_rejected() {
    let service = shop_service();
    let err = service
        .find_all(&payload(json!({"entity": "product", "page": -1})))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPage(-1)));
}

#[test]
fn zero_size_is_rejected() {
    let service = shop_service();
    let err = service
        .find_all(&payload(json!({"entity": "product", "size": 0})))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPageSize(0)));
}

#[test]
fn oversized_page_size_is_clamped() {
    let service = shop_service();
    seed_products(&service, 3);
    let page = service
        .find_all(&payload(json!({"entity": "product", "size": 10_000_000_000i64})))
        .unwrap();
    assert_eq!(page.size, u32::MAX);
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.data.len(), 3);
    assert!(page.is_last);
}

#[test]
fn sorts_descending_by_field() {
    let service = shop_service();
    seed_products(&service, 5);
    let page = service
        .find_all(&payload(json!({
            "entity": "product", "size": 2, "sortBy": "price", "sortOrder": "DESC"
        })))
        .unwrap();
    let names: Vec<_> = page.data.iter().map(|p| p.get_str("name").unwrap()).collect();
    assert_eq!(names, vec!["p04", "p03"]);
}

#[test]
fn empty_sort_field_is_ignored() {
    let service = shop_service();
    seed_products(&service, 3);
    let page = service
        .find_all(&payload(json!({"entity": "product", "sortBy": "", "sortOrder": "desc"})))
        .unwrap();
    assert_eq!(page.data[0].get_str("name"), Some("p00"));
}

#[test]
fn undeclared_sort_field_is_rejected() {
    let service = shop_service();
    let err = service
        .find_all(&payload(json!({"entity": "product", "sortBy": "colour"})))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidSortField { ref field, .. } if field == "colour"));
}

#[test]
fn page_envelope_serializes_camel_case() {
    let service = shop_service();
    seed_products(&service, 1);
    let page = service
        .find_all(&payload(json!({"entity": "product"})))
        .unwrap();
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(
        json,
        json!({
            "status": "success",
            "page": 0,
            "size": 10,
            "totalElements": 1,
            "totalPages": 1,
            "isFirst": true,
            "isLast": true,
            "hasNext": false,
            "hasPrevious": false,
            "data": [{"id": 1, "name": "p00", "price": 0.0}]
        })
    );
}

// ── Delete ───────────────────────────────────────────────────────

#[test]
fn delete_single_then_find_fails() {
    let service = shop_service();
    seed_products(&service, 2);
    let outcome = service
        .delete(&payload(json!({"entity": "product", "id": "1"})))
        .unwrap();
    assert_eq!(
        outcome,
        DeleteOutcome::Single {
            deleted: true,
            id: RecordId::Long(1)
        }
    );
    let err = service
        .find_by_id(&payload(json!({"entity": "product", "id": 1})))
        .unwrap_err();
    assert!(matches!(err, EngineError::RecordNotFound(_)));
}

#[test]
fn delete_batch_reports_count_and_ids() {
    let service = shop_service();
    seed_products(&service, 3);
    let outcome = service
        .delete(&payload(json!({"entity": "product", "ids": [1, 3]})))
        .unwrap();
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"deleted": true, "count": 2, "ids": [1, 3]})
    );
}

#[test]
fn delete_with_empty_ids_fails() {
    let service = shop_service();
    for body in [json!({"ids": []}), json!({"entity": "product", "ids": []}), json!({"entity": "product", "ids": null})] {
        let err = service.delete(&payload(body)).unwrap_err();
        assert!(matches!(err, EngineError::EmptyIdList));
    }
}

#[test]
fn delete_without_id_or_ids_fails() {
    let service = shop_service();
    let err = service
        .delete(&payload(json!({"entity": "product"})))
        .unwrap_err();
    assert!(matches!(err, EngineError::MissingIdOrIds));
}

#[test]
fn delete_with_non_list_ids_is_invalid() {
    let service = shop_service();
    let err = service
        .delete(&payload(json!({"entity": "product", "ids": 5})))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPayload(_)));
}

#[test]
fn delete_missing_record_fails() {
    let service = shop_service();
    let err = service
        .delete(&payload(json!({"entity": "product", "id": 9})))
        .unwrap_err();
    assert!(matches!(err, EngineError::RecordNotFound(ref id) if id == "9"));
}

// ── Error envelope ───────────────────────────────────────────────

#[test]
fn error_envelope_carries_kind_and_message() {
    let envelope = ErrorEnvelope::from(&EngineError::EmptyIdList);
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "status": "failed",
            "kind": "empty_id_list",
            "error": "the 'ids' list cannot be empty for delete operation"
        })
    );
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn merge_keeps_stored_fields_the_update_leaves_null(
        name in prop::option::of("[a-z]{1,8}"),
        price in prop::option::of(0.0f64..1000.0),
    ) {
        let service = shop_service();
        save(&service, json!({"entity": "product", "data": {"name": "orig", "price": 1.5}}));
        let updated = save(
            &service,
            json!({"entity": "product", "data": {"id": 1, "name": name, "price": price}}),
        );
        let product = &updated.instances()[0];

        let expected_name = name.as_deref().unwrap_or("orig");
        let expected_price = price.unwrap_or(1.5);
        prop_assert_eq!(product.get_str("name"), Some(expected_name));
        prop_assert_eq!(product.get_scalar("price"), Some(&Scalar::Double(expected_price)));
    }

    #[test]
    fn saved_records_read_back_unchanged(name in "[a-zA-Z0-9 ]{0,20}", price in -1e6f64..1e6) {
        let service = shop_service();
        let saved = save(&service, json!({"entity": "product", "data": {"name": name, "price": price}}));
        let created = saved.instances()[0].clone();
        let found = service
            .find_by_id(&payload(json!({"entity": "product", "id": 1})))
            .unwrap();
        prop_assert_eq!(found, created);
    }
}
