//! Persistence adapter CRUD tests
//!
//! Tests create, load and field updates, including singleton enforcement

use corvid::error::Error;
use corvid::persistence_adapter::PersistenceAdapter;
use corvid::types::{ENTITY_TYPE_SETTINGS, Actor, EditOperation, FieldPatch, Fields};
use corvid_persistence_adapter_memory::{AdapterConfig, PersistenceAdapterMemory};
use serde_json::json;
use std::sync::Arc;

fn settings_fields() -> Fields {
	let mut fields = Fields::new();
	fields.insert("platform_title".into(), json!("Corvid"));
	fields.insert("platform_email".into(), json!("admin@corvid.local"));
	fields
}

#[tokio::test]
async fn test_create_and_load() {
	let adapter = PersistenceAdapterMemory::new();
	let actor = Actor::new("admin");

	let created = adapter
		.create(&actor, settings_fields(), ENTITY_TYPE_SETTINGS)
		.await
		.expect("Failed to create settings");
	assert_eq!(&*created.entity_type, ENTITY_TYPE_SETTINGS);

	let loaded = adapter
		.load_by_id(&actor, &created.id, ENTITY_TYPE_SETTINGS)
		.await
		.expect("Failed to load settings");
	assert_eq!(loaded, created);

	let singleton = adapter
		.load_entity(&Actor::system(), ENTITY_TYPE_SETTINGS)
		.await
		.expect("Failed to load singleton");
	assert_eq!(singleton.map(|e| e.id), Some(created.id));
}

#[tokio::test]
async fn test_reserved_fields_are_ignored_on_create() {
	let adapter = PersistenceAdapterMemory::new();
	let mut fields = settings_fields();
	fields.insert("id".into(), json!("forged"));

	let created = adapter
		.create(&Actor::new("admin"), fields, ENTITY_TYPE_SETTINGS)
		.await
		.expect("Failed to create settings");
	assert_ne!(&*created.id, "forged");
	assert!(created.get("id").is_none());
}

#[tokio::test]
async fn test_singleton_first_writer_wins() {
	let adapter = PersistenceAdapterMemory::new();
	let actor = Actor::new("admin");

	adapter
		.create(&actor, settings_fields(), ENTITY_TYPE_SETTINGS)
		.await
		.expect("First creation should succeed");
	let second = adapter.create(&actor, settings_fields(), ENTITY_TYPE_SETTINGS).await;

	assert!(matches!(second, Err(Error::Conflict(_))));
	assert_eq!(adapter.count(ENTITY_TYPE_SETTINGS), 1);
}

#[tokio::test]
async fn test_concurrent_singleton_creation() {
	let adapter = Arc::new(PersistenceAdapterMemory::new());

	let mut handles = vec![];
	for i in 0..8 {
		let adapter = Arc::clone(&adapter);
		handles.push(tokio::spawn(async move {
			let actor = Actor::new(&format!("admin-{}", i));
			adapter.create(&actor, settings_fields(), ENTITY_TYPE_SETTINGS).await.is_ok()
		}));
	}

	let mut created = 0;
	for handle in handles {
		if handle.await.expect("Task panicked") {
			created += 1;
		}
	}
	assert_eq!(created, 1);
	assert_eq!(adapter.count(ENTITY_TYPE_SETTINGS), 1);
}

#[tokio::test]
async fn test_non_singleton_kinds_allow_duplicates() {
	let adapter = PersistenceAdapterMemory::with_config(AdapterConfig { singleton_kinds: vec![] });
	let actor = Actor::new("admin");

	for _ in 0..3 {
		adapter
			.create(&actor, settings_fields(), ENTITY_TYPE_SETTINGS)
			.await
			.expect("Creation should succeed");
	}
	assert_eq!(adapter.count(ENTITY_TYPE_SETTINGS), 3);
}

#[tokio::test]
async fn test_update_attribute() {
	let adapter = PersistenceAdapterMemory::new();
	let actor = Actor::new("admin");
	let created = adapter
		.create(&actor, settings_fields(), ENTITY_TYPE_SETTINGS)
		.await
		.expect("Failed to create settings");

	let result = adapter
		.update_attribute(&actor, &created.id, ENTITY_TYPE_SETTINGS, &[
			FieldPatch::replace("enforce_references_override", json!(true)),
			FieldPatch {
				key: "platform_language".into(),
				value: json!("en-us"),
				operation: EditOperation::Replace,
			},
		])
		.await
		.expect("Failed to update settings");

	assert_eq!(result.element.get("enforce_references_override"), Some(&json!(true)));
	assert_eq!(result.element.get("platform_title"), Some(&json!("Corvid")));

	let loaded = adapter
		.load_by_id(&actor, &created.id, ENTITY_TYPE_SETTINGS)
		.await
		.expect("Failed to load settings");
	assert_eq!(loaded, result.element);
}

#[tokio::test]
async fn test_update_errors() {
	let adapter = PersistenceAdapterMemory::new();
	let actor = Actor::new("admin");

	let missing = adapter
		.update_attribute(&actor, "missing", ENTITY_TYPE_SETTINGS, &[FieldPatch::replace(
			"platform_title",
			json!("x"),
		)])
		.await;
	assert!(matches!(missing, Err(Error::NotFound)));

	let created = adapter
		.create(&actor, settings_fields(), ENTITY_TYPE_SETTINGS)
		.await
		.expect("Failed to create settings");
	let read_only = adapter
		.update_attribute(&actor, &created.id, ENTITY_TYPE_SETTINGS, &[FieldPatch::replace(
			"id",
			json!("other"),
		)])
		.await;
	assert!(matches!(read_only, Err(Error::ValidationError(_))));

	let wrong_kind = adapter.load_by_id(&actor, &created.id, "Group").await;
	assert!(matches!(wrong_kind, Err(Error::NotFound)));
}

// vim: ts=4
