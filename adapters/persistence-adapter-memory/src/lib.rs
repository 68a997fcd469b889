//! In-memory persistence adapter
//!
//! Reference implementation of the PersistenceAdapter trait. Entities live in a
//! list guarded by a reader/writer lock, so every create and update is atomic.
//! Kinds listed in [`AdapterConfig::singleton_kinds`] can only be created once:
//! the first writer wins and later creations fail with `Error::Conflict`.

use async_trait::async_trait;
use corvid::persistence_adapter::{PersistenceAdapter, UpdateResult};
use corvid::prelude::*;
use corvid::types::{ENTITY_TYPE_SETTINGS, EditOperation, Entity, FieldPatch, Fields};
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

/// Fields managed by the adapter itself
const RESERVED_FIELDS: [&str; 2] = ["id", "entity_type"];

#[derive(Debug, Clone)]
pub struct AdapterConfig {
	/// Entity kinds that may exist at most once
	pub singleton_kinds: Vec<Box<str>>,
}

impl Default for AdapterConfig {
	fn default() -> Self {
		Self { singleton_kinds: vec![ENTITY_TYPE_SETTINGS.into()] }
	}
}

#[derive(Debug, Default)]
pub struct PersistenceAdapterMemory {
	config: AdapterConfig,
	/// Stored entities, in creation order
	entities: RwLock<Vec<Entity>>,
}

impl PersistenceAdapterMemory {
	pub fn new() -> Self {
		Self::with_config(AdapterConfig::default())
	}

	pub fn with_config(config: AdapterConfig) -> Self {
		Self { config, entities: RwLock::new(Vec::new()) }
	}

	fn is_singleton(&self, kind: &str) -> bool {
		self.config.singleton_kinds.iter().any(|k| k.as_ref() == kind)
	}

	/// Number of stored entities of a kind
	pub fn count(&self, kind: &str) -> usize {
		self.entities.read().iter().filter(|e| e.entity_type.as_ref() == kind).count()
	}
}

#[async_trait]
impl PersistenceAdapter for PersistenceAdapterMemory {
	async fn create(&self, actor: &Actor, mut fields: Fields, kind: &str) -> CvResult<Entity> {
		for reserved in RESERVED_FIELDS {
			fields.remove(reserved);
		}

		let mut entities = self.entities.write();
		if self.is_singleton(kind) && entities.iter().any(|e| e.entity_type.as_ref() == kind) {
			warn!(kind = %kind, actor_id = %actor.id, "Rejected duplicate singleton creation");
			return Err(Error::Conflict(format!("{} already exists", kind)));
		}

		let entity =
			Entity { id: Uuid::new_v4().to_string().into(), entity_type: kind.into(), fields };
		entities.push(entity.clone());

		debug!(kind = %kind, id = %entity.id, actor_id = %actor.id, "Entity created");
		Ok(entity)
	}

	async fn load_by_id(&self, _actor: &Actor, id: &str, kind: &str) -> CvResult<Entity> {
		self.entities
			.read()
			.iter()
			.find(|e| e.id.as_ref() == id && e.entity_type.as_ref() == kind)
			.cloned()
			.ok_or(Error::NotFound)
	}

	async fn load_entity(&self, _actor: &Actor, kind: &str) -> CvResult<Option<Entity>> {
		Ok(self.entities.read().iter().find(|e| e.entity_type.as_ref() == kind).cloned())
	}

	async fn update_attribute(
		&self,
		actor: &Actor,
		id: &str,
		kind: &str,
		patches: &[FieldPatch],
	) -> CvResult<UpdateResult> {
		if let Some(patch) = patches.iter().find(|p| RESERVED_FIELDS.contains(&p.key.as_str())) {
			return Err(Error::ValidationError(format!("field '{}' is read-only", patch.key)));
		}

		let mut entities = self.entities.write();
		let entity = entities
			.iter_mut()
			.find(|e| e.id.as_ref() == id && e.entity_type.as_ref() == kind)
			.ok_or(Error::NotFound)?;

		for patch in patches {
			apply_patch(&mut entity.fields, patch);
		}

		debug!(kind = %kind, id = %id, actor_id = %actor.id, patches = patches.len(), "Entity updated");
		Ok(UpdateResult { element: entity.clone() })
	}
}

fn apply_patch(fields: &mut Fields, patch: &FieldPatch) {
	match patch.operation {
		EditOperation::Replace => {
			if patch.value.is_null() {
				fields.remove(&patch.key);
			} else {
				fields.insert(patch.key.clone(), patch.value.clone());
			}
		}
		EditOperation::Add => {
			let added = match &patch.value {
				Value::Array(values) => values.clone(),
				value => vec![value.clone()],
			};
			match fields.get_mut(&patch.key) {
				Some(Value::Array(existing)) => {
					for value in added {
						if !existing.contains(&value) {
							existing.push(value);
						}
					}
				}
				Some(existing) => {
					let mut values = vec![existing.take()];
					for value in added {
						if !values.contains(&value) {
							values.push(value);
						}
					}
					*existing = Value::Array(values);
				}
				None => {
					fields.insert(patch.key.clone(), Value::Array(added));
				}
			}
		}
		EditOperation::Remove => {
			let removed = match &patch.value {
				Value::Array(values) => values.clone(),
				value => vec![value.clone()],
			};
			match fields.get_mut(&patch.key) {
				Some(Value::Array(existing)) => existing.retain(|v| !removed.contains(v)),
				Some(existing) if removed.contains(existing) => {
					fields.remove(&patch.key);
				}
				_ => {}
			}
		}
	}
}


// vim: ts=4
