//! Adapter that persists platform entities.
//!
//! The settings facade never stores anything itself; it hands creation,
//! lookup and field updates to an implementation of [`PersistenceAdapter`].
//! Failures surface as `Error::NotFound`, `Error::Conflict` or
//! `Error::DbError` and are propagated to the caller without retry.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::{Entity, FieldPatch, Fields};

/// Result of a field update
#[derive(Debug, Clone)]
pub struct UpdateResult {
	/// The entity as it is after the update was applied
	pub element: Entity,
}

#[async_trait]
pub trait PersistenceAdapter: Debug + Send + Sync {
	/// Creates an entity of the given kind.
	///
	/// Singleton kinds may only be created once, a second creation is
	/// rejected with `Error::Conflict`.
	async fn create(&self, actor: &Actor, fields: Fields, kind: &str) -> CvResult<Entity>;

	/// Loads an entity by id, `Error::NotFound` if it does not exist
	async fn load_by_id(&self, actor: &Actor, id: &str, kind: &str) -> CvResult<Entity>;

	/// Loads the first entity of a kind (used for singletons)
	async fn load_entity(&self, actor: &Actor, kind: &str) -> CvResult<Option<Entity>>;

	/// Applies field patches and returns the updated entity
	async fn update_attribute(
		&self,
		actor: &Actor,
		id: &str,
		kind: &str,
		patches: &[FieldPatch],
	) -> CvResult<UpdateResult>;
}

// vim: ts=4
