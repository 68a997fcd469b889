//! In-memory presence store
//!
//! Implements the PresenceAdapter trait with a single reader/writer lock over a
//! two-level map: `resource_id -> actor_id -> EditContext`.
//!
//! # Consistency
//!
//! - `set` and `delete` are atomic per `(resource, actor)` key
//! - `list` returns a snapshot taken under the read lock
//! - Expired entries are kept until `remove_expired` runs; callers filter on
//!   read, so a delayed sweep never leaks stale presence

use async_trait::async_trait;
use corvid::presence_adapter::{EditContext, PresenceAdapter};
use corvid::prelude::*;
use parking_lot::RwLock;
use std::collections::HashMap;

/// resource_id -> actor_id -> context
type PresenceMap = HashMap<Box<str>, HashMap<Box<str>, EditContext>>;

/// Presence statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceStats {
	/// Resources with at least one stored context
	pub resources: usize,
	/// Stored contexts, expired ones included
	pub contexts: usize,
}

#[derive(Debug, Default)]
pub struct PresenceAdapterMemory {
	entries: RwLock<PresenceMap>,
}

impl PresenceAdapterMemory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn stats(&self) -> PresenceStats {
		let entries = self.entries.read();
		PresenceStats {
			resources: entries.len(),
			contexts: entries.values().map(HashMap::len).sum(),
		}
	}
}

#[async_trait]
impl PresenceAdapter for PresenceAdapterMemory {
	async fn set(&self, ctx: EditContext) -> CvResult<()> {
		let mut entries = self.entries.write();
		entries
			.entry(ctx.resource_id.clone())
			.or_default()
			.insert(ctx.actor_id.clone(), ctx);
		Ok(())
	}

	async fn get(&self, resource_id: &str, actor_id: &str) -> CvResult<Option<EditContext>> {
		let entries = self.entries.read();
		Ok(entries.get(resource_id).and_then(|actors| actors.get(actor_id)).cloned())
	}

	async fn delete(&self, resource_id: &str, actor_id: &str) -> CvResult<bool> {
		let mut entries = self.entries.write();

		let Some(actors) = entries.get_mut(resource_id) else {
			return Ok(false);
		};
		let removed = actors.remove(actor_id).is_some();

		// Clean up empty resource entries
		if actors.is_empty() {
			entries.remove(resource_id);
		}
		Ok(removed)
	}

	async fn list(&self, resource_id: &str) -> CvResult<Vec<EditContext>> {
		let entries = self.entries.read();
		Ok(entries
			.get(resource_id)
			.map(|actors| actors.values().cloned().collect())
			.unwrap_or_default())
	}

	async fn remove_expired(&self, now: Timestamp) -> CvResult<usize> {
		let mut entries = self.entries.write();

		let mut removed = 0;
		for actors in entries.values_mut() {
			let before = actors.len();
			actors.retain(|_, ctx| !ctx.is_expired(now));
			removed += before - actors.len();
		}
		entries.retain(|_, actors| !actors.is_empty());

		if removed > 0 {
			tracing::debug!(removed, "Removed expired edit contexts");
		}
		Ok(removed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn ctx(resource: &str, actor: &str, expires_at: i64, seq: u64) -> EditContext {
		EditContext {
			resource_id: resource.into(),
			actor_id: actor.into(),
			input: json!({}),
			created_at: Timestamp(0),
			expires_at: Timestamp(expires_at),
			seq,
		}
	}

	#[tokio::test]
	async fn test_empty_resources_are_dropped() {
		let store = PresenceAdapterMemory::new();
		store.set(ctx("s1", "alice", 100, 1)).await.unwrap();
		assert_eq!(store.stats(), PresenceStats { resources: 1, contexts: 1 });

		assert!(store.delete("s1", "alice").await.unwrap());
		assert_eq!(store.stats(), PresenceStats::default());
	}

	#[tokio::test]
	async fn test_delete_absent_is_noop() {
		let store = PresenceAdapterMemory::new();
		assert!(!store.delete("s1", "alice").await.unwrap());

		store.set(ctx("s1", "bob", 100, 1)).await.unwrap();
		assert!(!store.delete("s1", "alice").await.unwrap());
		assert_eq!(store.list("s1").await.unwrap().len(), 1);
	}
}

// vim: ts=4
