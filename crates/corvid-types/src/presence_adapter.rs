//! Adapter that stores edit contexts (who is editing what).
//!
//! Entries are keyed by `(resource_id, actor_id)`. `set` is an atomic upsert,
//! `delete` an atomic removal; no multi-key transaction is ever needed.
//! Expiry is carried in the entry itself (`expires_at`) so that a backing
//! store may drop it on its own, but readers must not rely on that: the
//! registry filters expired entries at read time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

use crate::prelude::*;

/// A time-bounded record that an actor is editing a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditContext {
	pub resource_id: Box<str>,
	pub actor_id: Box<str>,
	/// What the client reported when it started editing (focused field, etc.)
	pub input: Value,
	pub created_at: Timestamp,
	pub expires_at: Timestamp,
	/// Acquisition sequence, higher is more recent
	pub seq: u64,
}

impl EditContext {
	pub fn is_expired(&self, now: Timestamp) -> bool {
		now >= self.expires_at
	}
}

#[async_trait]
pub trait PresenceAdapter: Debug + Send + Sync {
	/// Inserts or overwrites the entry for `(ctx.resource_id, ctx.actor_id)`
	async fn set(&self, ctx: EditContext) -> CvResult<()>;

	/// Reads a single entry, expired or not
	async fn get(&self, resource_id: &str, actor_id: &str) -> CvResult<Option<EditContext>>;

	/// Removes an entry. Returns `false` if there was nothing to remove.
	async fn delete(&self, resource_id: &str, actor_id: &str) -> CvResult<bool>;

	/// All entries stored for a resource, in no particular order
	async fn list(&self, resource_id: &str) -> CvResult<Vec<EditContext>>;

	/// Physically removes every entry expired at `now`, returns how many
	async fn remove_expired(&self, now: Timestamp) -> CvResult<usize>;
}

// vim: ts=4
