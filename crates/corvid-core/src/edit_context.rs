//! Edit Context Registry
//!
//! Records which actors are currently editing which resource. Presence is
//! observational, not a lock: any number of actors may hold a context on the
//! same resource, and a new acquire by the same actor overwrites the previous
//! entry and renews its expiry.
//!
//! Expiry is the only cancellation mechanism besides an explicit release.
//! Reads filter out expired entries themselves, so a late (or absent) sweep
//! never makes stale presence visible.

use corvid_types::clock::{Clock, SystemClock};
use corvid_types::presence_adapter::{EditContext, PresenceAdapter};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::prelude::*;

#[derive(Debug)]
pub struct EditContextRegistry {
	store: Arc<dyn PresenceAdapter>,
	clock: Arc<dyn Clock>,
	ttl_secs: i64,
	/// Acquisition counter, orders contexts most-recent-first
	seq: AtomicU64,
}

impl EditContextRegistry {
	pub fn new(store: Arc<dyn PresenceAdapter>, ttl: Duration) -> Self {
		Self::with_clock(store, ttl, Arc::new(SystemClock))
	}

	pub fn with_clock(store: Arc<dyn PresenceAdapter>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
		let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
		Self { store, clock, ttl_secs, seq: AtomicU64::new(0) }
	}

	pub fn ttl(&self) -> Duration {
		Duration::from_secs(self.ttl_secs.unsigned_abs())
	}

	/// Start (or renew) an edit context for `actor_id` on `resource_id`
	pub async fn acquire(
		&self,
		resource_id: &str,
		actor_id: &str,
		input: Value,
	) -> CvResult<EditContext> {
		let now = self.clock.now();
		let ctx = EditContext {
			resource_id: resource_id.into(),
			actor_id: actor_id.into(),
			input,
			created_at: now,
			expires_at: now.add_seconds(self.ttl_secs),
			seq: self.seq.fetch_add(1, Ordering::SeqCst) + 1,
		};
		self.store.set(ctx.clone()).await?;

		debug!(
			resource_id = %resource_id,
			actor_id = %actor_id,
			expires_at = %ctx.expires_at,
			"Edit context acquired"
		);
		Ok(ctx)
	}

	/// End an edit context. Releasing a context that does not exist is a no-op.
	///
	/// Returns whether a context was actually removed.
	pub async fn release(&self, resource_id: &str, actor_id: &str) -> CvResult<bool> {
		let removed = self.store.delete(resource_id, actor_id).await?;
		if removed {
			debug!(resource_id = %resource_id, actor_id = %actor_id, "Edit context released");
		} else {
			trace!(resource_id = %resource_id, actor_id = %actor_id, "No edit context to release");
		}
		Ok(removed)
	}

	/// Live contexts on a resource, most recently acquired first
	pub async fn contexts(&self, resource_id: &str) -> CvResult<Vec<EditContext>> {
		let now = self.clock.now();
		let mut contexts: Vec<EditContext> = self
			.store
			.list(resource_id)
			.await?
			.into_iter()
			.filter(|ctx| !ctx.is_expired(now))
			.collect();
		contexts.sort_by(|a, b| b.seq.cmp(&a.seq));
		Ok(contexts)
	}

	/// Actors currently editing a resource, most recently acquired first
	pub async fn query(&self, resource_id: &str) -> CvResult<Vec<Box<str>>> {
		Ok(self.contexts(resource_id).await?.into_iter().map(|ctx| ctx.actor_id).collect())
	}

	/// Physically remove expired contexts
	pub async fn sweep(&self) -> CvResult<usize> {
		self.store.remove_expired(self.clock.now()).await
	}

	/// Run `sweep` periodically until the returned handle is aborted.
	///
	/// A zero interval starts nothing and returns `None`.
	pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> Option<JoinHandle<()>> {
		if interval.is_zero() {
			debug!("Edit context sweep disabled");
			return None;
		}
		let registry = Arc::clone(self);
		Some(tokio::spawn(async move {
			let mut ticker = tokio::time::interval(interval);
			loop {
				ticker.tick().await;
				match registry.sweep().await {
					Ok(0) => {}
					Ok(removed) => debug!(removed, "Edit context sweep"),
					Err(err) => warn!(error = %err, "Edit context sweep failed"),
				}
			}
		}))
	}
}


// vim: ts=4
