//! Topic-addressed change notification.
//!
//! Delivery is best-effort and ephemeral: there is no durable log, events
//! published while nobody listens are gone.

use async_trait::async_trait;
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::pin::Pin;
use uuid::Uuid;

use crate::prelude::*;

/// Well-known topics
pub mod topics {
	pub const SETTINGS_ADDED: &str = "Settings_ADDED_TOPIC";
	pub const SETTINGS_EDIT: &str = "Settings_EDIT_TOPIC";
}

/// An event on the change bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
	pub id: Box<str>,
	pub topic: Box<str>,
	pub payload: Value,
	pub actor: Actor,
	pub timestamp: Timestamp,
}

impl ChangeEvent {
	pub fn new(topic: &str, payload: Value, actor: Actor) -> Self {
		Self {
			id: Uuid::new_v4().to_string().into(),
			topic: topic.into(),
			payload,
			actor,
			timestamp: Timestamp::now(),
		}
	}
}

pub type EventStream = Pin<Box<dyn Stream<Item = ChangeEvent> + Send>>;

#[async_trait]
pub trait EventBus: Send + Sync {
	/// Hands `payload` to every subscriber of `topic` without waiting for them.
	///
	/// Returns the number of subscribers the event was enqueued for. Having no
	/// subscribers is not an error.
	async fn publish(&self, topic: &str, payload: Value, actor: &Actor) -> CvResult<usize>;

	/// Live stream of events on `topic`. Dropping the stream ends the subscription.
	async fn subscribe(&self, topic: &str) -> CvResult<EventStream>;
}

// vim: ts=4
