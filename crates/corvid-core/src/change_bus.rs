//! Change Bus
//!
//! Topic-addressed, in-process event fan-out. Every subscriber owns a bounded
//! buffer; `publish` only enqueues with `try_send`, so a slow or stalled
//! subscriber never blocks the publisher or the other subscribers. When a
//! buffer is full the event is dropped for that subscriber (at-most-once).
//!
//! Events published by one task on one topic reach each subscriber in
//! publish order. Nothing is retained: publishing to a topic without
//! subscribers is a silent no-op.

use async_trait::async_trait;
use corvid_types::bus_adapter::{ChangeEvent, EventBus, EventStream};
use flume::TrySendError;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::prelude::*;

/// A live subscription on one topic
#[derive(Debug)]
struct Subscriber {
	/// Unique subscriber ID
	id: u64,
	/// When this subscription was established
	subscribed_at: Timestamp,
	sender: flume::Sender<ChangeEvent>,
}

/// Bus statistics
#[derive(Debug, Clone, Default)]
pub struct BusStats {
	/// Topics with at least one subscriber
	pub topics: usize,
	/// Total number of live subscriptions
	pub subscribers: usize,
	/// Subscribers per topic
	pub subscribers_per_topic: HashMap<Box<str>, usize>,
}

/// Type alias for the subscription map: topic -> subscribers
type TopicMap = HashMap<Box<str>, Vec<Subscriber>>;

/// Configuration
#[derive(Clone, Debug)]
pub struct BusConfig {
	/// Maximum number of events to buffer per subscriber
	pub buffer_size: usize,
}

impl Default for BusConfig {
	fn default() -> Self {
		Self { buffer_size: 128 }
	}
}

/// In-process change bus
#[derive(Debug)]
pub struct ChangeBus {
	topics: RwLock<TopicMap>,
	next_id: AtomicU64,
	config: BusConfig,
}

impl ChangeBus {
	/// Create a new bus with default config
	pub fn new() -> Self {
		Self::with_config(BusConfig::default())
	}

	/// Create with custom config
	pub fn with_config(config: BusConfig) -> Self {
		Self { topics: RwLock::new(HashMap::new()), next_id: AtomicU64::new(1), config }
	}

	/// Enqueue an event for every current subscriber of its topic
	///
	/// Returns the number of subscribers the event was enqueued for.
	pub fn publish_event(&self, event: &ChangeEvent) -> usize {
		let mut delivered = 0;
		let mut has_stale = false;

		{
			let topics = self.topics.read();
			let Some(subscribers) = topics.get(&event.topic) else {
				trace!(topic = %event.topic, "Publish without subscribers");
				return 0;
			};

			for sub in subscribers {
				match sub.sender.try_send(event.clone()) {
					Ok(()) => delivered += 1,
					Err(TrySendError::Full(_)) => {
						warn!(
							topic = %event.topic,
							subscriber = sub.id,
							"Subscriber buffer full, event dropped"
						);
					}
					Err(TrySendError::Disconnected(_)) => has_stale = true,
				}
			}
		}

		if has_stale {
			self.prune_topic(&event.topic);
		}

		debug!(topic = %event.topic, actor_id = %event.actor.id, delivered, "Event published");
		delivered
	}

	/// Subscribe to a topic
	///
	/// Dropping the returned stream ends the subscription; the subscriber is
	/// removed on the next publish to the topic or on `cleanup`.
	pub fn subscribe_topic(&self, topic: &str) -> EventStream {
		let (sender, receiver) = flume::bounded(self.config.buffer_size);
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);

		let subscriber = Subscriber { id, subscribed_at: Timestamp::now(), sender };
		self.topics.write().entry(topic.into()).or_default().push(subscriber);

		debug!(topic = %topic, subscriber = id, "Subscribed");
		Box::pin(receiver.into_stream())
	}

	/// Number of live subscribers on a topic
	pub fn subscriber_count(&self, topic: &str) -> usize {
		self.topics
			.read()
			.get(topic)
			.map_or(0, |subs| subs.iter().filter(|s| !s.sender.is_disconnected()).count())
	}

	/// Get bus statistics
	pub fn stats(&self) -> BusStats {
		let topics = self.topics.read();

		let mut stats = BusStats::default();
		for (topic, subscribers) in topics.iter() {
			let live = subscribers.iter().filter(|s| !s.sender.is_disconnected()).count();
			if live == 0 {
				continue;
			}
			stats.topics += 1;
			stats.subscribers += live;
			stats.subscribers_per_topic.insert(topic.clone(), live);
		}
		stats
	}

	/// Remove subscriptions whose stream has been dropped
	pub fn cleanup(&self) {
		let mut topics = self.topics.write();

		for subscribers in topics.values_mut() {
			subscribers.retain(|sub| !sub.sender.is_disconnected());
		}
		topics.retain(|_, subscribers| !subscribers.is_empty());
	}

	fn prune_topic(&self, topic: &str) {
		let mut topics = self.topics.write();

		if let Some(subscribers) = topics.get_mut(topic) {
			subscribers.retain(|sub| {
				let alive = !sub.sender.is_disconnected();
				if !alive {
					debug!(
						topic = %topic,
						subscriber = sub.id,
						subscribed_at = %sub.subscribed_at,
						"Subscriber detached"
					);
				}
				alive
			});
			if subscribers.is_empty() {
				topics.remove(topic);
			}
		}
	}
}

impl Default for ChangeBus {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl EventBus for ChangeBus {
	async fn publish(&self, topic: &str, payload: Value, actor: &Actor) -> CvResult<usize> {
		let event = ChangeEvent::new(topic, payload, actor.clone());
		Ok(self.publish_event(&event))
	}

	async fn subscribe(&self, topic: &str) -> CvResult<EventStream> {
		Ok(self.subscribe_topic(topic))
	}
}


// vim: ts=4
