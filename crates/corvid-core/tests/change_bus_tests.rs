//! Change bus delivery tests
//!
//! Ordering per publisher, fan-out, slow subscribers and detached streams

use corvid_core::{BusConfig, ChangeBus};
use corvid_types::bus_adapter::EventBus;
use corvid_types::types::Actor;
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_publish_order_is_preserved() {
	let bus = ChangeBus::new();
	let actor = Actor::new("alice");
	let mut stream = bus.subscribe("Settings_EDIT_TOPIC").await.expect("subscribe failed");

	for i in 0..50 {
		bus.publish("Settings_EDIT_TOPIC", json!({ "seq": i }), &actor)
			.await
			.expect("publish failed");
	}

	for i in 0..50 {
		let event = stream.next().await.expect("stream ended");
		assert_eq!(event.payload["seq"], i);
	}
}

#[tokio::test]
async fn test_fan_out_to_all_subscribers() {
	let bus = ChangeBus::new();
	let mut streams = vec![];
	for _ in 0..3 {
		streams.push(bus.subscribe("Settings_ADDED_TOPIC").await.expect("subscribe failed"));
	}

	let delivered = bus
		.publish("Settings_ADDED_TOPIC", json!({ "id": "s1" }), &Actor::new("admin"))
		.await
		.expect("publish failed");
	assert_eq!(delivered, 3);

	for stream in &mut streams {
		let event = stream.next().await.expect("stream ended");
		assert_eq!(event.payload["id"], "s1");
		assert_eq!(&*event.actor.id, "admin");
	}
}

#[tokio::test]
async fn test_stalled_subscriber_does_not_block_others() {
	let bus = ChangeBus::with_config(BusConfig { buffer_size: 4 });
	let actor = Actor::new("alice");

	// Never polled
	let _stalled = bus.subscribe("t").await.expect("subscribe failed");
	let mut active = bus.subscribe("t").await.expect("subscribe failed");

	let reader = tokio::spawn(async move {
		let mut seen = vec![];
		while let Some(event) = active.next().await {
			let seq = event.payload["seq"].as_i64().unwrap_or_default();
			seen.push(seq);
			if seq == 19 {
				break;
			}
		}
		seen
	});

	for i in 0..20 {
		// Publishing never waits on the stalled buffer
		tokio::time::timeout(Duration::from_secs(1), bus.publish("t", json!({ "seq": i }), &actor))
			.await
			.expect("publish blocked")
			.expect("publish failed");
		tokio::task::yield_now().await;
	}

	let seen = reader.await.expect("reader panicked");
	assert_eq!(seen.last(), Some(&19));
	assert!(seen.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_full_buffer_drops_events() {
	let bus = ChangeBus::with_config(BusConfig { buffer_size: 2 });
	let actor = Actor::new("alice");
	let mut stream = bus.subscribe("t").await.expect("subscribe failed");

	let mut delivered = 0;
	for i in 0..5 {
		delivered += bus.publish("t", json!(i), &actor).await.expect("publish failed");
	}
	assert_eq!(delivered, 2);

	assert_eq!(stream.next().await.expect("stream ended").payload, json!(0));
	assert_eq!(stream.next().await.expect("stream ended").payload, json!(1));
}

#[tokio::test]
async fn test_detached_subscriber_stops_receiving() {
	let bus = Arc::new(ChangeBus::new());
	let actor = Actor::new("alice");

	let stream = bus.subscribe("t").await.expect("subscribe failed");
	drop(stream);

	let delivered = bus.publish("t", json!({}), &actor).await.expect("publish failed");
	assert_eq!(delivered, 0);
	assert_eq!(bus.subscriber_count("t"), 0);
	assert_eq!(bus.stats().topics, 0);
}

#[tokio::test]
async fn test_concurrent_publishers_keep_their_own_order() {
	let bus = Arc::new(ChangeBus::new());
	let mut stream = bus.subscribe("t").await.expect("subscribe failed");

	let mut handles = vec![];
	for publisher in 0..4 {
		let bus = Arc::clone(&bus);
		handles.push(tokio::spawn(async move {
			let actor = Actor::new(&format!("p{}", publisher));
			for i in 0..10 {
				bus.publish("t", json!({ "p": publisher, "i": i }), &actor)
					.await
					.expect("publish failed");
			}
		}));
	}
	for handle in handles {
		handle.await.expect("Task panicked");
	}

	let mut last = [-1i64; 4];
	for _ in 0..40 {
		let event = stream.next().await.expect("stream ended");
		let p = usize::try_from(event.payload["p"].as_u64().unwrap_or_default()).unwrap_or_default();
		let i = event.payload["i"].as_i64().unwrap_or_default();
		assert!(i > last[p], "publisher {} out of order", p);
		last[p] = i;
	}
	assert_eq!(last, [9; 4]);
}

// vim: ts=4
