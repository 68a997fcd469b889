//! Shared wiring for settings tests
#![allow(dead_code)]

use corvid_core::{ChangeBus, SettingsConfig};
use corvid_persistence_adapter_memory::PersistenceAdapterMemory;
use corvid_presence_adapter_memory::PresenceAdapterMemory;
use corvid_settings::{SettingsAdapters, SettingsService};
use corvid_types::capability::{CapabilityProbe, StaticProbe, VersionDescriptor};
use corvid_types::clock::ManualClock;
use corvid_types::persistence_adapter::PersistenceAdapter;
use corvid_types::types::{Fields, Timestamp};
use serde_json::Value;
use std::sync::Arc;

pub struct Harness {
	pub service: Arc<SettingsService>,
	pub clock: Arc<ManualClock>,
}

pub fn search_engine(number: &str) -> StaticProbe {
	StaticProbe::new("Search engine", VersionDescriptor::new(number))
}

pub fn harness() -> Harness {
	harness_with(search_engine("7.13.2"), SettingsConfig::default())
}

pub fn harness_with(search: StaticProbe, config: SettingsConfig) -> Harness {
	harness_with_persistence(search, config, Arc::new(PersistenceAdapterMemory::new()))
}

pub fn harness_with_persistence(
	search: StaticProbe,
	config: SettingsConfig,
	persistence: Arc<dyn PersistenceAdapter>,
) -> Harness {
	let clock = Arc::new(ManualClock::new(Timestamp(1_700_000_000)));
	let dependencies: Vec<Arc<dyn CapabilityProbe>> = vec![
		Arc::new(StaticProbe::new("RabbitMQ", VersionDescriptor::new("3.12.4"))),
		Arc::new(StaticProbe::new("Redis", VersionDescriptor::new("7.2.4"))),
	];
	let adapters = SettingsAdapters {
		persistence,
		presence: Arc::new(PresenceAdapterMemory::new()),
		bus: Arc::new(ChangeBus::new()),
		search_engine: Arc::new(search),
		dependencies,
	};
	let service = SettingsService::with_clock(config, adapters, clock.clone());
	Harness { service: Arc::new(service), clock }
}

pub fn fields(value: Value) -> Fields {
	match value {
		Value::Object(map) => map,
		_ => Fields::new(),
	}
}

// vim: ts=4
