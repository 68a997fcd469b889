//! Settings service
//!
//! Orchestrates reads and writes of the settings singleton. Persistence and
//! presence state live in adapters; every successful change is announced on
//! the change bus. The registry and the bus stay independent of each other:
//! presence notifications are published here, after the registry call.

use corvid_core::{EditContextRegistry, SettingsConfig};
use corvid_types::bus_adapter::{EventBus, EventStream, topics};
use corvid_types::capability::CapabilityProbe;
use corvid_types::clock::{Clock, SystemClock};
use corvid_types::persistence_adapter::PersistenceAdapter;
use corvid_types::presence_adapter::PresenceAdapter;
use corvid_types::types::{ENTITY_TYPE_SETTINGS, Entity, FieldPatch, Fields};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::feature_flags::{self, CapabilitySnapshot};
use crate::info;
use crate::prelude::*;
use crate::types::{
	ApplicationInfo, COMPUTED_FIELDS, EditNotification, EditUserContext, PlatformModule,
	PlatformSettings,
};

fn reject_computed_fields<'a>(mut keys: impl Iterator<Item = &'a str>) -> CvResult<()> {
	match keys.find(|key| COMPUTED_FIELDS.contains(key)) {
		Some(key) => Err(Error::ValidationError(format!("'{}' is a computed field", key))),
		None => Ok(()),
	}
}

/// Collaborators the settings service is wired with
pub struct SettingsAdapters {
	pub persistence: Arc<dyn PersistenceAdapter>,
	pub presence: Arc<dyn PresenceAdapter>,
	pub bus: Arc<dyn EventBus>,
	/// Probe whose version drives the feature flags
	pub search_engine: Arc<dyn CapabilityProbe>,
	/// Further dependencies reported in the application info
	pub dependencies: Vec<Arc<dyn CapabilityProbe>>,
}

pub struct SettingsService {
	persistence: Arc<dyn PersistenceAdapter>,
	registry: Arc<EditContextRegistry>,
	bus: Arc<dyn EventBus>,
	search_engine: Arc<dyn CapabilityProbe>,
	dependencies: Vec<Arc<dyn CapabilityProbe>>,
	config: SettingsConfig,
}

impl std::fmt::Debug for SettingsService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingsService")
			.field("persistence", &self.persistence)
			.field("registry", &self.registry)
			.field("search_engine", &self.search_engine.name())
			.field("dependencies", &self.dependencies.len())
			.finish_non_exhaustive()
	}
}

impl SettingsService {
	pub fn new(config: SettingsConfig, adapters: SettingsAdapters) -> Self {
		Self::with_clock(config, adapters, Arc::new(SystemClock))
	}

	pub fn with_clock(
		config: SettingsConfig,
		adapters: SettingsAdapters,
		clock: Arc<dyn Clock>,
	) -> Self {
		let registry =
			EditContextRegistry::with_clock(adapters.presence, config.edit_context_ttl(), clock);
		Self {
			persistence: adapters.persistence,
			registry: Arc::new(registry),
			bus: adapters.bus,
			search_engine: adapters.search_engine,
			dependencies: adapters.dependencies,
			config,
		}
	}

	pub fn config(&self) -> &SettingsConfig {
		&self.config
	}

	pub fn registry(&self) -> &Arc<EditContextRegistry> {
		&self.registry
	}

	/// Start the periodic expired-context sweep, if one is configured
	pub fn spawn_sweeper(&self) -> Option<JoinHandle<()>> {
		self.config.sweep_interval().and_then(|interval| self.registry.spawn_sweeper(interval))
	}

	pub async fn get_application_info(&self) -> ApplicationInfo {
		let dependencies =
			info::resolve_dependencies(self.search_engine.as_ref(), &self.dependencies).await;
		ApplicationInfo {
			version: self.config.platform_version.clone(),
			memory: info::memory_stats(),
			dependencies,
			modules: self.get_modules(),
		}
	}

	pub fn get_modules(&self) -> Vec<PlatformModule> {
		info::platform_modules(&self.config.modules)
	}

	/// The settings singleton with computed flags, read as the system actor
	pub async fn get_settings(&self) -> CvResult<PlatformSettings> {
		let entity = self
			.persistence
			.load_entity(&Actor::system(), ENTITY_TYPE_SETTINGS)
			.await?
			.ok_or(Error::NotFound)?;
		let snapshot = self.capabilities().await;

		Ok(PlatformSettings {
			entity,
			enforce_references: self.config.enforce_references,
			feature_flags: feature_flags::evaluate(&snapshot),
		})
	}

	pub async fn add_settings(&self, actor: &Actor, input: Fields) -> CvResult<Entity> {
		reject_computed_fields(input.keys().map(String::as_str))?;
		let created = self.persistence.create(actor, input, ENTITY_TYPE_SETTINGS).await?;
		info!(id = %created.id, actor_id = %actor.id, "Settings created");

		self.notify(topics::SETTINGS_ADDED, &created, actor).await;
		Ok(created)
	}

	pub async fn edit_field(
		&self,
		actor: &Actor,
		id: &str,
		patches: &[FieldPatch],
	) -> CvResult<Entity> {
		reject_computed_fields(patches.iter().map(|patch| patch.key.as_str()))?;
		let result =
			self.persistence.update_attribute(actor, id, ENTITY_TYPE_SETTINGS, patches).await?;
		debug!(id = %id, actor_id = %actor.id, fields = patches.len(), "Settings updated");

		self.notify(topics::SETTINGS_EDIT, &result.element, actor).await;
		Ok(result.element)
	}

	/// Mark `actor` as editing the settings and tell the other editors
	pub async fn begin_edit(&self, actor: &Actor, id: &str, input: Value) -> CvResult<Entity> {
		if let Err(err) = self.registry.acquire(id, &actor.id, input).await {
			warn!(resource_id = %id, actor_id = %actor.id, "Cannot record edit context: {}", err);
		}
		self.announce_presence(actor, id).await
	}

	/// Counterpart of [`begin_edit`](Self::begin_edit); ending an edit that was never begun is fine
	pub async fn end_edit(&self, actor: &Actor, id: &str) -> CvResult<Entity> {
		if let Err(err) = self.registry.release(id, &actor.id).await {
			warn!(resource_id = %id, actor_id = %actor.id, "Cannot clear edit context: {}", err);
		}
		self.announce_presence(actor, id).await
	}

	/// Actors currently editing `id`, most recent first
	pub async fn edit_context(&self, id: &str) -> CvResult<Vec<Box<str>>> {
		self.registry.query(id).await
	}

	pub async fn subscribe_edits(&self) -> CvResult<EventStream> {
		self.bus.subscribe(topics::SETTINGS_EDIT).await
	}

	pub async fn subscribe_added(&self) -> CvResult<EventStream> {
		self.bus.subscribe(topics::SETTINGS_ADDED).await
	}

	async fn capabilities(&self) -> CapabilitySnapshot {
		CapabilitySnapshot { search_engine: info::detect(self.search_engine.as_ref()).await }
	}

	async fn announce_presence(&self, actor: &Actor, id: &str) -> CvResult<Entity> {
		let entity = self.persistence.load_by_id(actor, id, ENTITY_TYPE_SETTINGS).await?;
		let edit_context = match self.registry.contexts(id).await {
			Ok(contexts) => contexts.into_iter().map(EditUserContext::from).collect(),
			Err(err) => {
				warn!(resource_id = %id, "Cannot list edit contexts: {}", err);
				Vec::new()
			}
		};

		let notification = EditNotification { entity, edit_context };
		self.notify(topics::SETTINGS_EDIT, &notification, actor).await;
		Ok(notification.entity)
	}

	/// Publish on the bus. Delivery is best-effort, failures are only logged.
	async fn notify<T: Serialize>(&self, topic: &str, payload: &T, actor: &Actor) {
		let payload = match serde_json::to_value(payload) {
			Ok(payload) => payload,
			Err(err) => {
				error!(topic = %topic, "Cannot serialize notification: {}", err);
				return;
			}
		};
		match self.bus.publish(topic, payload, actor).await {
			Ok(delivered) => trace!(topic = %topic, delivered, "Notification published"),
			Err(err) => warn!(topic = %topic, "Notification dropped: {}", err),
		}
	}
}

// vim: ts=4
