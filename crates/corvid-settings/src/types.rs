//! Settings aggregate and application info types

use corvid_types::presence_adapter::EditContext;
use corvid_types::types::Entity;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Names filled in by the service on every read or notification. They never
/// reach persistence, so the flattened entity cannot shadow them.
pub const COMPUTED_FIELDS: [&str; 3] = ["enforce_references", "feature_flags", "edit_context"];

/// Capability toggle computed from live environment detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlag {
	pub id: Box<str>,
	pub enabled: bool,
}

/// The settings singleton as returned to readers.
///
/// `enforce_references` and `feature_flags` are computed on every read and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformSettings {
	#[serde(flatten)]
	pub entity: Entity,
	pub enforce_references: bool,
	pub feature_flags: Vec<FeatureFlag>,
}

impl PlatformSettings {
	pub fn feature_flag(&self, id: &str) -> Option<&FeatureFlag> {
		self.feature_flags.iter().find(|flag| flag.id.as_ref() == id)
	}
}

/// One actor editing a resource, as shown to other editors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditUserContext {
	pub actor_id: Box<str>,
	pub input: Value,
}

impl From<EditContext> for EditUserContext {
	fn from(ctx: EditContext) -> Self {
		Self { actor_id: ctx.actor_id, input: ctx.input }
	}
}

/// Payload of presence notifications: fresh entity data plus current editors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditNotification {
	#[serde(flatten)]
	pub entity: Entity,
	pub edit_context: Vec<EditUserContext>,
}

/// Background manager and whether it runs on this platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformModule {
	pub id: &'static str,
	pub enabled: bool,
}

/// Process and system memory, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
	/// Resident set size of this process
	pub rss: u64,
	pub virtual_memory: u64,
	pub total_memory: u64,
	pub used_memory: u64,
	pub available_memory: u64,
}

/// A platform dependency and its detected version (`None` when unknown)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyInfo {
	pub name: Box<str>,
	pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationInfo {
	pub version: Box<str>,
	pub memory: MemoryStats,
	pub dependencies: Vec<DependencyInfo>,
	pub modules: Vec<PlatformModule>,
}

// vim: ts=4
