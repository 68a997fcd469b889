//! Common types used throughout the Corvid platform.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::SystemTime;

/// Entity type of the platform settings singleton
pub const ENTITY_TYPE_SETTINGS: &str = "Settings";

/// Open schema of named, persisted fields
pub type Fields = serde_json::Map<String, Value>;

// Timestamp //
//***********//
/// Seconds since the Unix epoch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
	}

	pub fn add_seconds(&self, seconds: i64) -> Timestamp {
		Timestamp(self.0.saturating_add(seconds))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

// Actor //
//*******//
/// The identity on whose behalf an operation runs. Supplied by the host's auth layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
	pub id: Box<str>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<Box<str>>,
}

impl Actor {
	pub const SYSTEM_ID: &'static str = "system";

	pub fn new(id: &str) -> Actor {
		Actor { id: Box::from(id), name: None }
	}

	pub fn with_name(mut self, name: &str) -> Actor {
		self.name = Some(Box::from(name));
		self
	}

	/// Internal identity used for platform-level reads
	pub fn system() -> Actor {
		Actor::new(Self::SYSTEM_ID).with_name("SYSTEM")
	}
}

// Entity //
//********//
/// A persisted entity: identity plus an open map of fields
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
	pub id: Box<str>,
	pub entity_type: Box<str>,
	#[serde(flatten)]
	pub fields: Fields,
}

impl Entity {
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.fields.get(key)
	}
}

// FieldPatch //
//************//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOperation {
	#[default]
	Replace,
	Add,
	Remove,
}

/// A single field update request handed to the persistence layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldPatch {
	#[serde(alias = "field")]
	pub key: String,
	pub value: Value,
	#[serde(default)]
	pub operation: EditOperation,
}

impl FieldPatch {
	pub fn replace(key: impl Into<String>, value: Value) -> Self {
		Self { key: key.into(), value, operation: EditOperation::Replace }
	}
}

// ApiResponse //
//*************//
/// Envelope of every successful HTTP response
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
	pub data: T,
	pub time: Timestamp,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, time: Timestamp::now() }
	}
}


// vim: ts=4
