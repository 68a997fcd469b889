//! Capability detection: version probes for the platform's dependencies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Version reported by a dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDescriptor {
	/// Distribution kind, `None` for the default distribution
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub distribution: Option<String>,
	pub number: String,
}

impl VersionDescriptor {
	pub fn new(number: impl Into<String>) -> Self {
		Self { distribution: None, number: number.into() }
	}

	pub fn with_distribution(mut self, distribution: impl Into<String>) -> Self {
		self.distribution = Some(distribution.into());
		self
	}
}

#[async_trait]
pub trait CapabilityProbe: Send + Sync {
	/// Human-readable dependency name ("Search engine", "Redis", ...)
	fn name(&self) -> &str;

	async fn version(&self) -> CvResult<VersionDescriptor>;
}

/// Probe with a fixed answer, for hosts that know their versions up front
#[derive(Debug, Clone)]
pub struct StaticProbe {
	name: Box<str>,
	result: Result<VersionDescriptor, Box<str>>,
}

impl StaticProbe {
	pub fn new(name: &str, version: VersionDescriptor) -> Self {
		Self { name: name.into(), result: Ok(version) }
	}

	/// Probe that always fails with the given reason
	pub fn unavailable(name: &str, reason: &str) -> Self {
		Self { name: name.into(), result: Err(reason.into()) }
	}
}

#[async_trait]
impl CapabilityProbe for StaticProbe {
	fn name(&self) -> &str {
		&self.name
	}

	async fn version(&self) -> CvResult<VersionDescriptor> {
		self.result.clone().map_err(|reason| Error::CapabilityError(format!("{}: {}", self.name, reason)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_static_probe() {
		let probe = StaticProbe::new("Redis", VersionDescriptor::new("7.2.4"));
		assert_eq!(probe.name(), "Redis");
		assert_eq!(probe.version().await.unwrap().number, "7.2.4");

		let probe = StaticProbe::unavailable("RabbitMQ", "connection refused");
		assert!(matches!(probe.version().await, Err(Error::CapabilityError(_))));
	}
}

// vim: ts=4
