//! Dependency version probes configured from the environment
//!
//! The standalone server has no live connections to its dependencies, so
//! their versions are declared up front:
//!
//! - `CORVID_SEARCH_VERSION`, `CORVID_SEARCH_DISTRIBUTION`
//! - `CORVID_RABBITMQ_VERSION`
//! - `CORVID_REDIS_VERSION`
//!
//! An undeclared version makes the probe fail, which reports the dependency
//! as unknown.

use corvid_types::capability::{CapabilityProbe, StaticProbe, VersionDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

pub const SEARCH_ENGINE: &str = "Search engine";
pub const RABBITMQ: &str = "RabbitMQ";
pub const REDIS: &str = "Redis";

fn probe(vars: &HashMap<String, String>, name: &str, var: &str) -> StaticProbe {
	match vars.get(var).map(|v| v.trim()).filter(|v| !v.is_empty()) {
		Some(number) => StaticProbe::new(name, VersionDescriptor::new(number)),
		None => StaticProbe::unavailable(name, &format!("{} not set", var)),
	}
}

pub fn search_engine(vars: &HashMap<String, String>) -> Arc<dyn CapabilityProbe> {
	let distribution = vars.get("CORVID_SEARCH_DISTRIBUTION").filter(|d| !d.is_empty());
	match (vars.get("CORVID_SEARCH_VERSION").filter(|v| !v.is_empty()), distribution) {
		(Some(number), Some(distribution)) => Arc::new(StaticProbe::new(
			SEARCH_ENGINE,
			VersionDescriptor::new(number.trim()).with_distribution(distribution.trim()),
		)),
		_ => Arc::new(probe(vars, SEARCH_ENGINE, "CORVID_SEARCH_VERSION")),
	}
}

pub fn dependencies(vars: &HashMap<String, String>) -> Vec<Arc<dyn CapabilityProbe>> {
	vec![
		Arc::new(probe(vars, RABBITMQ, "CORVID_RABBITMQ_VERSION")),
		Arc::new(probe(vars, REDIS, "CORVID_REDIS_VERSION")),
	]
}


// vim: ts=4
