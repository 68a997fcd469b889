//! Feature flags
//!
//! Flags are a fixed table of `(id, predicate)` pairs evaluated against a
//! capability snapshot on every read. Predicates are pure and total: a
//! missing or unexpected engine, or an unparseable version, yields `false`.
//! Adding a flag means adding a row.

use corvid_types::capability::VersionDescriptor;
use semver::{Version, VersionReq};

use crate::types::FeatureFlag;

/// Search engine distribution assumed when none is reported
pub const DEFAULT_DISTRIBUTION: &str = "elk";

pub const RUNTIME_SORTING: &str = "RUNTIME_SORTING";

/// Detected capabilities the flag predicates look at
#[derive(Debug, Clone, Default)]
pub struct CapabilitySnapshot {
	/// `None` when detection failed
	pub search_engine: Option<VersionDescriptor>,
}

pub type FlagPredicate = fn(&CapabilitySnapshot) -> bool;

pub const FEATURE_FLAGS: &[(&str, FlagPredicate)] = &[(RUNTIME_SORTING, runtime_sorting)];

/// Evaluate every flag of the table, in table order
pub fn evaluate(snapshot: &CapabilitySnapshot) -> Vec<FeatureFlag> {
	FEATURE_FLAGS
		.iter()
		.map(|(id, predicate)| FeatureFlag { id: (*id).into(), enabled: predicate(snapshot) })
		.collect()
}

/// Distribution of a search engine, falling back to the default kind
pub fn distribution(engine: &VersionDescriptor) -> &str {
	engine.distribution.as_deref().filter(|d| !d.is_empty()).unwrap_or(DEFAULT_DISTRIBUTION)
}

/// Whether `version` satisfies the semver `range`; anything unparseable is `false`
pub fn version_satisfies(version: &str, range: &str) -> bool {
	match (Version::parse(version.trim()), VersionReq::parse(range)) {
		(Ok(version), Ok(req)) => req.matches(&version),
		_ => false,
	}
}

fn runtime_sorting(snapshot: &CapabilitySnapshot) -> bool {
	snapshot.search_engine.as_ref().is_some_and(|engine| {
		distribution(engine) == DEFAULT_DISTRIBUTION && version_satisfies(&engine.number, ">=7.12.0")
	})
}


// vim: ts=4
