//! Platform settings facade.
//!
//! Aggregates platform metadata (version, memory, dependency versions,
//! computed feature flags) around the persisted settings singleton, and
//! announces every change to it on the change bus, including who is
//! currently editing.
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): Settings aggregate and application info shapes
//! - **Feature flags** (`feature_flags.rs`): Fixed table of flag predicates
//! - **Info** (`info.rs`): Memory statistics, modules, dependency versions
//! - **Service** (`service.rs`): SettingsService orchestrating all of the above
//! - **Handler** (`handler.rs`): HTTP API endpoints

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod feature_flags;
pub mod handler;
pub mod info;
pub mod prelude;
pub mod service;
pub mod types;

pub use service::{SettingsAdapters, SettingsService};
pub use types::{
	ApplicationInfo, DependencyInfo, FeatureFlag, MemoryStats, PlatformModule, PlatformSettings,
};

// vim: ts=4
