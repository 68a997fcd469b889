//! Application info: memory, platform modules and dependency versions

use corvid_core::ModulesConfig;
use corvid_types::capability::{CapabilityProbe, VersionDescriptor};
use futures::future::join_all;
use std::sync::Arc;
use sysinfo::{ProcessesToUpdate, System};

use crate::feature_flags;
use crate::prelude::*;
use crate::types::{DependencyInfo, MemoryStats, PlatformModule};

pub const EXPIRATION_SCHEDULER: &str = "EXPIRATION_SCHEDULER";
pub const TASK_MANAGER: &str = "TASK_MANAGER";
pub const RULE_ENGINE: &str = "RULE_ENGINE";
pub const SUBSCRIPTION_MANAGER: &str = "SUBSCRIPTION_MANAGER";
pub const SYNC_MANAGER: &str = "SYNC_MANAGER";

/// Current process and system memory. Unavailable figures are reported as 0.
pub fn memory_stats() -> MemoryStats {
	let mut sys = System::new();
	sys.refresh_memory();

	let pid = sysinfo::get_current_pid()
		.inspect_err(|err| warn!("Cannot determine own pid: {}", err))
		.ok();
	if let Some(pid) = pid {
		sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
	}
	let process = pid.and_then(|pid| sys.process(pid));

	MemoryStats {
		rss: process.map_or(0, sysinfo::Process::memory),
		virtual_memory: process.map_or(0, sysinfo::Process::virtual_memory),
		total_memory: sys.total_memory(),
		used_memory: sys.used_memory(),
		available_memory: sys.available_memory(),
	}
}

pub fn platform_modules(config: &ModulesConfig) -> Vec<PlatformModule> {
	vec![
		PlatformModule { id: EXPIRATION_SCHEDULER, enabled: config.expiration_scheduler },
		PlatformModule { id: TASK_MANAGER, enabled: config.task_manager },
		PlatformModule { id: RULE_ENGINE, enabled: config.rule_engine },
		PlatformModule { id: SUBSCRIPTION_MANAGER, enabled: config.subscription_manager },
		PlatformModule { id: SYNC_MANAGER, enabled: config.sync_manager },
	]
}

/// Ask a probe for its version, logging and swallowing failures
pub async fn detect(probe: &dyn CapabilityProbe) -> Option<VersionDescriptor> {
	probe
		.version()
		.await
		.inspect_err(|err| warn!(dependency = %probe.name(), "Version detection failed: {}", err))
		.ok()
}

/// Search engine descriptor in the `"<distribution> - <number>"` form
pub fn format_search_engine(engine: &VersionDescriptor) -> String {
	format!("{} - {}", feature_flags::distribution(engine), engine.number)
}

/// Resolve the search engine and every other dependency concurrently.
///
/// A failing probe yields `version: None` and does not affect the others.
pub async fn resolve_dependencies(
	search_engine: &dyn CapabilityProbe,
	dependencies: &[Arc<dyn CapabilityProbe>],
) -> Vec<DependencyInfo> {
	let search = async {
		DependencyInfo {
			name: search_engine.name().into(),
			version: detect(search_engine).await.as_ref().map(format_search_engine),
		}
	};
	let others = join_all(dependencies.iter().map(|probe| async move {
		DependencyInfo {
			name: probe.name().into(),
			version: detect(probe.as_ref()).await.map(|v| v.number),
		}
	}));

	let (search, others) = futures::join!(search, others);
	let mut resolved = Vec::with_capacity(others.len() + 1);
	resolved.push(search);
	resolved.extend(others);
	resolved
}


// vim: ts=4
