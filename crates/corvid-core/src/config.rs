//! Settings facade configuration
//!
//! Deserializable from any serde source the host uses, or read from
//! `CORVID_*` environment variables with [`SettingsConfig::from_env`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::prelude::*;

pub const DEFAULT_EDIT_CONTEXT_TTL_SECS: u64 = 300;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_BUS_BUFFER_SIZE: usize = 128;

/// Enablement of the platform's background managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
	pub expiration_scheduler: bool,
	pub task_manager: bool,
	pub rule_engine: bool,
	pub subscription_manager: bool,
	pub sync_manager: bool,
}

impl Default for ModulesConfig {
	fn default() -> Self {
		Self {
			expiration_scheduler: true,
			task_manager: true,
			rule_engine: true,
			subscription_manager: true,
			sync_manager: true,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
	/// Reported platform version
	pub platform_version: Box<str>,
	/// Host-level `enforce_references` switch, merged into every settings read
	pub enforce_references: bool,
	/// Lifetime of an edit context without renewal
	pub edit_context_ttl_secs: u64,
	/// Period of the expired-context sweep, 0 disables it
	pub sweep_interval_secs: u64,
	/// Per-subscriber event buffer of the change bus
	pub bus_buffer_size: usize,
	pub modules: ModulesConfig,
}

impl Default for SettingsConfig {
	fn default() -> Self {
		Self {
			platform_version: env!("CARGO_PKG_VERSION").into(),
			enforce_references: false,
			edit_context_ttl_secs: DEFAULT_EDIT_CONTEXT_TTL_SECS,
			sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
			bus_buffer_size: DEFAULT_BUS_BUFFER_SIZE,
			modules: ModulesConfig::default(),
		}
	}
}

impl SettingsConfig {
	/// Read configuration from the process environment
	pub fn from_env() -> CvResult<Self> {
		Self::from_vars(std::env::vars())
	}

	/// Read configuration from `(name, value)` pairs; unknown names are ignored
	pub fn from_vars<I>(vars: I) -> CvResult<Self>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut config = Self::default();

		for (name, value) in vars {
			let value = value.trim();
			match name.as_str() {
				"CORVID_VERSION" => config.platform_version = value.into(),
				"CORVID_ENFORCE_REFERENCES" => config.enforce_references = parse_bool(&name, value)?,
				"CORVID_EDIT_CONTEXT_TTL" => config.edit_context_ttl_secs = parse_num(&name, value)?,
				"CORVID_SWEEP_INTERVAL" => config.sweep_interval_secs = parse_num(&name, value)?,
				"CORVID_BUS_BUFFER" => config.bus_buffer_size = parse_num(&name, value)?,
				"CORVID_ENABLE_EXPIRATION_SCHEDULER" => {
					config.modules.expiration_scheduler = parse_bool(&name, value)?;
				}
				"CORVID_ENABLE_TASK_MANAGER" => config.modules.task_manager = parse_bool(&name, value)?,
				"CORVID_ENABLE_RULE_ENGINE" => config.modules.rule_engine = parse_bool(&name, value)?,
				"CORVID_ENABLE_SUBSCRIPTION_MANAGER" => {
					config.modules.subscription_manager = parse_bool(&name, value)?;
				}
				"CORVID_ENABLE_SYNC_MANAGER" => config.modules.sync_manager = parse_bool(&name, value)?,
				_ => {}
			}
		}

		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> CvResult<()> {
		if self.edit_context_ttl_secs == 0 {
			return Err(Error::ConfigError("edit context TTL must be positive".into()));
		}
		if self.bus_buffer_size == 0 {
			return Err(Error::ConfigError("bus buffer size must be positive".into()));
		}
		Ok(())
	}

	pub fn edit_context_ttl(&self) -> Duration {
		Duration::from_secs(self.edit_context_ttl_secs)
	}

	/// Sweep period, `None` when sweeping is disabled
	pub fn sweep_interval(&self) -> Option<Duration> {
		(self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
	}
}

fn parse_bool(name: &str, value: &str) -> CvResult<bool> {
	match value.to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(Error::ConfigError(format!("{}: expected a boolean, got '{}'", name, value))),
	}
}

fn parse_num<T: std::str::FromStr>(name: &str, value: &str) -> CvResult<T> {
	value
		.parse()
		.map_err(|_| Error::ConfigError(format!("{}: expected a number, got '{}'", name, value)))
}


// vim: ts=4
