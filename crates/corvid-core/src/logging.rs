//! Tracing bootstrap

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Install the global fmt subscriber.
///
/// Uses `RUST_LOG` when present. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init() {
	init_with_filter(DEFAULT_FILTER);
}

pub fn init_with_filter(default_filter: &str) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	if tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init().is_err() {
		tracing::debug!("Tracing subscriber already installed");
	}
}

// vim: ts=4
