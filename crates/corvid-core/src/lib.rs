//! Core infrastructure for the Corvid platform.
//!
//! Holds the pieces with real concurrency concerns: the edit context
//! registry (who is editing what, with TTL expiry) and the change bus
//! (topic fan-out to live subscribers), plus configuration and logging
//! bootstrap shared by the settings facade and the server binary.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod change_bus;
pub mod config;
pub mod edit_context;
pub mod logging;
pub mod prelude;

pub use change_bus::{BusConfig, ChangeBus};
pub use config::{ModulesConfig, SettingsConfig};
pub use edit_context::EditContextRegistry;

// vim: ts=4
