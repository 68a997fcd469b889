//! Shared types, adapter traits, and core utilities for the Corvid platform.
//!
//! This crate contains the foundational types that are shared between the
//! settings facade, the edit-presence core and all adapter implementations.
//! Keeping them in a separate crate lets adapter crates compile without
//! pulling in the orchestration layer.

#![forbid(unsafe_code)]

pub mod bus_adapter;
pub mod capability;
pub mod clock;
pub mod error;
pub mod extract;
pub mod persistence_adapter;
pub mod prelude;
pub mod presence_adapter;
pub mod types;

// vim: ts=4
