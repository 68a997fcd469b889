pub use corvid_types::prelude::*;

// vim: ts=4
