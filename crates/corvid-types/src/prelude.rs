pub use crate::error::{CvResult, Error};
pub use crate::types::{Actor, Timestamp};
pub use tracing::{debug, error, info, trace, warn};

// vim: ts=4
