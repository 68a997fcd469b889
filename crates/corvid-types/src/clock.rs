//! Time source abstraction, so expiry can be driven by a simulated clock in tests.

use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::types::Timestamp;

pub trait Clock: Debug + Send + Sync {
	fn now(&self) -> Timestamp;
}

/// Wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Timestamp {
		Timestamp::now()
	}
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
	now: AtomicI64,
}

impl ManualClock {
	pub fn new(start: Timestamp) -> Self {
		Self { now: AtomicI64::new(start.0) }
	}

	pub fn advance(&self, seconds: i64) {
		self.now.fetch_add(seconds, Ordering::SeqCst);
	}

	pub fn set(&self, ts: Timestamp) {
		self.now.store(ts.0, Ordering::SeqCst);
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Timestamp {
		Timestamp(self.now.load(Ordering::SeqCst))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_manual_clock() {
		let clock = ManualClock::new(Timestamp(1000));
		assert_eq!(clock.now(), Timestamp(1000));
		clock.advance(30);
		assert_eq!(clock.now(), Timestamp(1030));
		clock.set(Timestamp(5));
		assert_eq!(clock.now(), Timestamp(5));
	}
}

// vim: ts=4
