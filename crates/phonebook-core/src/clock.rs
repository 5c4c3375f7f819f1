//! Injectable clock for the info-page timestamp
//!
//! Production code uses `SystemClock`; tests use `SimulatedClock` so the
//! reported timestamp can be pinned and asserted on exactly.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

/// A clock that provides the current time
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that returns real system time
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Simulated clock for tests. Starts at a fixed point and only moves when
/// advanced or set programmatically.
#[derive(Clone)]
pub struct SimulatedClock {
    current_time: Arc<RwLock<DateTime<Utc>>>,
}

impl SimulatedClock {
    /// Create a new simulated clock starting at the current real time
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Create a new simulated clock starting at a specific time
    pub fn starting_at(time: DateTime<Utc>) -> Self {
        Self {
            current_time: Arc::new(RwLock::new(time)),
        }
    }

    /// Advance the clock by a duration
    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.write();
        *time += duration;
    }

    /// Set the clock to a specific time
    pub fn set(&self, time: DateTime<Utc>) {
        *self.current_time.write() = time;
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current_time.read()
    }
}
