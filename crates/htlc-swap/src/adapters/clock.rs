//! Clock adapters.

use crate::domain::Timestamp;
use crate::ports::Clock;
use parking_lot::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time in seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            // Clock before the epoch reads as 0 rather than panicking
            .unwrap_or_default()
    }
}

/// Host-controlled clock for tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    current: RwLock<Timestamp>,
}

impl ManualClock {
    /// Clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: RwLock::new(start),
        }
    }

    /// Jump to an absolute time.
    pub fn set_time(&self, time: Timestamp) {
        *self.current.write() = time;
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: u64) {
        let mut current = self.current.write();
        *current = current.saturating_add(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.read()
    }
}
