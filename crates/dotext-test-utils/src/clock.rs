use std::sync::Arc;

use dotext_core::time::Clock;
use parking_lot::Mutex;

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can hand one clone to the code
/// under test and keep another to advance it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Arc::new(Mutex::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        *self.now.lock() = ms;
    }

    /// Move time forward and return the new timestamp.
    pub fn advance(&self, ms: f64) -> f64 {
        let mut now = self.now.lock();
        *now += ms;
        *now
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock()
    }
}
