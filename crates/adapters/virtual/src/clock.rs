//! Manually advanced clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use domotik_app::ports::Clock;
use domotik_domain::time::Millis;

/// Uptime that starts at zero and moves only through [`ManualClock::set`]
/// or [`ManualClock::advance`].
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Millis) {
        self.0.store(now, Ordering::SeqCst);
    }

    /// Move forward by `delta` and return the new uptime.
    pub fn advance(&self, delta: Millis) -> Millis {
        self.0.fetch_add(delta, Ordering::SeqCst).saturating_add(delta)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.0.load(Ordering::SeqCst)
    }
}
