//! In-process [`Clock`] backed by the operating system's monotonic clock.

use std::time::Instant;

use domotik_domain::time::Millis;

use crate::ports::Clock;

/// Uptime measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    /// Start counting from now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        Millis::try_from(self.started.elapsed().as_millis()).unwrap_or(Millis::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_near_zero() {
        let clock = SystemClock::start();
        assert!(clock.now_ms() < 1_000);
    }

    #[test]
    fn should_never_go_backwards() {
        let clock = SystemClock::start();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
