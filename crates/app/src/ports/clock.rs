//! Clock port — the only source of time for the control core.

use domotik_domain::time::Millis;

/// Monotonic process uptime.
///
/// Sensors and actuators never read time themselves; the controller samples
/// the clock once per tick and passes `now` down.
pub trait Clock {
    /// Milliseconds elapsed since the process started.
    fn now_ms(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}
