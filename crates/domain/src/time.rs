//! Uptime timestamps.
//!
//! The controller has no wall clock: every timestamp is the number of
//! milliseconds elapsed since the process started, as reported by the
//! `Clock` port in the `app` crate.

/// Milliseconds of process uptime.
pub type Millis = u64;

/// Milliseconds elapsed from `since` to `now`, saturating at zero.
#[must_use]
pub fn elapsed(now: Millis, since: Millis) -> Millis {
    now.saturating_sub(since)
}
