//! Clock abstraction for the bin simulator.
//!
//! A tick's fill increase depends on real elapsed wall-clock time, which
//! makes it irreproducible across runs. Injecting the clock (together with
//! a seeded rng) is what makes simulator behavior deterministic in tests:
//! production uses [`SystemClock`], tests use [`ManualClock`] and advance
//! it explicitly.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// A source of the current UTC time.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time via [`Utc::now`]. The production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test can keep a handle
/// and advance time after handing the clock to a simulator.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a manual clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Advance the clock by `duration` (negative durations move it back).
    pub fn advance(&self, duration: chrono::Duration) {
        self.millis
            .fetch_add(duration.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        // Falls back to the epoch only if the stored millis are out of
        // chrono's representable range, which advance() cannot reach from
        // any sane starting instant.
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_frozen_until_advanced() {
        let clock = ManualClock::new(Utc::now());
        let first = clock.now();
        assert_eq!(clock.now(), first);

        clock.advance(chrono::Duration::seconds(5));
        assert_eq!(
            clock.now().signed_duration_since(first),
            chrono::Duration::seconds(5)
        );
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(Utc::now());
        let handle = clock.clone();
        handle.advance(chrono::Duration::minutes(1));
        assert_eq!(clock.now(), handle.now());
    }
}
