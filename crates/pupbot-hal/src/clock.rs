//! Injectable time source.
//!
//! The behavior loop, the gesture delays, and the expression dwell timers
//! all suspend and measure time exclusively through [`Clock`], so tests can
//! substitute [`SimClock`][crate::sim::SimClock] and run the entire
//! controller deterministically without real time passing.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic elapsed-time source and sleeper.
///
/// `elapsed` is measured from an arbitrary per-clock epoch; only
/// differences are meaningful.  Shared as `Arc<dyn Clock>` between the
/// motor channels and the behavior loop.
pub trait Clock: Send + Sync {
    /// Time elapsed since this clock's epoch.  Never decreases.
    fn elapsed(&self) -> Duration;

    /// Suspend the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Production clock backed by [`Instant`] and [`std::thread::sleep`].
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            epoch: Instant::now(),
        })
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Resettable elapsed-time counter over a shared [`Clock`].
///
/// Equivalent of a hand-held stopwatch: [`Stopwatch::time`] reports the
/// time since construction or the last [`Stopwatch::reset`].
pub struct Stopwatch {
    clock: Arc<dyn Clock>,
    started: Duration,
}

impl Stopwatch {
    /// Start a stopwatch at zero.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let started = clock.elapsed();
        Self { clock, started }
    }

    /// Time since the last reset.
    pub fn time(&self) -> Duration {
        self.clock.elapsed() - self.started
    }

    /// Restart the count from zero.
    pub fn reset(&mut self) {
        self.started = self.clock.elapsed();
    }
}
