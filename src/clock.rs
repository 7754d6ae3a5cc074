//! Pluggable time sources for timestamping and duration measurement

use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Instant;

/// A source of wall-clock time and monotonic ticks.
///
/// Wall time stamps results with the moment they were created; ticks are
/// only ever subtracted from each other to measure elapsed time, and their
/// origin is unspecified. The two are deliberately separate: a check's
/// duration must not jump when the system clock is adjusted.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Current wall-clock time in milliseconds since the Unix epoch
    fn wall_time(&self) -> i64;

    /// Current monotonic tick in nanoseconds
    fn tick(&self) -> u64;
}

/// The real clock: wall time from the system clock, ticks from a
/// process-wide monotonic anchor.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

// Instant has no epoch, so ticks are measured from the first use in
// this process.
fn monotonic_anchor() -> Instant {
    static ANCHOR: OnceLock<Instant> = OnceLock::new();
    *ANCHOR.get_or_init(Instant::now)
}

impl Clock for SystemClock {
    fn wall_time(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn tick(&self) -> u64 {
        monotonic_anchor().elapsed().as_nanos() as u64
    }
}

/// A clock under manual control, for deterministic tests.
///
/// Wall time and ticks advance only when told to, and independently of
/// each other.
#[derive(Debug, Default)]
pub struct ManualClock {
    wall_time: AtomicI64,
    tick: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at epoch zero, tick zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock frozen at the given wall time (epoch millis)
    pub fn at(wall_time: i64) -> Self {
        Self {
            wall_time: AtomicI64::new(wall_time),
            tick: AtomicU64::new(0),
        }
    }

    /// Sets the wall time to an absolute epoch-millisecond value
    pub fn set_wall_time(&self, millis: i64) {
        self.wall_time.store(millis, Ordering::SeqCst);
    }

    /// Advances the wall time by the given number of milliseconds
    pub fn advance_wall_time(&self, millis: i64) {
        self.wall_time.fetch_add(millis, Ordering::SeqCst);
    }

    /// Advances the monotonic tick by the given number of nanoseconds
    pub fn advance_tick(&self, nanos: u64) {
        self.tick.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn wall_time(&self) -> i64 {
        self.wall_time.load(Ordering::SeqCst)
    }

    fn tick(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_ticks_are_monotonic() {
        let clock = SystemClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_is_frozen_until_advanced() {
        let clock = ManualClock::at(1_500_000_000_000);
        assert_eq!(clock.wall_time(), 1_500_000_000_000);
        assert_eq!(clock.tick(), 0);

        clock.advance_wall_time(250);
        clock.advance_tick(7_000_000);

        assert_eq!(clock.wall_time(), 1_500_000_000_250);
        assert_eq!(clock.tick(), 7_000_000);
    }

    #[test]
    fn test_manual_clock_wall_and_tick_advance_independently() {
        let clock = ManualClock::new();
        clock.advance_tick(1_000);
        assert_eq!(clock.wall_time(), 0);
        assert_eq!(clock.tick(), 1_000);
    }
}
