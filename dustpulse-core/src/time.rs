//! Time management for edge timestamping
//!
//! Low pulses from a PPD42NS are 10-90ms wide, so the clock needs
//! microsecond resolution. All timestamps are `u64` microseconds on a
//! monotonic timeline:
//! - `MonotonicClock` (std): `std::time::Instant` anchored at construction
//! - `FixedTime`: settable clock for tests and replay (targets with 64-bit atomics)
//! - `ExtendedTimer`: widens a wrapping 32-bit hardware counter

#[cfg(target_has_atomic = "64")]
use core::sync::atomic::{AtomicU64, Ordering};

pub use crate::traits::time::TimeSource;

/// Timestamp in microseconds since an arbitrary monotonic origin
pub type Timestamp = u64;

/// Elapsed microseconds from `earlier` to `later`
///
/// Returns `None` when `later` precedes `earlier` rather than wrapping.
pub fn elapsed_us(earlier: Timestamp, later: Timestamp) -> Option<u64> {
    later.checked_sub(earlier)
}

/// Monotonic clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        // u64 micros overflow after ~584k years
        self.origin.elapsed().as_micros() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_us(&self) -> u32 {
        1
    }
}

/// Settable time source for testing and replay
///
/// Interior mutability lets a test hold `&FixedTime` while the pipeline
/// borrows the same clock.
#[cfg(target_has_atomic = "64")]
#[derive(Debug, Default)]
pub struct FixedTime {
    timestamp: AtomicU64,
}

#[cfg(target_has_atomic = "64")]
impl FixedTime {
    pub const fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: AtomicU64::new(timestamp) }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.store(timestamp, Ordering::Release);
    }

    pub fn advance(&self, us: u64) {
        self.timestamp.fetch_add(us, Ordering::AcqRel);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(ms * crate::constants::time::US_PER_MS);
    }
}

#[cfg(target_has_atomic = "64")]
impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.load(Ordering::Acquire)
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_us(&self) -> u32 {
        1
    }
}

/// Widens a free-running 32-bit microsecond counter into [`Timestamp`]
///
/// MCU timers such as the ESP32 `esp_timer` low word or a Cortex-M cycle
/// counter scaled to microseconds wrap every 2^32 us (~71.6 minutes). Feed
/// every raw reading through [`extend`](Self::extend); as long as readings
/// are taken at least once per wrap period the result never goes backwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendedTimer {
    last_raw: u32,
    epochs: u64,
}

impl ExtendedTimer {
    pub const fn new() -> Self {
        Self { last_raw: 0, epochs: 0 }
    }

    /// Convert a raw counter value into a monotonic timestamp
    pub fn extend(&mut self, raw: u32) -> Timestamp {
        if raw < self.last_raw {
            self.epochs += 1;
        }
        self.last_raw = raw;
        (self.epochs << 32) | raw as u64
    }

    /// Number of counter wraps observed so far
    pub fn wraps(&self) -> u64 {
        self.epochs
    }
}
