//! Time Source Abstraction for Edge Timestamping
//!
//! This module provides the `TimeSource` trait which abstracts the clock the
//! pipeline reads when an edge is delivered.
//!
//! ## Design Goals
//!
//! - **Platform Independence**: Works on bare metal, RTOS, and Linux
//! - **Testability**: Easy to drive deterministically
//! - **Resolution**: Microseconds, since low pulses are tens of milliseconds wide
//!
//! ## Common Implementations
//!
//! - `MonotonicClock`: `std::time::Instant` based
//! - `FixedTime`: Controllable time for testing and replay
//! - Hardware timers via [`ExtendedTimer`](crate::time::ExtendedTimer)

use crate::time::Timestamp;

/// Source of time for edge timestamps
///
/// Pulse durations are differences between two readings of the same
/// source, so `now()` must be monotonic. Wall clocks that can be stepped by
/// NTP are a poor choice; the tracker will report such steps as
/// [`NonMonotonicEdge`](crate::errors::SignalError::NonMonotonicEdge).
///
/// ## Example Implementation
///
/// ```rust
/// use core::cell::Cell;
/// use dustpulse_core::traits::TimeSource;
/// use dustpulse_core::time::{ExtendedTimer, Timestamp};
///
/// struct HwTimer {
///     // 32-bit free-running microsecond counter
///     raw: fn() -> u32,
///     wide: Cell<ExtendedTimer>,
/// }
///
/// impl TimeSource for HwTimer {
///     fn now(&self) -> Timestamp {
///         let mut wide = self.wide.get();
///         let ts = wide.extend((self.raw)());
///         self.wide.set(wide);
///         ts
///     }
///
///     fn is_wall_clock(&self) -> bool {
///         false
///     }
///
///     fn precision_us(&self) -> u32 {
///         1
///     }
/// }
/// ```
pub trait TimeSource {
    /// Current timestamp in microseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;

    /// Smallest difference this source can resolve, in microseconds
    fn precision_us(&self) -> u32;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }

    fn precision_us(&self) -> u32 {
        (**self).precision_us()
    }
}

#[cfg(feature = "std")]
impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }

    fn precision_us(&self) -> u32 {
        (**self).precision_us()
    }
}
