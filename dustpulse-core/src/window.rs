//! Sampling window and its controller
//!
//! ## State Machine
//!
//! ```text
//!            accumulate(d)            now − start > length
//!   ┌──────────────┐ ◄──────┐   ┌──────────────────────────┐
//!   │ Accumulating │────────┘   │ Closing (transient)      │
//!   │              │ ─────────► │ read → derive → reset    │
//!   └──────────────┘ ◄───────── └──────────────────────────┘
//! ```
//!
//! Closure is checked opportunistically on each pulse, not on a fixed
//! schedule. There is no timer tick: the check runs right after every
//! accumulated pulse, so a window closes on the first pulse that ends after
//! its deadline. Closure latency is therefore bounded by the gap between
//! pulses, and a silent sensor never closes a window.
//!
//! The read-derive-reset sequence happens inside one `&mut self` call, so
//! no caller ever sees a half-reset window. When the window is shared
//! across threads, the lock around the controller makes accumulation and
//! closure one critical section (see [`SharedMonitor`](crate::shared::SharedMonitor)).

use crate::constants::time::US_PER_MS;
use crate::derivation::{low_pulse_ratio, Derivation};
use crate::events::{Measurement, PulseReport};
use crate::time::Timestamp;
use crate::validators::Plausibility;

/// Occupancy accumulated since the window started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingWindow {
    start: Timestamp,
    accumulated_low_us: u64,
    length_ms: u64,
    pulses: u32,
    implausible: u32,
}

impl SamplingWindow {
    pub fn new(start: Timestamp, length_ms: u64) -> Self {
        Self {
            start,
            accumulated_low_us: 0,
            length_ms,
            pulses: 0,
            implausible: 0,
        }
    }

    /// Add one low-pulse duration
    pub fn accumulate(&mut self, duration_us: u64) {
        self.accumulated_low_us = self.accumulated_low_us.saturating_add(duration_us);
        self.pulses = self.pulses.saturating_add(1);
    }

    /// Whether `now` is strictly past the end of the window
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.saturating_sub(self.start) > self.length_ms.saturating_mul(US_PER_MS)
    }

    /// Start a fresh window at `now`, returning the old contents
    fn restart(&mut self, now: Timestamp) -> SamplingWindow {
        core::mem::replace(self, SamplingWindow::new(now, self.length_ms))
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn accumulated_low_us(&self) -> u64 {
        self.accumulated_low_us
    }

    pub fn length_ms(&self) -> u64 {
        self.length_ms
    }

    pub fn pulses(&self) -> u32 {
        self.pulses
    }
}

/// Bookkeeping for one closed window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSummary {
    pub started_at: Timestamp,
    pub closed_at: Timestamp,
    pub accumulated_low_us: u64,
    pub length_ms: u64,
    /// Low-time percentage fed to the calibration curve
    pub ratio: f64,
    pub pulses: u32,
    pub implausible_pulses: u32,
}

/// A closed window and what was derived from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedWindow {
    pub measurement: Measurement,
    pub summary: WindowSummary,
}

/// Owns the current window and closes it when it expires
#[derive(Debug, Clone)]
pub struct WindowController {
    window: SamplingWindow,
    derivation: Derivation,
    closed: u64,
}

impl WindowController {
    pub fn new(start: Timestamp, length_ms: u64, derivation: Derivation) -> Self {
        Self {
            window: SamplingWindow::new(start, length_ms),
            derivation,
            closed: 0,
        }
    }

    /// Accumulate one pulse and close the window if it has expired
    ///
    /// `pulse.ended_at` is the "now" the expiry check uses. Out-of-range
    /// pulses are accumulated like any other.
    pub fn on_pulse(&mut self, pulse: &PulseReport) -> Option<ClosedWindow> {
        self.window.accumulate(pulse.duration_us);
        if pulse.plausibility != Plausibility::InRange {
            self.window.implausible = self.window.implausible.saturating_add(1);
        }

        if self.window.is_expired(pulse.ended_at) {
            Some(self.close(pulse.ended_at))
        } else {
            None
        }
    }

    fn close(&mut self, now: Timestamp) -> ClosedWindow {
        let measurement = self
            .derivation
            .derive(self.window.accumulated_low_us, self.window.length_ms);

        // Reset strictly after derivation
        let finished = self.window.restart(now);
        self.closed += 1;

        let summary = WindowSummary {
            started_at: finished.start,
            closed_at: now,
            accumulated_low_us: finished.accumulated_low_us,
            length_ms: finished.length_ms,
            ratio: low_pulse_ratio(finished.accumulated_low_us, finished.length_ms),
            pulses: finished.pulses,
            implausible_pulses: finished.implausible,
        };

        ClosedWindow { measurement, summary }
    }

    pub fn window(&self) -> &SamplingWindow {
        &self.window
    }

    /// Windows closed since construction
    pub fn closed_windows(&self) -> u64 {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse(duration_us: u64, ended_at: Timestamp) -> PulseReport {
        PulseReport { duration_us, ended_at, plausibility: Plausibility::InRange }
    }

    #[test]
    fn accumulates_until_expiry() {
        let mut ctl = WindowController::new(0, 1_000, Derivation::default());

        assert!(ctl.on_pulse(&pulse(20_000, 100_000)).is_none());
        assert!(ctl.on_pulse(&pulse(30_000, 500_000)).is_none());
        assert_eq!(ctl.window().accumulated_low_us(), 50_000);
        assert_eq!(ctl.window().pulses(), 2);
    }

    #[test]
    fn expiry_is_strict() {
        let window = SamplingWindow::new(0, 1_000);
        assert!(!window.is_expired(1_000_000));
        assert!(window.is_expired(1_000_001));
    }

    #[test]
    fn closure_resets_atomically() {
        let mut ctl = WindowController::new(0, 1_000, Derivation::default());

        ctl.on_pulse(&pulse(40_000, 600_000));
        let closed = ctl.on_pulse(&pulse(60_000, 1_200_000)).expect("window should close");

        // Closing pulse counts toward the closed window
        assert_eq!(closed.summary.accumulated_low_us, 100_000);
        assert_eq!(closed.summary.pulses, 2);
        assert_eq!(closed.summary.started_at, 0);
        assert_eq!(closed.summary.closed_at, 1_200_000);

        assert_eq!(ctl.window().accumulated_low_us(), 0);
        assert_eq!(ctl.window().start(), 1_200_000);
        assert_eq!(ctl.closed_windows(), 1);
    }

    #[test]
    fn start_only_moves_on_closure() {
        let mut ctl = WindowController::new(250_000, 1_000, Derivation::default());

        for ended_at in [400_000, 900_000, 1_250_000] {
            assert!(ctl.on_pulse(&pulse(10_000, ended_at)).is_none());
            assert_eq!(ctl.window().start(), 250_000);
        }

        assert!(ctl.on_pulse(&pulse(10_000, 1_250_001)).is_some());
        assert_eq!(ctl.window().start(), 1_250_001);
        assert_eq!(ctl.window().pulses(), 0);
    }

    #[test]
    fn one_closure_per_interval() {
        let mut ctl = WindowController::new(0, 1_000, Derivation::default());
        let mut closures = 0;

        // A 10ms pulse every 101ms for 5.05 seconds
        for i in 1..=50u64 {
            if ctl.on_pulse(&pulse(10_000, i * 101_000)).is_some() {
                closures += 1;
            }
        }

        // Closes on pulses 10, 20, 30, 40 and 50
        assert_eq!(closures, 5);
    }

    #[test]
    fn implausible_pulses_still_count() {
        let mut ctl = WindowController::new(0, 1_000, Derivation::default());
        let short = PulseReport { duration_us: 5_000, ended_at: 10_000, plausibility: Plausibility::TooShort };

        ctl.on_pulse(&short);
        let closed = ctl.on_pulse(&pulse(20_000, 2_000_000)).unwrap();

        assert_eq!(closed.summary.accumulated_low_us, 25_000);
        assert_eq!(closed.summary.implausible_pulses, 1);
    }

    #[test]
    fn measurement_matches_derivation() {
        let mut ctl = WindowController::new(0, 30_000, Derivation::default());

        ctl.on_pulse(&pulse(4_500_000, 10_000_000));
        let closed = ctl.on_pulse(&pulse(0, 30_000_001)).unwrap();

        assert_eq!(closed.summary.ratio, 15.0);
        assert_eq!(closed.measurement, Derivation::default().derive(4_500_000, 30_000));
    }
}
