//! Low-pulse duration tracking
//!
//! Pairs each falling edge with the next rising edge:
//!
//! ```text
//!  High ───┐          ┌──────┐     ┌───────
//!          │          │      │     │
//!  Low     └──────────┘      └──┐──┘
//!          t0         t1        t2 t3
//!          ◄── d = t1 − t0 ──►
//! ```
//!
//! A Low edge that arrives while a pulse is open (a missed rising edge)
//! abandons the open pulse; the new Low starts over. Unterminated pulses
//! are an expected artifact of sampling a continuous signal, so they are
//! only counted, never reported as errors.

use crate::errors::{SignalError, SignalResult};
use crate::events::{EdgeTransition, Level};
use crate::time::{elapsed_us, Timestamp};

/// Counters kept by the tracker
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrackerStats {
    /// Pulses closed with a valid duration
    pub pulses: u64,
    /// Low edges replaced by a newer Low edge
    pub abandoned: u64,
    /// High edges timestamped before their Low edge
    pub non_monotonic: u64,
    /// High edges with no open pulse
    pub unmatched_highs: u64,
}

/// Turns a totally ordered edge sequence into low-pulse durations
#[derive(Debug, Default, Clone)]
pub struct PulseTracker {
    /// Start of the pulse in flight, if any
    open_low: Option<Timestamp>,
    stats: TrackerStats,
}

impl PulseTracker {
    pub const fn new() -> Self {
        Self {
            open_low: None,
            stats: TrackerStats { pulses: 0, abandoned: 0, non_monotonic: 0, unmatched_highs: 0 },
        }
    }

    /// Feed one edge
    ///
    /// Returns `Ok(Some(duration_us))` when a High edge closes an open
    /// pulse and `Ok(None)` for every other edge.
    pub fn on_edge(&mut self, edge: EdgeTransition) -> SignalResult<Option<u64>> {
        match edge.level {
            Level::Low => {
                if let Some(started_at) = self.open_low.replace(edge.timestamp) {
                    self.stats.abandoned += 1;
                    log_debug!("{}", SignalError::UnterminatedPulse { started_at });
                }
                Ok(None)
            }
            Level::High => {
                let Some(low_at) = self.open_low.take() else {
                    self.stats.unmatched_highs += 1;
                    return Ok(None);
                };

                match elapsed_us(low_at, edge.timestamp) {
                    Some(duration) => {
                        self.stats.pulses += 1;
                        Ok(Some(duration))
                    }
                    None => {
                        self.stats.non_monotonic += 1;
                        Err(SignalError::NonMonotonicEdge { low_at, high_at: edge.timestamp })
                    }
                }
            }
        }
    }

    /// Whether a Low edge is waiting for its High edge
    pub fn is_pulse_open(&self) -> bool {
        self.open_low.is_some()
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// Forget the pulse in flight, keeping statistics
    pub fn reset(&mut self) {
        self.open_low = None;
    }
}
