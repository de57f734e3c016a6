//! Shared fixtures for integration tests
//!
//! - [`SyntheticSensor`]: deterministic PPD42NS-like edge sequences
//! - [`RecordingSink`]: a sink whose contents stay visible after it moves
//!   into a pipeline or a worker thread
//! - [`FlakySink`]: fails every Nth store

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use dustpulse_core::errors::{SinkError, SinkResult};
use dustpulse_core::events::{EdgeTransition, Measurement};
use dustpulse_core::time::Timestamp;
use dustpulse_core::traits::MeasurementSink;

/// Plausible single-pulse widths the sensor produces in normal air
pub const TYPICAL_PULSE_US: (u64, u64) = (10_000, 90_000);

/// Deterministic low-pulse generator
///
/// Produces a strictly ordered Low/High edge sequence and keeps the true
/// low time so tests can compare against what the pipeline accumulated.
pub struct SyntheticSensor {
    now: Timestamp,
    seed: u32,
    low_total_us: u64,
    pulses: usize,
}

impl SyntheticSensor {
    pub fn new(start: Timestamp) -> Self {
        Self { now: start, seed: 42, low_total_us: 0, pulses: 0 }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Linear congruential step, uniform in [lo, hi]
    pub fn uniform(&mut self, lo: u64, hi: u64) -> u64 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        lo + (self.seed as u64) % (hi - lo + 1)
    }

    /// Stay high for `gap_us`, then go low for `duration_us`
    pub fn pulse(&mut self, gap_us: u64, duration_us: u64, out: &mut Vec<EdgeTransition>) {
        self.now += gap_us;
        out.push(EdgeTransition::low(self.now));
        self.now += duration_us;
        out.push(EdgeTransition::high(self.now));
        self.low_total_us += duration_us;
        self.pulses += 1;
    }

    /// Random plausible pulses until the clock passes `until`
    pub fn run_until(&mut self, until: Timestamp, mean_gap_us: u64) -> Vec<EdgeTransition> {
        let mut edges = Vec::new();
        while self.now < until {
            let gap = self.uniform(mean_gap_us / 2, mean_gap_us * 3 / 2);
            let duration = self.uniform(TYPICAL_PULSE_US.0, TYPICAL_PULSE_US.1);
            self.pulse(gap, duration, &mut edges);
        }
        edges
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn low_total_us(&self) -> u64 {
        self.low_total_us
    }

    pub fn pulses(&self) -> usize {
        self.pulses
    }
}

/// Sink that records into shared storage
#[derive(Clone, Default)]
pub struct RecordingSink {
    stored: Arc<Mutex<Vec<Measurement>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurements(&self) -> Vec<Measurement> {
        self.stored.lock().unwrap().clone()
    }
}

impl MeasurementSink for RecordingSink {
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
        self.stored.lock().unwrap().push(*measurement);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Fails every `every`-th store, starting with the first
pub struct FlakySink {
    pub every: u32,
    calls: u32,
    pub inner: RecordingSink,
}

impl FlakySink {
    pub fn new(every: u32) -> Self {
        Self { every, calls: 0, inner: RecordingSink::new() }
    }
}

impl MeasurementSink for FlakySink {
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
        let call = self.calls;
        self.calls += 1;
        if call % self.every == 0 {
            return Err(SinkError::Unavailable { reason: "backend restarting" });
        }
        self.inner.store(measurement)
    }
}
