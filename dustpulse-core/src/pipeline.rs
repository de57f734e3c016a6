//! Edge-to-Measurement Pipeline
//!
//! ## Overview
//!
//! [`PulsePipeline`] wires the stages together and owns every piece of
//! mutable state: the open pulse, the sampling window and the sink.
//!
//! ```text
//! Level ──► stamp(clock) ──► PulseTracker ──► PlausibilityFilter
//!                                                  │
//!                 MeasurementSink ◄── Derivation ◄─┴─ WindowController
//! ```
//!
//! Each edge runs to completion before the next one is accepted. No stage
//! blocks except the sink, which is why slow sinks belong behind a
//! [`SinkWorker`](crate::sink::SinkWorker).
//!
//! ## Timestamps
//!
//! [`on_transition`](PulsePipeline::on_transition) reads the pipeline's own
//! clock at call time; this is the entry point for interrupt handlers.
//! [`process`](PulsePipeline::process) takes an edge that already carries a
//! timestamp, for replay and for edge queues that stamp at capture time.
//!
//! ## Failure Semantics
//!
//! A sink failure is returned to the caller together with the lost
//! measurement. The window has already been reset at that point and is not
//! rolled back; the next window is running.
//!
//! ## Example
//!
//! ```rust
//! use dustpulse_core::{MonitorConfig, PulsePipeline, EdgeTransition, Step};
//! use dustpulse_core::sink::MemorySink;
//! use dustpulse_core::time::FixedTime;
//!
//! let clock = FixedTime::new(0);
//! let config = MonitorConfig::default().with_window_length_ms(1_000);
//! let mut pipeline = PulsePipeline::new(&config, &clock, MemorySink::new());
//!
//! pipeline.process(EdgeTransition::low(100_000))?;
//! pipeline.process(EdgeTransition::high(130_000))?;
//! pipeline.process(EdgeTransition::low(1_050_000))?;
//! let step = pipeline.process(EdgeTransition::high(1_070_000))?;
//!
//! assert!(matches!(step, Step::Measured(_)));
//! assert_eq!(pipeline.sink().measurements().len(), 1);
//! # Ok::<(), dustpulse_core::PipelineError>(())
//! ```

use crate::config::MonitorConfig;
use crate::errors::{PipelineError, PipelineResult, SignalError};
use crate::events::{EdgeTransition, Level, PulseReport};
use crate::pulse::{PulseTracker, TrackerStats};
use crate::time::{TimeSource, Timestamp};
use crate::traits::{MeasurementSink, Stream};
use crate::validators::{Plausibility, PlausibilityFilter};
use crate::window::{ClosedWindow, WindowController};

/// What one edge did to the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Edge consumed, no pulse completed
    Edge,
    /// Edge could not be paired into a pulse
    Discarded(SignalError),
    /// A pulse completed and was accumulated
    Pulse(PulseReport),
    /// A pulse closed the window and the measurement was stored
    Measured(ClosedWindow),
}

/// Running totals across all windows
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub edges: u64,
    pub implausible_pulses: u64,
    pub measurements: u64,
    pub sink_failures: u64,
    pub tracker: TrackerStats,
}

/// Consistent view of the window in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub started_at: Timestamp,
    pub elapsed_us: u64,
    pub accumulated_low_us: u64,
    pub pulses: u32,
    pub pulse_open: bool,
}

/// Failure while draining an edge stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrainError<E> {
    /// The stream reported an error or ended
    Stream(E),
    /// Storing a measurement failed; draining can resume
    Pipeline(PipelineError),
}

/// Single-owner pipeline from edges to stored measurements
pub struct PulsePipeline<C, S> {
    clock: C,
    tracker: PulseTracker,
    filter: PlausibilityFilter,
    controller: WindowController,
    sink: S,
    stats: PipelineStats,
}

impl<C: TimeSource, S: MeasurementSink> PulsePipeline<C, S> {
    /// Build a pipeline whose first window starts now
    ///
    /// `config` is assumed valid; call [`MonitorConfig::validate`] first
    /// when it comes from outside.
    pub fn new(config: &MonitorConfig, clock: C, sink: S) -> Self {
        let start = clock.now();
        Self {
            clock,
            tracker: PulseTracker::new(),
            filter: config.plausibility_filter(),
            controller: WindowController::new(start, config.window_length_ms, config.derivation()),
            sink,
            stats: PipelineStats::default(),
        }
    }

    /// Interrupt entry point: stamp the edge with the current time
    pub fn on_transition(&mut self, level: Level) -> PipelineResult<Step> {
        let edge = EdgeTransition::new(level, self.clock.now());
        self.process(edge)
    }

    /// Run one timestamped edge through every stage
    pub fn process(&mut self, edge: EdgeTransition) -> PipelineResult<Step> {
        self.stats.edges += 1;

        let duration_us = match self.tracker.on_edge(edge) {
            Ok(Some(duration)) => duration,
            Ok(None) => return Ok(Step::Edge),
            Err(err) => {
                log_warn!("Discarding pulse: {}", err);
                return Ok(Step::Discarded(err));
            }
        };

        let plausibility = self.filter.inspect(duration_us);
        if plausibility != Plausibility::InRange {
            self.stats.implausible_pulses += 1;
        }

        let pulse = PulseReport { duration_us, ended_at: edge.timestamp, plausibility };
        let Some(closed) = self.controller.on_pulse(&pulse) else {
            return Ok(Step::Pulse(pulse));
        };

        self.stats.measurements += 1;
        let m = closed.measurement;
        log_info!(
            "{:.2} pcs/0.01cf, {:.2} ug/m3, {} AQI ({} pulses, {:.3}% low)",
            m.concentration_pcs,
            m.concentration_ugm3,
            m.aqi,
            closed.summary.pulses,
            closed.summary.ratio
        );

        match self.sink.store(&m) {
            Ok(()) => Ok(Step::Measured(closed)),
            Err(error) => {
                self.stats.sink_failures += 1;
                log_warn!("{} failed to store measurement: {}", self.sink.name(), error);
                Err(PipelineError::Sink { measurement: m, error })
            }
        }
    }

    /// Process every edge the stream has ready
    ///
    /// Returns the number of edges processed once the stream would block.
    /// A sink failure stops the drain early; calling again resumes with the
    /// next edge.
    pub fn drain<St>(&mut self, stream: &mut St) -> Result<usize, DrainError<St::Error>>
    where
        St: Stream<Item = EdgeTransition>,
    {
        let mut processed = 0;
        loop {
            match stream.poll_next() {
                Ok(edge) => {
                    processed += 1;
                    self.process(edge).map_err(DrainError::Pipeline)?;
                }
                Err(nb::Error::WouldBlock) => return Ok(processed),
                Err(nb::Error::Other(e)) => return Err(DrainError::Stream(e)),
            }
        }
    }

    /// Read the window in progress without disturbing it
    pub fn snapshot(&self) -> WindowSnapshot {
        let window = self.controller.window();
        WindowSnapshot {
            started_at: window.start(),
            elapsed_us: self.clock.now().saturating_sub(window.start()),
            accumulated_low_us: window.accumulated_low_us(),
            pulses: window.pulses(),
            pulse_open: self.tracker.is_pulse_open(),
        }
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats { tracker: self.tracker.stats(), ..self.stats }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Stop consuming edges and hand back the sink
    ///
    /// The partial window is discarded.
    pub fn finish(self) -> S {
        if self.controller.window().pulses() > 0 {
            log_debug!(
                "Discarding partial window with {} pulses",
                self.controller.window().pulses()
            );
        }
        self.sink
    }
}
