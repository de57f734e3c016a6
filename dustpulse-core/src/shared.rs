//! Pipeline shared between an edge thread and observers
//!
//! On a hosted system the GPIO monitor usually runs on its own thread while
//! something else (a status endpoint, a watchdog) wants to look at the
//! window in progress. [`SharedMonitor`] puts the whole pipeline behind one
//! mutex:
//!
//! - accumulation and window closure for an edge happen under a single
//!   lock acquisition, so closure and the next accumulation never interleave
//! - [`health`](SharedMonitor::health) reads every field under that same
//!   lock, so it never sees a window that is half reset
//!
//! The sink runs while the lock is held. Put slow sinks behind a
//! [`SinkWorker`](crate::sink::SinkWorker).

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::MonitorConfig;
use crate::errors::PipelineResult;
use crate::events::{EdgeTransition, Level};
use crate::pipeline::{PipelineStats, PulsePipeline, Step, WindowSnapshot};
use crate::time::TimeSource;
use crate::traits::MeasurementSink;

/// Consistent view of a running monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub window: WindowSnapshot,
    pub stats: PipelineStats,
}

/// Cloneable handle to a mutex-guarded [`PulsePipeline`]
///
/// ```rust
/// use dustpulse_core::{MonitorConfig, Level};
/// use dustpulse_core::shared::SharedMonitor;
/// use dustpulse_core::sink::LogSink;
/// use dustpulse_core::time::MonotonicClock;
///
/// let monitor = SharedMonitor::new(&MonitorConfig::default(), MonotonicClock::new(), LogSink::new());
///
/// let edges = monitor.clone();
/// std::thread::spawn(move || {
///     let _ = edges.on_transition(Level::Low);
///     let _ = edges.on_transition(Level::High);
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(monitor.health().stats.edges, 2);
/// ```
pub struct SharedMonitor<C, S> {
    inner: Arc<Mutex<PulsePipeline<C, S>>>,
}

impl<C, S> Clone for SharedMonitor<C, S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: TimeSource, S: MeasurementSink> SharedMonitor<C, S> {
    pub fn new(config: &MonitorConfig, clock: C, sink: S) -> Self {
        Self::from_pipeline(PulsePipeline::new(config, clock, sink))
    }

    pub fn from_pipeline(pipeline: PulsePipeline<C, S>) -> Self {
        Self { inner: Arc::new(Mutex::new(pipeline)) }
    }

    /// Edge callback; stamps the edge after taking the lock
    pub fn on_transition(&self, level: Level) -> PipelineResult<Step> {
        self.lock().on_transition(level)
    }

    pub fn process(&self, edge: EdgeTransition) -> PipelineResult<Step> {
        self.lock().process(edge)
    }

    /// Snapshot of the window and totals, taken atomically
    pub fn health(&self) -> Health {
        let pipeline = self.lock();
        Health { window: pipeline.snapshot(), stats: pipeline.stats() }
    }

    /// Run `f` with exclusive access to the pipeline
    pub fn with_pipeline<R>(&self, f: impl FnOnce(&mut PulsePipeline<C, S>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Take the pipeline back if this is the last handle
    ///
    /// Returns `self` unchanged while other handles are alive.
    pub fn into_inner(self) -> Result<PulsePipeline<C, S>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())),
            Err(inner) => Err(Self { inner }),
        }
    }

    // A panic in a sink poisons the mutex; pipeline state is still
    // consistent because every mutation completes before the sink is called.
    fn lock(&self) -> MutexGuard<'_, PulsePipeline<C, S>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
