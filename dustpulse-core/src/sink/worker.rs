//! Background sink worker
//!
//! ## Why
//!
//! Edge delivery must never wait on a database or a network round trip.
//! [`SinkWorker`] moves the real sink onto its own thread and gives the
//! pipeline a [`QueuedSink`] that only enqueues:
//!
//! ```text
//! PulsePipeline ──store──► QueuedSink ──try_send──► [ bounded channel ]
//!                                                          │
//!                                   worker thread ◄────────┘
//!                                   inner.store(m) (may block, may fail)
//! ```
//!
//! ## Failure Handling
//!
//! - Queue full: `store` returns [`SinkError::QueueFull`] immediately and
//!   the measurement is lost. The pipeline reports it like any other sink
//!   failure.
//! - Inner sink fails: the worker logs the error, counts it and moves on.
//!   Retrying is the inner sink's job.
//!
//! ## Shutdown
//!
//! The worker exits once every [`QueuedSink`] handle has been dropped and
//! the queue is empty. [`SinkWorker::shutdown`] waits for that, so
//! measurements already queued are always written.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use crate::errors::{SinkError, SinkResult};
use crate::events::Measurement;
use crate::traits::MeasurementSink;

/// Totals reported by the worker on shutdown
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    /// Measurements the inner sink accepted
    pub stored: u64,
    /// Measurements the inner sink rejected
    pub failed: u64,
}

/// Non-blocking front for a [`SinkWorker`]
///
/// Cloning gives another producer for the same worker.
#[derive(Debug, Clone)]
pub struct QueuedSink {
    sender: SyncSender<Measurement>,
}

impl MeasurementSink for QueuedSink {
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
        self.sender.try_send(*measurement).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::QueueFull,
            TrySendError::Disconnected(_) => SinkError::Disconnected,
        })
    }

    fn name(&self) -> &'static str {
        "queued"
    }
}

/// Thread that owns a sink and feeds it from a bounded queue
///
/// ```rust
/// use dustpulse_core::sink::{MemorySink, MeasurementSink, SinkWorker};
/// use dustpulse_core::events::Measurement;
///
/// let (mut queued, worker) = SinkWorker::spawn(MemorySink::new(), 4)?;
/// queued.store(&Measurement { concentration_pcs: 0.62, concentration_ugm3: 0.0013, aqi: 0 })?;
///
/// drop(queued);
/// let (sink, stats) = worker.shutdown()?;
/// assert_eq!(sink.measurements().len(), 1);
/// assert_eq!(stats.stored, 1);
/// # Ok::<(), dustpulse_core::SinkError>(())
/// ```
pub struct SinkWorker<S> {
    handle: JoinHandle<(S, WorkerStats)>,
}

impl<S> SinkWorker<S>
where
    S: MeasurementSink + Send + 'static,
{
    /// Start the worker thread with room for `capacity` waiting measurements
    ///
    /// A `capacity` of zero is raised to one; a rendezvous channel would
    /// make every store fail unless the worker happened to be waiting.
    pub fn spawn(sink: S, capacity: usize) -> SinkResult<(QueuedSink, Self)> {
        let (sender, receiver) = mpsc::sync_channel(capacity.max(1));

        let handle = thread::Builder::new()
            .name(format!("dustpulse-{}", sink.name()))
            .spawn(move || run(sink, receiver))?;

        Ok((QueuedSink { sender }, Self { handle }))
    }

    /// Wait for the queue to drain and the thread to exit
    ///
    /// Blocks until every [`QueuedSink`] for this worker has been dropped.
    /// Returns the inner sink and the worker's totals.
    pub fn shutdown(self) -> SinkResult<(S, WorkerStats)> {
        self.handle.join().map_err(|_| SinkError::Disconnected)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

fn run<S: MeasurementSink>(mut sink: S, receiver: Receiver<Measurement>) -> (S, WorkerStats) {
    let mut stats = WorkerStats::default();

    // Ends when all senders are gone and the queue is empty
    for measurement in receiver {
        match sink.store(&measurement) {
            Ok(()) => stats.stored += 1,
            Err(err) => {
                stats.failed += 1;
                log_warn!("{} dropped measurement (AQI {}): {}", sink.name(), measurement.aqi, err);
            }
        }
    }

    log_debug!("{} worker exiting: {} stored, {} failed", sink.name(), stats.stored, stats.failed);
    (sink, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use std::sync::{Arc, Barrier};

    fn reading(aqi: u16) -> Measurement {
        Measurement { concentration_pcs: 1000.0, concentration_ugm3: 2.0, aqi }
    }

    /// Holds the worker inside the first store until the test releases it
    struct GatedSink {
        gate: Arc<Barrier>,
        inner: MemorySink,
    }

    impl MeasurementSink for GatedSink {
        fn store(&mut self, m: &Measurement) -> SinkResult<()> {
            if self.inner.measurements().is_empty() {
                self.gate.wait();
            }
            self.inner.store(m)
        }
    }

    struct RejectOdd;

    impl MeasurementSink for RejectOdd {
        fn store(&mut self, m: &Measurement) -> SinkResult<()> {
            if m.aqi % 2 == 1 {
                Err(SinkError::Rejected { reason: "odd" })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn shutdown_drains_queue() {
        let (mut queued, worker) = SinkWorker::spawn(MemorySink::new(), 8).unwrap();
        for aqi in 0..5 {
            queued.store(&reading(aqi)).unwrap();
        }
        drop(queued);

        let (sink, stats) = worker.shutdown().unwrap();
        let aqis: Vec<u16> = sink.measurements().iter().map(|m| m.aqi).collect();
        assert_eq!(aqis, vec![0, 1, 2, 3, 4]);
        assert_eq!(stats, WorkerStats { stored: 5, failed: 0 });
    }

    #[test]
    fn full_queue_fails_fast() {
        let gate = Arc::new(Barrier::new(2));
        let sink = GatedSink { gate: gate.clone(), inner: MemorySink::new() };
        let (mut queued, worker) = SinkWorker::spawn(sink, 1).unwrap();

        // Worker takes the first one and parks on the gate
        queued.store(&reading(1)).unwrap();
        // Fill the single slot; retry until the worker has dequeued the first
        while queued.store(&reading(2)).is_err() {
            thread::yield_now();
        }
        assert_eq!(queued.store(&reading(3)), Err(SinkError::QueueFull));

        gate.wait();
        drop(queued);
        let (sink, stats) = worker.shutdown().unwrap();
        assert_eq!(sink.inner.measurements().len(), 2);
        assert_eq!(stats.stored, 2);
    }

    #[test]
    fn inner_failures_are_counted_not_retried() {
        let (mut queued, worker) = SinkWorker::spawn(RejectOdd, 8).unwrap();
        for aqi in 0..4 {
            queued.store(&reading(aqi)).unwrap();
        }
        drop(queued);

        let (_, stats) = worker.shutdown().unwrap();
        assert_eq!(stats, WorkerStats { stored: 2, failed: 2 });
    }

    #[test]
    fn closed_receiver_is_disconnected() {
        let (sender, receiver) = mpsc::sync_channel(1);
        drop(receiver);

        let mut queued = QueuedSink { sender };
        assert_eq!(queued.store(&reading(0)), Err(SinkError::Disconnected));
    }
}
