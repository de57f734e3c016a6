//! Interrupt-to-Task Edge Handoff
//!
//! ## Overview
//!
//! GPIO drivers deliver edges from an interrupt handler or a dedicated
//! monitor thread. The pipeline should not run there: it may call a sink.
//! `EdgeQueue` splits the two with a bounded single-producer single-consumer
//! ring from `heapless`:
//!
//! ```text
//! Producer (ISR)                        Consumer (task)
//!   on_transition(pin, level)             pipeline.drain(&mut consumer)
//!      │  stamp clock.now()                  ▲
//!      └──► enqueue ──► [ ring, N-1 ] ──► dequeue
//!           (never blocks, drops when full)
//! ```
//!
//! The producer reads the timestamp at the moment the edge is reported, so
//! queueing delay never distorts a pulse width.
//!
//! ## Overflow
//!
//! When the ring is full the edge is dropped and counted. A dropped Low
//! edge makes the next High unmatched; a dropped High leaves the pulse open
//! until the next Low abandons it. Either way no bogus duration is produced.
//!
//! ## Example
//!
//! ```rust
//! use dustpulse_core::stream::{EdgeQueue, Stream};
//! use dustpulse_core::events::Level;
//! use dustpulse_core::time::FixedTime;
//!
//! let clock = FixedTime::new(0);
//! let mut queue: EdgeQueue<8> = EdgeQueue::new();
//! let (mut producer, mut consumer) = queue.split(17, &clock);
//!
//! // Interrupt handler
//! assert!(producer.on_transition(17, Level::Low));
//!
//! // Task
//! let edge = consumer.poll_next().unwrap();
//! assert_eq!(edge.level, Level::Low);
//! ```

use core::convert::Infallible;
use core::sync::atomic::{AtomicU32, Ordering};

use heapless::spsc::{Consumer, Producer, Queue};

use crate::events::{EdgeTransition, Level};
use crate::time::TimeSource;
use super::{Stream, StreamError};

/// Backing storage for an edge handoff; holds `N - 1` edges
pub struct EdgeQueue<const N: usize> {
    queue: Queue<EdgeTransition, N>,
    dropped: AtomicU32,
}

impl<const N: usize> EdgeQueue<N> {
    /// Create new empty queue
    ///
    /// Can be used in static context
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Split into the interrupt-side producer and the task-side consumer
    ///
    /// The producer only accepts edges reported for `pin`.
    pub fn split<C: TimeSource>(
        &mut self,
        pin: u8,
        clock: C,
    ) -> (EdgeProducer<'_, C, N>, EdgeConsumer<'_, N>) {
        let dropped = &self.dropped;
        let (producer, consumer) = self.queue.split();
        (
            EdgeProducer { inner: producer, clock, pin, dropped },
            EdgeConsumer { inner: consumer, dropped },
        )
    }
}

impl<const N: usize> Default for EdgeQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side half of an [`EdgeQueue`]
pub struct EdgeProducer<'a, C, const N: usize> {
    inner: Producer<'a, EdgeTransition, N>,
    clock: C,
    pin: u8,
    dropped: &'a AtomicU32,
}

impl<'a, C: TimeSource, const N: usize> EdgeProducer<'a, C, N> {
    /// Pin-change callback
    ///
    /// Stamps the edge with the producer's clock and queues it. Returns
    /// `false` if the edge was for another pin or the queue was full.
    pub fn on_transition(&mut self, pin: u8, level: Level) -> bool {
        if pin != self.pin {
            return false;
        }
        let edge = EdgeTransition::new(level, self.clock.now());
        self.post(edge)
    }

    /// Queue an edge that was timestamped at capture
    pub fn post(&mut self, edge: EdgeTransition) -> bool {
        match self.inner.enqueue(edge) {
            Ok(()) => true,
            Err(_) => {
                // Single writer, so load/store is enough on cores without CAS
                let dropped = self.dropped.load(Ordering::Relaxed);
                self.dropped.store(dropped.saturating_add(1), Ordering::Relaxed);
                false
            }
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }
}

/// Task-side half of an [`EdgeQueue`]
pub struct EdgeConsumer<'a, const N: usize> {
    inner: Consumer<'a, EdgeTransition, N>,
    dropped: &'a AtomicU32,
}

impl<'a, const N: usize> EdgeConsumer<'a, N> {
    /// Edges lost to a full queue so far
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn pending(&self) -> usize {
        self.inner.len()
    }
}

impl<'a, const N: usize> Stream for EdgeConsumer<'a, N> {
    type Item = EdgeTransition;
    type Error = StreamError<Infallible>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        self.inner.dequeue().ok_or(nb::Error::WouldBlock)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.len(), None)
    }
}
