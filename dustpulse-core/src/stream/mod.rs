//! Edge delivery streams
//!
//! Implementations of [`Stream`] that yield [`EdgeTransition`](crate::events::EdgeTransition)s:
//!
//! - [`MemoryEdgeStream`]: replays a recorded slice (tests, offline analysis)
//! - [`EdgeQueue`]: interrupt-to-task handoff backed by `heapless::spsc`

use core::fmt;

mod memory;
mod queue;

pub use memory::MemoryEdgeStream;
pub use queue::{EdgeConsumer, EdgeProducer, EdgeQueue};

/// Errors for edge streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError<E> {
    /// Transport-level error from the underlying source
    Transport(E),
    /// End of stream reached
    EndOfStream,
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::EndOfStream => write!(f, "End of stream"),
        }
    }
}

// Re-export trait for convenience
pub use crate::traits::Stream;
