//! Memory-based edge stream for testing and replay

use crate::events::EdgeTransition;
use super::{Stream, StreamError};

/// Replays a recorded edge sequence
///
/// ```rust
/// use dustpulse_core::events::EdgeTransition;
/// use dustpulse_core::stream::{MemoryEdgeStream, Stream};
///
/// let edges = [EdgeTransition::low(0), EdgeTransition::high(20_000)];
/// let mut stream = MemoryEdgeStream::new(&edges);
/// while let Ok(edge) = stream.poll_next() {
///     // Process edge
///     let _ = edge;
/// }
/// assert!(stream.is_exhausted());
/// ```
pub struct MemoryEdgeStream<'a> {
    edges: &'a [EdgeTransition],
    position: usize,
}

impl<'a> MemoryEdgeStream<'a> {
    pub fn new(edges: &'a [EdgeTransition]) -> Self {
        Self { edges, position: 0 }
    }

    /// Reset to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.edges.len()
    }
}

impl<'a> Stream for MemoryEdgeStream<'a> {
    type Item = EdgeTransition;
    type Error = StreamError<()>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        let Some(edge) = self.edges.get(self.position) else {
            return Err(nb::Error::Other(StreamError::EndOfStream));
        };
        self.position += 1;
        Ok(*edge)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.edges.len() - self.position;
        (remaining, Some(remaining))
    }
}
