//! Edge Stream Traits
//!
//! The interrupt-style callback of a GPIO driver is re-expressed as a
//! pull-based stream: the edge source posts transitions, the pipeline pulls
//! them. The design uses the `nb` crate for non-blocking reads so it works
//! without an async runtime.
//!
//! ## Common Pattern
//!
//! ```rust
//! use dustpulse_core::traits::Stream;
//! use dustpulse_core::events::EdgeTransition;
//!
//! fn pump<S: Stream<Item = EdgeTransition>>(stream: &mut S) -> Result<usize, S::Error> {
//!     let mut seen = 0;
//!     loop {
//!         match stream.poll_next() {
//!             Ok(_edge) => seen += 1,
//!             // Nothing pending, come back on the next tick
//!             Err(nb::Error::WouldBlock) => return Ok(seen),
//!             Err(nb::Error::Other(e)) => return Err(e),
//!         }
//!     }
//! }
//! ```

/// Core stream trait for edge sources
///
/// ## Error Handling
///
/// Streams use a two-level error model:
/// - `nb::Error::WouldBlock` - no edge pending right now
/// - `nb::Error::Other(E)` - the source ended or failed
pub trait Stream {
    /// Type of items produced by the stream
    type Item;

    /// Type of errors that can occur
    type Error;

    /// Attempt to pull the next item from the stream
    ///
    /// ## Contract
    ///
    /// - Must not block
    /// - Multiple `WouldBlock` returns are normal
    /// - `EndOfStream` errors should be sticky
    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error>;

    /// Returns bounds on remaining items, like `Iterator::size_hint()`
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}
