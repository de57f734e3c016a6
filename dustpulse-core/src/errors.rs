//! Error Types for the Pulse-to-Measurement Pipeline
//!
//! ## Design Philosophy
//!
//! The error system follows the same rules as the rest of the core:
//!
//! 1. **Small Size**: variants carry a few integers or a `&'static str`, never
//!    a `String`, so they can be returned from interrupt context.
//!
//! 2. **Copy Semantics**: every core error is `Copy`.
//!
//! 3. **Diagnostics are not failures**: the signal path never aborts. An
//!    implausible pulse is reported and still counted, an unterminated pulse
//!    is dropped, and a failed store loses one measurement without touching
//!    the window that produced it.
//!
//! ## Error Categories
//!
//! ### Signal Diagnostics ([`SignalError`])
//! - `ImplausiblePulse`: duration outside the plausibility bounds
//! - `UnterminatedPulse`: a Low edge replaced an open pulse
//! - `NonMonotonicEdge`: the High edge is timestamped before its Low edge
//!
//! ### Sink Failures ([`SinkError`])
//! - `Rejected` / `Unavailable`: the backend refused or could not be reached
//! - `QueueFull` / `Disconnected`: the handoff queue to the sink worker
//! - `Io` / `Serialization`: file-backed sinks
//!
//! ### Configuration ([`ConfigError`])
//! Returned by [`MonitorConfig::validate`](crate::config::MonitorConfig::validate).
//!
//! ## Handling Strategy
//!
//! ```rust
//! use dustpulse_core::{PipelineError, SinkError};
//!
//! fn on_store_failure(err: PipelineError) {
//!     match err {
//!         PipelineError::Sink { error: SinkError::QueueFull, .. } => {
//!             // Worker is behind, this window's reading is dropped
//!         }
//!         PipelineError::Sink { measurement, error } => {
//!             // Report and move on; the next window is already running
//!             let _ = (measurement, error);
//!         }
//!     }
//! }
//! ```

use thiserror_no_std::Error;

use crate::events::Measurement;
use crate::time::Timestamp;

/// Result type for signal diagnostics
pub type SignalResult<T> = Result<T, SignalError>;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Diagnostics raised while turning edges into pulse durations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// Pulse width outside the sensor's documented single-pulse range
    #[error("Pulse duration {duration_us}us outside [{min_us}, {max_us}]us")]
    ImplausiblePulse {
        /// Measured low-pulse width in microseconds
        duration_us: u64,
        /// Lower plausibility bound
        min_us: u64,
        /// Upper plausibility bound
        max_us: u64,
    },

    /// A Low edge arrived while a previous low pulse was still open
    #[error("Unterminated pulse started at {started_at}us")]
    UnterminatedPulse {
        /// Timestamp of the abandoned Low edge
        started_at: Timestamp,
    },

    /// High edge timestamp precedes the Low edge it would close
    #[error("High edge at {high_at}us precedes low edge at {low_at}us")]
    NonMonotonicEdge {
        /// Timestamp of the open Low edge
        low_at: Timestamp,
        /// Timestamp of the High edge
        high_at: Timestamp,
    },
}

/// Failures reported by a measurement sink
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// Backend refused the write
    #[error("Measurement rejected: {reason}")]
    Rejected {
        reason: &'static str,
    },

    /// Backend could not be reached
    #[error("Sink unavailable: {reason}")]
    Unavailable {
        reason: &'static str,
    },

    /// Handoff queue to the sink worker is full
    #[error("Sink queue full")]
    QueueFull,

    /// Sink worker has shut down
    #[error("Sink worker disconnected")]
    Disconnected,

    /// I/O failure in a file-backed sink
    #[cfg(feature = "std")]
    #[error("I/O error: {0:?}")]
    Io(std::io::ErrorKind),

    /// Measurement could not be encoded
    #[error("Serialization failed")]
    Serialization,
}

#[cfg(feature = "std")]
impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Io(err.kind())
    }
}

/// Invalid monitor configuration
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Sampling window must be longer than zero
    #[error("Window length must be positive, got {length_ms}ms")]
    InvalidWindowLength {
        length_ms: u64,
    },

    /// Plausibility bounds must satisfy min <= max
    #[error("Invalid plausibility bounds [{min_us}, {max_us}]us")]
    InvalidPlausibilityBounds {
        min_us: u64,
        max_us: u64,
    },

    /// Mass conversion parameters must be finite and positive
    #[error("Invalid mass conversion: {reason}")]
    InvalidConversion {
        reason: &'static str,
    },

    /// Sink queue needs room for at least one measurement
    #[error("Sink queue capacity must be positive")]
    InvalidQueueCapacity,

    /// Configuration document could not be parsed
    #[error("Config parse error at line {line}, column {column}")]
    Parse {
        line: usize,
        column: usize,
    },

    /// Configuration file could not be read
    #[cfg(feature = "std")]
    #[error("Config I/O error: {0:?}")]
    Io(std::io::ErrorKind),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.kind())
    }
}

/// Pipeline failure surfaced to the caller of the derivation step
///
/// The window that produced `measurement` has already been reset.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PipelineError {
    /// The sink did not accept the measurement
    #[error("Failed to store measurement: {error}")]
    Sink {
        /// The measurement that was lost
        measurement: Measurement,
        /// Why the sink refused it
        error: SinkError,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SignalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ImplausiblePulse { duration_us, min_us, max_us } =>
                defmt::write!(fmt, "Pulse {}us outside [{}, {}]", duration_us, min_us, max_us),
            Self::UnterminatedPulse { started_at } =>
                defmt::write!(fmt, "Unterminated pulse at {}", started_at),
            Self::NonMonotonicEdge { low_at, high_at } =>
                defmt::write!(fmt, "High {} before low {}", high_at, low_at),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SinkError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Rejected { reason } => defmt::write!(fmt, "Rejected: {}", reason),
            Self::Unavailable { reason } => defmt::write!(fmt, "Unavailable: {}", reason),
            Self::QueueFull => defmt::write!(fmt, "Queue full"),
            Self::Disconnected => defmt::write!(fmt, "Disconnected"),
            #[cfg(feature = "std")]
            Self::Io(_) => defmt::write!(fmt, "I/O error"),
            Self::Serialization => defmt::write!(fmt, "Serialization failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_errors_are_small() {
        assert!(core::mem::size_of::<SignalError>() <= 32);
    }

    #[cfg(feature = "std")]
    #[test]
    fn io_errors_keep_their_kind() {
        let err: SinkError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert_eq!(err, SinkError::Io(std::io::ErrorKind::PermissionDenied));
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_mentions_bounds() {
        let err = SignalError::ImplausiblePulse { duration_us: 5000, min_us: 8500, max_us: 95000 };
        let text = err.to_string();
        assert!(text.contains("5000"));
        assert!(text.contains("8500"));
    }
}
