//! Network Sinks for DustPulse Measurements
//!
//! ## Overview
//!
//! The core crate stops at [`MeasurementSink`]: one call per closed
//! sampling window. This crate provides sinks that ship those readings to
//! a remote service.
//!
//! | Sink | Feature | Transport |
//! |------|---------|-----------|
//! | [`HttpSink`](http::HttpSink) | `http` | JSON over HTTP(S) via `ureq` |
//!
//! ## Blocking and Retries
//!
//! Network sinks block and retry internally with exponential backoff. The
//! core never retries a failed store, so the retry policy lives here. Run
//! them behind a [`SinkWorker`](dustpulse_core::sink::SinkWorker) so the
//! edge path is never held up by the network:
//!
//! ```rust,no_run
//! use dustpulse_connectors::http::{HttpConfig, HttpSink};
//! use dustpulse_core::sink::SinkWorker;
//!
//! let http = HttpSink::new(
//!     HttpConfig::new("https://air.example.net/api/v1/pm25")
//!         .bearer_token("token")
//!         .max_retries(5),
//! )?;
//! let (queued, worker) = SinkWorker::spawn(http, 16)?;
//! // hand `queued` to the PulsePipeline ...
//! # drop(queued);
//! # worker.shutdown()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{AuthMethod, HttpConfig, HttpError, HttpSink};

pub use dustpulse_core::traits::MeasurementSink;

/// Delivery statistics kept by every network sink
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Measurements delivered
    pub messages_sent: u64,
    /// Measurements given up on
    pub messages_failed: u64,
    /// Payload bytes delivered
    pub bytes_sent: u64,
    /// Attempts beyond the first
    pub retries: u64,
    /// Last error message
    pub last_error: Option<String>,
}
