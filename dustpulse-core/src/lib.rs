//! Core pulse pipeline for DustPulse
//!
//! Turns the digital output of a PPD42NS-style optical dust sensor into
//! PM2.5 readings. The sensor pulls its output low while particles pass
//! the beam; the fraction of time spent low over a sampling window maps to
//! a particle count, a mass concentration and an EPA AQI.
//!
//! Key constraints:
//! - Runs run-to-completion per edge, O(1), no heap in the signal path
//! - `no_std` without the default `std` feature
//! - Edge timestamps are microseconds from a monotonic clock
//!
//! ```rust
//! use dustpulse_core::{MonitorConfig, PulsePipeline, EdgeTransition, Step};
//! use dustpulse_core::sink::MemorySink;
//! use dustpulse_core::time::FixedTime;
//!
//! let clock = FixedTime::new(0);
//! let mut pipeline = PulsePipeline::new(&MonitorConfig::default(), &clock, MemorySink::new());
//!
//! // 4.5 s of low time in a 30 s window, closed by a pulse just after the deadline
//! pipeline.process(EdgeTransition::low(1_000_000))?;
//! pipeline.process(EdgeTransition::high(5_500_000))?;
//! pipeline.process(EdgeTransition::low(30_000_001))?;
//! let step = pipeline.process(EdgeTransition::high(30_000_001))?;
//!
//! if let Step::Measured(closed) = step {
//!     assert_eq!(closed.summary.ratio, 15.0);
//!     assert_eq!(closed.measurement.aqi, 72);
//! }
//! # Ok::<(), dustpulse_core::PipelineError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod derivation;
pub mod errors;
pub mod events;
pub mod lookup;
pub mod pipeline;
pub mod pulse;
#[cfg(feature = "std")]
pub mod shared;
pub mod sink;
pub mod stream;
pub mod time;
pub mod traits;
pub mod validators;
pub mod window;

// Public API
pub use config::MonitorConfig;
pub use derivation::{Derivation, MassConversion};
pub use errors::{ConfigError, PipelineError, SignalError, SinkError};
pub use events::{EdgeTransition, Level, Measurement, PulseReport};
pub use lookup::{AqiCategory, AqiStandard};
pub use pipeline::{PulsePipeline, Step};
pub use traits::{MeasurementSink, Stream, TimeSource};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
