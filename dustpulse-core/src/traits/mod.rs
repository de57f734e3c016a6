//! Core Traits and Abstractions
//!
//! The pipeline itself is concrete; traits sit only at the seams where the
//! host plugs something in.
//!
//! ## Module Organization
//!
//! - [`time`] - Clock the pipeline stamps edges with
//! - [`stream`] - Pull-based edge delivery
//! - [`sink`] - Where finished measurements go
//! - [`validator`] - Range checks on single values
//!
//! ## Usage Example
//!
//! ```rust
//! use dustpulse_core::traits::{MeasurementSink, TimeSource};
//! use dustpulse_core::{MonitorConfig, PulsePipeline, Level, Step};
//! use dustpulse_core::sink::MemorySink;
//! use dustpulse_core::time::FixedTime;
//!
//! let clock = FixedTime::new(0);
//! let mut pipeline = PulsePipeline::new(&MonitorConfig::default(), &clock, MemorySink::new());
//!
//! pipeline.on_transition(Level::Low)?;
//! clock.advance(20_000);
//! let step = pipeline.on_transition(Level::High)?;
//! assert!(matches!(step, Step::Pulse(_)));
//! # Ok::<(), dustpulse_core::PipelineError>(())
//! ```

pub mod time;
pub mod stream;
pub mod sink;
pub mod validator;

pub use time::TimeSource;
pub use stream::Stream;
pub use sink::MeasurementSink;
pub use validator::{Validator, ValidatorConstraints};
