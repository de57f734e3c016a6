//! Measurement Sink Capability
//!
//! The sink is the one place a measurement leaves the core. It is called
//! exactly once per closed sampling window. The core never retries a failed
//! store; a sink that wants retry or backoff implements it internally (see
//! `dustpulse-connectors` for an HTTP sink that does).
//!
//! ## Blocking
//!
//! `store` runs on whatever context closed the window, which is usually the
//! edge delivery context. Sinks that can block (files, network) should be
//! put behind a [`SinkWorker`](crate::sink::SinkWorker) so a slow write
//! cannot delay pulse accounting.

use crate::errors::SinkResult;
use crate::events::Measurement;

/// Durable destination for derived measurements
///
/// ## Example Implementation
///
/// ```rust
/// use dustpulse_core::traits::MeasurementSink;
/// use dustpulse_core::events::Measurement;
/// use dustpulse_core::errors::{SinkError, SinkResult};
///
/// struct Display {
///     connected: bool,
/// }
///
/// impl MeasurementSink for Display {
///     fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
///         if !self.connected {
///             return Err(SinkError::Unavailable { reason: "display not attached" });
///         }
///         // draw measurement.aqi ...
///         let _ = measurement;
///         Ok(())
///     }
/// }
/// ```
pub trait MeasurementSink {
    /// Record one measurement
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()>;

    /// Sink name for logs
    fn name(&self) -> &'static str {
        "sink"
    }
}

impl<S: MeasurementSink + ?Sized> MeasurementSink for &mut S {
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
        (**self).store(measurement)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(feature = "std")]
impl<S: MeasurementSink + ?Sized> MeasurementSink for std::boxed::Box<S> {
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
        (**self).store(measurement)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
