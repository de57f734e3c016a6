//! Measurement sinks
//!
//! A sink receives exactly one [`Measurement`] per closed window. What it
//! does with it (append to a file, POST it, keep it in memory) is its own
//! business; the pipeline only learns whether the write succeeded.
//!
//! | Sink | Feature | Blocking | Use |
//! |------|---------|----------|-----|
//! | [`LogSink`] | - | no | Logging the reading is all you need |
//! | [`MemorySink`] | `std` | no | Tests and replay |
//! | [`JsonLinesSink`] | `std` | file I/O | Local history |
//! | [`QueuedSink`] | `std` | no | Front for any slow sink via [`SinkWorker`] |
//!
//! Network sinks live in `dustpulse-connectors`.

#[cfg(feature = "std")]
mod file;
#[cfg(feature = "std")]
mod memory;
#[cfg(feature = "std")]
mod worker;

#[cfg(feature = "std")]
pub use file::{JsonLinesSink, StoredMeasurement};
#[cfg(feature = "std")]
pub use memory::MemorySink;
#[cfg(feature = "std")]
pub use worker::{QueuedSink, SinkWorker, WorkerStats};

pub use crate::traits::MeasurementSink;

use crate::errors::SinkResult;
use crate::events::Measurement;

/// Sink that only logs each measurement at `info`
///
/// Without the `log` feature this discards measurements, which is still
/// useful on targets that report readings some other way.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink {
    stored: u64,
}

impl LogSink {
    pub const fn new() -> Self {
        Self { stored: 0 }
    }

    /// Measurements seen so far
    pub fn stored(&self) -> u64 {
        self.stored
    }
}

impl MeasurementSink for LogSink {
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
        self.stored += 1;
        log_info!(
            "PM2.5 {:.2} ug/m3 ({:.2} pcs/0.01cf), AQI {}",
            measurement.concentration_ugm3,
            measurement.concentration_pcs,
            measurement.aqi
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sink_never_fails() {
        let mut sink = LogSink::new();
        let m = Measurement { concentration_pcs: 0.62, concentration_ugm3: 0.0013, aqi: 0 };

        assert!(sink.store(&m).is_ok());
        assert!(sink.store(&m).is_ok());
        assert_eq!(sink.stored(), 2);
    }
}
