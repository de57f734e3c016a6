//! JSON Lines measurement history
//!
//! One object per closed window, appended and flushed immediately:
//!
//! ```json
//! {"concentration_pcs":10658.12,"concentration_ugm3":22.16,"aqi":72,"created_at_ms":1760572800000}
//! ```
//!
//! `created_at_ms` is wall-clock time at the moment of the write, in
//! milliseconds since the Unix epoch. The pipeline's own timestamps are
//! monotonic and meaningless outside the process, so they are not stored.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::errors::{SinkError, SinkResult};
use crate::events::Measurement;
use crate::traits::MeasurementSink;

/// One line of a [`JsonLinesSink`] file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredMeasurement {
    pub concentration_pcs: f32,
    pub concentration_ugm3: f32,
    pub aqi: u16,
    pub created_at_ms: u64,
}

impl StoredMeasurement {
    pub fn measurement(&self) -> Measurement {
        Measurement {
            concentration_pcs: self.concentration_pcs,
            concentration_ugm3: self.concentration_ugm3,
            aqi: self.aqi,
        }
    }
}

/// Appends measurements to a JSON Lines file
///
/// ```rust,no_run
/// use dustpulse_core::sink::{JsonLinesSink, MeasurementSink};
/// use dustpulse_core::events::Measurement;
///
/// let mut sink = JsonLinesSink::open("/var/lib/dustpulse/pm25.jsonl")?;
/// sink.store(&Measurement { concentration_pcs: 812.4, concentration_ugm3: 1.69, aqi: 7 })?;
/// # Ok::<(), dustpulse_core::SinkError>(())
/// ```
pub struct JsonLinesSink {
    writer: BufWriter<File>,
    path: PathBuf,
    written: u64,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: impl AsRef<Path>) -> SinkResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { writer: BufWriter::new(file), path, written: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written by this handle
    pub fn written(&self) -> u64 {
        self.written
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl MeasurementSink for JsonLinesSink {
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
        let record = StoredMeasurement {
            concentration_pcs: measurement.concentration_pcs,
            concentration_ugm3: measurement.concentration_ugm3,
            aqi: measurement.aqi,
            created_at_ms: Self::now_ms(),
        };

        let mut line = serde_json::to_vec(&record).map_err(|_| SinkError::Serialization)?;
        line.push(b'\n');

        self.writer.write_all(&line)?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}
