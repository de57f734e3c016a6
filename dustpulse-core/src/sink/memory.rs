use crate::errors::SinkResult;
use crate::events::Measurement;
use crate::traits::MeasurementSink;

/// Keeps every measurement in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    measurements: Vec<Measurement>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn last(&self) -> Option<&Measurement> {
        self.measurements.last()
    }

    pub fn into_measurements(self) -> Vec<Measurement> {
        self.measurements
    }
}

impl MeasurementSink for MemorySink {
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
        self.measurements.push(*measurement);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
