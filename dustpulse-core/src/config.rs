//! Monitor configuration
//!
//! Defaults reproduce the classic Grove Dust Sensor setup: a 30 s window,
//! the datasheet pulse bounds, the EPA 2012 table and the 0.44 µm /
//! 1.65 g/cm³ particle model.
//!
//! ```rust
//! use dustpulse_core::{MonitorConfig, AqiStandard};
//!
//! let config = MonitorConfig::default()
//!     .with_window_length_ms(60_000)
//!     .with_aqi_standard(AqiStandard::Epa2024);
//! assert!(config.validate().is_ok());
//! ```
//!
//! With `std`, a config can be read from JSON; missing keys keep their
//! defaults:
//!
//! ```rust
//! # #[cfg(feature = "std")] {
//! use dustpulse_core::MonitorConfig;
//!
//! let config = MonitorConfig::from_json_str(r#"{ "window_length_ms": 15000 }"#)?;
//! assert_eq!(config.window_length_ms, 15_000);
//! assert_eq!(config.plausible_min_us, 8_500);
//! # }
//! # Ok::<(), dustpulse_core::ConfigError>(())
//! ```

use crate::constants::buffers::SINK_QUEUE_CAPACITY;
use crate::constants::sensors::{PULSE_PLAUSIBLE_MAX_US, PULSE_PLAUSIBLE_MIN_US};
use crate::constants::time::DEFAULT_WINDOW_LENGTH_MS;
use crate::derivation::{Derivation, MassConversion};
use crate::errors::ConfigError;
use crate::lookup::AqiStandard;
use crate::validators::PlausibilityFilter;

/// Everything the pipeline needs to know up front
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MonitorConfig {
    /// Sampling window length in milliseconds
    pub window_length_ms: u64,
    /// Shortest plausible low pulse in microseconds
    pub plausible_min_us: u64,
    /// Longest plausible low pulse in microseconds
    pub plausible_max_us: u64,
    /// Breakpoint table for the AQI
    pub aqi_standard: AqiStandard,
    /// Particle model for the µg/m³ conversion
    pub mass_conversion: MassConversion,
    /// Measurements that may wait for a background sink
    pub sink_queue_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window_length_ms: DEFAULT_WINDOW_LENGTH_MS,
            plausible_min_us: PULSE_PLAUSIBLE_MIN_US,
            plausible_max_us: PULSE_PLAUSIBLE_MAX_US,
            aqi_standard: AqiStandard::default(),
            mass_conversion: MassConversion::default(),
            sink_queue_capacity: SINK_QUEUE_CAPACITY,
        }
    }
}

impl MonitorConfig {
    pub fn with_window_length_ms(mut self, length_ms: u64) -> Self {
        self.window_length_ms = length_ms;
        self
    }

    pub fn with_plausible_range(mut self, min_us: u64, max_us: u64) -> Self {
        self.plausible_min_us = min_us;
        self.plausible_max_us = max_us;
        self
    }

    pub fn with_aqi_standard(mut self, standard: AqiStandard) -> Self {
        self.aqi_standard = standard;
        self
    }

    pub fn with_mass_conversion(mut self, conversion: MassConversion) -> Self {
        self.mass_conversion = conversion;
        self
    }

    pub fn with_sink_queue_capacity(mut self, capacity: usize) -> Self {
        self.sink_queue_capacity = capacity;
        self
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_length_ms == 0 {
            return Err(ConfigError::InvalidWindowLength { length_ms: self.window_length_ms });
        }
        if self.plausible_min_us > self.plausible_max_us {
            return Err(ConfigError::InvalidPlausibilityBounds {
                min_us: self.plausible_min_us,
                max_us: self.plausible_max_us,
            });
        }
        if !self.mass_conversion.is_valid() {
            return Err(ConfigError::InvalidConversion {
                reason: "radius, density and volume factor must be positive",
            });
        }
        if self.sink_queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity);
        }
        Ok(())
    }

    pub fn plausibility_filter(&self) -> PlausibilityFilter {
        PlausibilityFilter::new(self.plausible_min_us, self.plausible_max_us)
    }

    pub fn derivation(&self) -> Derivation {
        Derivation::new(self.mass_conversion, self.aqi_standard)
    }

    /// Parse and validate a JSON document
    #[cfg(feature = "std")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            line: e.line(),
            column: e.column(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    #[cfg(feature = "std")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_length_ms, 30_000);
        assert_eq!(config.plausibility_filter(), PlausibilityFilter::default());
    }

    #[test]
    fn zero_window_rejected() {
        let config = MonitorConfig::default().with_window_length_ms(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidWindowLength { length_ms: 0 }));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let config = MonitorConfig::default().with_plausible_range(95_000, 8_500);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlausibilityBounds { .. })
        ));
    }

    #[test]
    fn bad_conversion_rejected() {
        let conversion = MassConversion { density_ug_m3: f64::NAN, ..MassConversion::default() };
        let config = MonitorConfig::default().with_mass_conversion(conversion);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConversion { .. })));
    }

    #[test]
    fn empty_queue_rejected() {
        let config = MonitorConfig::default().with_sink_queue_capacity(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidQueueCapacity));
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_overrides_and_defaults() {
        let json = r#"{
            "window_length_ms": 10000,
            "aqi_standard": "epa2024",
            "mass_conversion": { "radius_m": 0.5e-6 }
        }"#;
        let config = MonitorConfig::from_json_str(json).unwrap();

        assert_eq!(config.window_length_ms, 10_000);
        assert_eq!(config.aqi_standard, AqiStandard::Epa2024);
        assert_eq!(config.mass_conversion.radius_m, 0.5e-6);
        assert_eq!(config.mass_conversion.density_ug_m3, 1.65e12);
        assert_eq!(config.plausible_max_us, 95_000);
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_errors_are_located() {
        let err = MonitorConfig::from_json_str("{\n  \"window_length_ms\": \"soon\"\n}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_values_are_validated() {
        let err = MonitorConfig::from_json_str(r#"{ "window_length_ms": 0 }"#).unwrap_err();
        assert_eq!(err, ConfigError::InvalidWindowLength { length_ms: 0 });
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.json");
        std::fs::write(&path, r#"{ "window_length_ms": 15000 }"#).unwrap();

        let config = MonitorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.window_length_ms, 15_000);
    }

    #[cfg(feature = "std")]
    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MonitorConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err, ConfigError::Io(std::io::ErrorKind::NotFound));
    }
}
