//! Values flowing through the pulse pipeline
//!
//! ```text
//! EdgeTransition ──► PulseReport ──► (window closes) ──► Measurement
//!  level + time       duration +                          pcs, µg/m³, AQI
//!                     plausibility
//! ```
//!
//! Everything here is `Copy` and heap-free so it can cross an interrupt
//! boundary or sit in a fixed-size queue.

use crate::time::Timestamp;
use crate::validators::Plausibility;

/// Logic level of the sensor output pin
///
/// The PPD42NS drives its output low while particles are in the sensing
/// volume; time spent low is the raw signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Level {
    Low = 0,
    High = 1,
}

impl Level {
    /// Map a raw GPIO value (0 / non-zero) to a level
    pub const fn from_raw(value: u8) -> Self {
        if value == 0 { Level::Low } else { Level::High }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// One pin-level change with the instant it was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeTransition {
    pub level: Level,
    pub timestamp: Timestamp,
}

impl EdgeTransition {
    pub const fn new(level: Level, timestamp: Timestamp) -> Self {
        Self { level, timestamp }
    }

    pub const fn low(timestamp: Timestamp) -> Self {
        Self::new(Level::Low, timestamp)
    }

    pub const fn high(timestamp: Timestamp) -> Self {
        Self::new(Level::High, timestamp)
    }
}

/// A completed low pulse after plausibility classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseReport {
    /// Low-pulse width in microseconds
    pub duration_us: u64,
    /// Timestamp of the High edge that closed the pulse
    pub ended_at: Timestamp,
    /// Result of the plausibility check
    pub plausibility: Plausibility,
}

impl PulseReport {
    pub fn is_plausible(&self) -> bool {
        self.plausibility == Plausibility::InRange
    }
}

/// Result of one closed sampling window
///
/// `concentration_pcs` is in particles per 0.01 ft³, the sensor's native
/// unit; `concentration_ugm3` is the PM2.5 mass estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    pub concentration_pcs: f32,
    pub concentration_ugm3: f32,
    pub aqi: u16,
}

impl Measurement {
    /// AQI band the measurement falls in
    pub fn category(&self) -> crate::lookup::AqiCategory {
        crate::lookup::AqiCategory::from_aqi(self.aqi)
    }
}
