//! Sensor Specifications and Limits
//!
//! Values for the Shinyei PPD42NS (sold as the Seeed Grove Dust Sensor).
//! The sensor pulls its P1 output low while it detects particles; the
//! fraction of time spent low over a window is the measured quantity.

// ===== SIGNAL LIMITS =====

/// Shortest plausible single low pulse (µs).
///
/// The datasheet gives 10-90 ms for one pulse; the bound is widened a little
/// so jitter around the edges of that range is not flagged.
///
/// Source: Shinyei PPD42NS datasheet, output pulse characteristics
pub const PULSE_PLAUSIBLE_MIN_US: u64 = 8_500;

/// Longest plausible single low pulse (µs).
///
/// Source: Shinyei PPD42NS datasheet, output pulse characteristics
pub const PULSE_PLAUSIBLE_MAX_US: u64 = 95_000;

// ===== CALIBRATION CURVE =====

/// Coefficients of the vendor's occupancy-to-count curve, highest power first.
///
/// `pcs = 1.1·r³ − 3.8·r² + 520·r + 0.62` where `r` is percent low time.
///
/// Source: Seeed Grove Dust Sensor reference sketch
pub const PCS_CURVE: [f64; 4] = [1.1, -3.8, 520.0, 0.62];

// ===== PARTICLE MASS MODEL =====

/// Representative PM2.5 particle radius (m).
///
/// Spherical-particle model commonly paired with this sensor for PM2.5.
pub const PM25_PARTICLE_RADIUS_M: f64 = 0.44e-6;

/// Assumed particle density, 1.65 g/cm³ expressed in µg/m³.
pub const PM25_PARTICLE_DENSITY_UG_M3: f64 = 1.65e12;

/// Number of 0.01 ft³ volumes in one cubic meter.
pub const CUBIC_METER_PER_HUNDREDTH_FT3: f64 = 3531.5;
