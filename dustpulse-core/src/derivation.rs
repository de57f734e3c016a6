//! Occupancy to concentration and AQI
//!
//! ## Pipeline
//!
//! ```text
//! accumulated low time (µs) ─┐
//!                            ├─► ratio ─► pcs/0.01ft³ ─► µg/m³ ─► AQI
//! window length (ms) ────────┘   (%)      cubic curve    mass     EPA table
//!                                                        model
//! ```
//!
//! ### Ratio
//! `ratio = low_us / (window_ms · 10)` is the percentage of the window the
//! output spent low (µs / (ms · 1000) · 100).
//!
//! ### Count
//! The vendor's empirical curve, reproduced exactly:
//! `pcs = 1.1·r³ − 3.8·r² + 520·r + 0.62`.
//!
//! ### Mass
//! Every counted particle is treated as a sphere of radius 0.44 µm and
//! density 1.65 g/cm³, and the count per 0.01 ft³ is scaled to per m³:
//! `µg/m³ = pcs · 3531.5 · ρ · 4/3·π·r³`.
//!
//! Everything in this module is a pure function of its inputs.

use core::f64::consts::PI;

use crate::constants::sensors::{
    CUBIC_METER_PER_HUNDREDTH_FT3, PCS_CURVE, PM25_PARTICLE_DENSITY_UG_M3, PM25_PARTICLE_RADIUS_M,
};
use crate::events::Measurement;
use crate::lookup::AqiStandard;

/// Percentage of the window spent low
pub fn low_pulse_ratio(accumulated_low_us: u64, window_length_ms: u64) -> f64 {
    if window_length_ms == 0 {
        return 0.0;
    }
    accumulated_low_us as f64 / (window_length_ms as f64 * 10.0)
}

/// Particle count per 0.01 ft³ from the low-time percentage
pub fn concentration_pcs(ratio: f64) -> f64 {
    let [a, b, c, d] = PCS_CURVE;
    a * ratio * ratio * ratio + b * ratio * ratio + c * ratio + d
}

/// Spherical-particle model converting counts to mass concentration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MassConversion {
    /// Particle radius in meters
    pub radius_m: f64,
    /// Particle density in µg/m³
    pub density_ug_m3: f64,
    /// 0.01 ft³ volumes per m³
    pub volumes_per_m3: f64,
}

impl Default for MassConversion {
    fn default() -> Self {
        Self {
            radius_m: PM25_PARTICLE_RADIUS_M,
            density_ug_m3: PM25_PARTICLE_DENSITY_UG_M3,
            volumes_per_m3: CUBIC_METER_PER_HUNDREDTH_FT3,
        }
    }
}

impl MassConversion {
    /// Mass of one particle in µg
    pub fn particle_mass_ug(&self) -> f64 {
        let r = self.radius_m;
        self.density_ug_m3 * (4.0 / 3.0) * PI * r * r * r
    }

    /// µg/m³ contributed by one particle per 0.01 ft³
    pub fn factor(&self) -> f64 {
        self.volumes_per_m3 * self.particle_mass_ug()
    }

    pub fn pcs_to_ugm3(&self, concentration_pcs: f64) -> f64 {
        concentration_pcs * self.factor()
    }

    pub(crate) fn is_valid(&self) -> bool {
        [self.radius_m, self.density_ug_m3, self.volumes_per_m3]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Concentration and AQI derivation with a fixed calibration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Derivation {
    conversion: MassConversion,
    standard: AqiStandard,
}

impl Derivation {
    pub fn new(conversion: MassConversion, standard: AqiStandard) -> Self {
        Self { conversion, standard }
    }

    /// Derive the measurement for one closed window
    pub fn derive(&self, accumulated_low_us: u64, window_length_ms: u64) -> Measurement {
        let ratio = low_pulse_ratio(accumulated_low_us, window_length_ms);
        let pcs = concentration_pcs(ratio);
        let ugm3 = self.conversion.pcs_to_ugm3(pcs) as f32;

        Measurement {
            concentration_pcs: pcs as f32,
            concentration_ugm3: ugm3,
            aqi: self.standard.aqi(ugm3),
        }
    }

    pub fn conversion(&self) -> &MassConversion {
        &self.conversion
    }

    pub fn standard(&self) -> AqiStandard {
        self.standard
    }
}
