//! EPA Air Quality Index Breakpoint Tables
//!
//! ## Overview
//!
//! The AQI is a piecewise-linear function of 24-hour PM2.5 concentration.
//! Each row of a table maps a concentration band `[c_lo, c_hi]` onto an
//! index band `[i_lo, i_hi]`:
//!
//! ```text
//! AQI = (i_hi − i_lo) / (c_hi − c_lo) · (C − c_lo) + i_lo
//! ```
//!
//! Concentration bands are published to one decimal place and leave gaps of
//! 0.1 µg/m³ between rows (12.0 → 12.1). The EPA procedure truncates the
//! input to one decimal first, which makes every value land in exactly one
//! row. We do the same.
//!
//! ## Tables
//!
//! | Category                       | 2012 (µg/m³) | 2024 (µg/m³) | AQI     |
//! |--------------------------------|--------------|--------------|---------|
//! | Good                           | 0.0–12.0     | 0.0–9.0      | 0–50    |
//! | Moderate                       | 12.1–35.4    | 9.1–35.4     | 51–100  |
//! | Unhealthy for Sensitive Groups | 35.5–55.4    | 35.5–55.4    | 101–150 |
//! | Unhealthy                      | 55.5–150.4   | 55.5–125.4   | 151–200 |
//! | Very Unhealthy                 | 150.5–250.4  | 125.5–225.4  | 201–300 |
//! | Hazardous                      | 250.5–350.4  | 225.5–325.4  | 301–400 |
//! | Hazardous                      | 350.5–500.4  | (continues)  | 401–500 |
//!
//! The 2024 revision folds the two hazardous rows into one 301–500 band.
//! Concentrations above the top row report the maximum index, 500.

/// One row of a breakpoint table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub conc_low: f32,
    pub conc_high: f32,
    pub aqi_low: u16,
    pub aqi_high: u16,
}

const fn bp(conc_low: f32, conc_high: f32, aqi_low: u16, aqi_high: u16) -> Breakpoint {
    Breakpoint { conc_low, conc_high, aqi_low, aqi_high }
}

/// PM2.5 breakpoints, EPA 2012 revision
pub static PM25_EPA_2012: [Breakpoint; 7] = [
    bp(0.0, 12.0, 0, 50),
    bp(12.1, 35.4, 51, 100),
    bp(35.5, 55.4, 101, 150),
    bp(55.5, 150.4, 151, 200),
    bp(150.5, 250.4, 201, 300),
    bp(250.5, 350.4, 301, 400),
    bp(350.5, 500.4, 401, 500),
];

/// PM2.5 breakpoints, EPA 2024 revision
pub static PM25_EPA_2024: [Breakpoint; 6] = [
    bp(0.0, 9.0, 0, 50),
    bp(9.1, 35.4, 51, 100),
    bp(35.5, 55.4, 101, 150),
    bp(55.5, 125.4, 151, 200),
    bp(125.5, 225.4, 201, 300),
    bp(225.5, 325.4, 301, 500),
];

/// Highest reportable index
pub const AQI_MAX: u16 = 500;

/// Which breakpoint table to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AqiStandard {
    #[default]
    Epa2012,
    Epa2024,
}

impl AqiStandard {
    pub fn table(&self) -> &'static [Breakpoint] {
        match self {
            AqiStandard::Epa2012 => &PM25_EPA_2012,
            AqiStandard::Epa2024 => &PM25_EPA_2024,
        }
    }

    /// PM2.5 mass concentration (µg/m³) to AQI
    pub fn aqi(&self, ugm3: f32) -> u16 {
        pm25_ugm3_to_aqi(ugm3, self.table())
    }
}

/// PM2.5 mass concentration (µg/m³) to AQI using `table`
///
/// Negative and NaN inputs map to 0; inputs past the last row map to
/// [`AQI_MAX`].
pub fn pm25_ugm3_to_aqi(ugm3: f32, table: &[Breakpoint]) -> u16 {
    if !(ugm3 > 0.0) {
        return 0;
    }

    // Truncate to 0.1 µg/m³ so the value falls into exactly one row
    let c = libm::floorf(ugm3 * 10.0) / 10.0;

    for row in table {
        if c >= row.conc_low && c <= row.conc_high {
            let span = (row.aqi_high - row.aqi_low) as f32 / (row.conc_high - row.conc_low);
            let aqi = span * (c - row.conc_low) + row.aqi_low as f32;
            return libm::roundf(aqi) as u16;
        }
    }

    AQI_MAX
}

/// AQI band names used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub const fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            AqiCategory::Good => "good",
            AqiCategory::Moderate => "moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "unhealthy for sensitive groups",
            AqiCategory::Unhealthy => "unhealthy",
            AqiCategory::VeryUnhealthy => "very unhealthy",
            AqiCategory::Hazardous => "hazardous",
        }
    }
}
