//! Constants for the dust pipeline
//!
//! All numeric values used by the pipeline are defined here with their
//! source, so the rest of the crate never carries magic numbers.
//!
//! ## Organization
//!
//! - **Sensors**: PPD42NS signal limits and the particle mass model
//! - **Time**: Unit conversions and sampling window defaults
//! - **Buffers**: Queue depths for edge and measurement handoff

/// PPD42NS signal characteristics and particle model parameters.
pub mod sensors;

/// Time unit conversions and sampling window defaults.
pub mod time;

/// Queue sizes for the edge and sink handoff paths.
pub mod buffers;

pub use sensors::{
    PULSE_PLAUSIBLE_MIN_US, PULSE_PLAUSIBLE_MAX_US,
    PM25_PARTICLE_RADIUS_M, PM25_PARTICLE_DENSITY_UG_M3, CUBIC_METER_PER_HUNDREDTH_FT3,
};

pub use time::{US_PER_MS, MS_PER_SECOND, DEFAULT_WINDOW_LENGTH_MS};

pub use buffers::{EDGE_QUEUE_CAPACITY, SINK_QUEUE_CAPACITY};
