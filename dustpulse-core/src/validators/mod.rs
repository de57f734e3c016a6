//! Signal Plausibility Checks
//!
//! ## Overview
//!
//! The only validation the pipeline performs is a fixed plausibility bound
//! on single low-pulse widths. It is observational: a pulse outside the
//! bound is reported and still counted toward occupancy, because the
//! vendor's calibration curve was fitted with all low time included.
//!
//! ```text
//!   duration ──► PlausibilityFilter ──► accumulator   (always)
//!                       │
//!                       └──► warn!(ImplausiblePulse)  (out of range only)
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use dustpulse_core::validators::{PlausibilityFilter, Plausibility};
//!
//! let filter = PlausibilityFilter::default();
//! assert_eq!(filter.classify(50_000), Plausibility::InRange);
//! assert_eq!(filter.classify(5_000), Plausibility::TooShort);
//! ```

mod plausibility;
mod utils;

pub use plausibility::{Plausibility, PlausibilityFilter};
