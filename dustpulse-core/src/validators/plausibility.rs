//! Pulse width plausibility filter
//!
//! Classifies low-pulse widths against the sensor's documented single-pulse
//! range. Nothing is dropped here; the caller decides what a flag means.

use crate::{
    constants::sensors::{PULSE_PLAUSIBLE_MAX_US, PULSE_PLAUSIBLE_MIN_US},
    errors::{SignalError, SignalResult},
    traits::{Validator, ValidatorConstraints},
};

use super::utils;

/// Where a pulse width falls relative to the plausibility bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plausibility {
    InRange,
    TooShort,
    TooLong,
}

/// Inclusive bounds on a single low-pulse width, in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlausibilityFilter {
    min_us: u64,
    max_us: u64,
}

impl Default for PlausibilityFilter {
    fn default() -> Self {
        Self {
            min_us: PULSE_PLAUSIBLE_MIN_US,
            max_us: PULSE_PLAUSIBLE_MAX_US,
        }
    }
}

impl PlausibilityFilter {
    /// Create filter with custom bounds
    pub fn new(min_us: u64, max_us: u64) -> Self {
        let (min_us, max_us) = if min_us > max_us { (max_us, min_us) } else { (min_us, max_us) };
        Self { min_us, max_us }
    }

    pub fn classify(&self, duration_us: u64) -> Plausibility {
        Self::verdict(duration_us, self.validate(duration_us))
    }

    /// Classify and, when out of range, emit the diagnostic
    ///
    /// The duration is forwarded by the caller regardless of the result.
    pub fn inspect(&self, duration_us: u64) -> Plausibility {
        let checked = self.validate(duration_us);
        if let Err(err) = checked {
            log_warn!("{}", err);
        }
        Self::verdict(duration_us, checked)
    }

    fn verdict(duration_us: u64, checked: SignalResult<()>) -> Plausibility {
        match checked {
            Ok(()) => Plausibility::InRange,
            Err(SignalError::ImplausiblePulse { min_us, .. }) if duration_us < min_us => {
                Plausibility::TooShort
            }
            Err(_) => Plausibility::TooLong,
        }
    }

    pub fn min_us(&self) -> u64 {
        self.min_us
    }

    pub fn max_us(&self) -> u64 {
        self.max_us
    }
}

impl Validator for PlausibilityFilter {
    type Value = u64;

    fn validate(&self, value: Self::Value) -> SignalResult<()> {
        utils::check_range(value, self.min_us, self.max_us)
    }

    fn constraints(&self) -> ValidatorConstraints<u64> {
        ValidatorConstraints {
            min_value: self.min_us,
            max_value: self.max_us,
        }
    }
}
