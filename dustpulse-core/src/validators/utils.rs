//! Shared range helpers

use crate::errors::{SignalError, SignalResult};

/// Check that a pulse width lies in `[min, max]`
pub fn check_range(value: u64, min: u64, max: u64) -> SignalResult<()> {
    if value < min || value > max {
        Err(SignalError::ImplausiblePulse {
            duration_us: value,
            min_us: min,
            max_us: max,
        })
    } else {
        Ok(())
    }
}
