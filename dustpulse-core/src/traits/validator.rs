//! Validator trait for single measured quantities
//!
//! Kept deliberately small: a validator looks at one value and either
//! accepts it or explains why not. What the caller does with the
//! explanation (drop, log, count) is its own business.

use crate::errors::SignalResult;

/// Core validator trait
pub trait Validator {
    /// The type of value this validator handles
    type Value;

    /// Validate a single value
    fn validate(&self, value: Self::Value) -> SignalResult<()>;

    /// Inclusive bounds this validator enforces
    fn constraints(&self) -> ValidatorConstraints<Self::Value>;
}

/// Inclusive range enforced by a validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConstraints<T> {
    /// Minimum valid value
    pub min_value: T,

    /// Maximum valid value
    pub max_value: T,
}
