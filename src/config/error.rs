//! Configuration store error types.
//!
//! Invalid values are rejected at the store boundary and never reach the
//! timer engine. A rejected update leaves every stored value untouched.

use thiserror::Error;

/// Errors returned when updating the configuration store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration was zero, negative, non-numeric or too large.
    #[error("invalid {field} duration: {reason}")]
    InvalidDuration {
        /// Which duration was rejected ("focus", "short break", "long break").
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// The number of cycles before a long break was zero.
    #[error("cycles before a long break must be at least 1 (got {0})")]
    InvalidCycleThreshold(u32),
}

impl ConfigError {
    pub(crate) fn duration(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true if this error rejected a duration.
    #[must_use]
    pub fn is_invalid_duration(&self) -> bool {
        matches!(self, Self::InvalidDuration { .. })
    }

    /// Returns the name of the rejected field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidDuration { field, .. } => field,
            Self::InvalidCycleThreshold(_) => "cycles before long break",
        }
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } => "enter whole minutes greater than zero",
            Self::InvalidCycleThreshold(_) => "enter a cycle count of 1 or more",
        }
    }
}
