//! Error types shared across the crate.
//!
//! Only [`ConfigError`] is ever returned to callers of the sampler. [`OutOfSupport`] and
//! [`AcceptanceError`] describe numerical conditions met inside a chain; the chain absorbs
//! them by rejecting the candidate.

use thiserror::Error;

/// A density was evaluated outside the support of its distribution.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("{x} lies outside the support {support}")]
pub struct OutOfSupport {
    /// The offending argument.
    pub x: f64,
    /// Human-readable description of the support, e.g. `"(0, inf)"`.
    pub support: &'static str,
}

/// Why an acceptance probability could not be computed.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AcceptanceError {
    #[error("target density undefined: {0}")]
    OutOfSupport(#[from] OutOfSupport),
    #[error("degenerate acceptance ratio {numerator} / {denominator}")]
    DegenerateRatio { numerator: f64, denominator: f64 },
}

/// Malformed construction parameters. Raised before any chain runs.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("parameter `{name}` must be strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("parameter `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("the number of collected samples must be positive")]
    EmptyCollection,
    #[error("burn-in {burn_in} plus {collect} collected samples overflows the iteration count")]
    IterationOverflow { burn_in: usize, collect: usize },
    #[error("initial range [{low}, {high}) must be finite and non-empty")]
    InvalidInitRange { low: f64, high: f64 },
}

/// Errors from the two-sample Kolmogorov–Smirnov test.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KsError {
    #[error("sample {0} is empty")]
    EmptySample(usize),
    #[error("KS distribution evaluated at negative z = {0}")]
    NegativeStatistic(f64),
}

impl ConfigError {
    /// Checks that `value` is finite and strictly positive.
    pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite { name, value });
        }
        if value <= 0.0 {
            return Err(ConfigError::NonPositive { name, value });
        }
        Ok(value)
    }

    /// Checks that `value` is finite.
    pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConfigError::NonFinite { name, value })
        }
    }
}
