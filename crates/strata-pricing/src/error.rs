//! Error types for pricing.

use strata_core::CoreError;
use strata_curves::CurveError;
use strata_math::MathError;
use thiserror::Error;

/// Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while building or pricing instruments.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    /// Malformed instrument (empty leg, mixed currencies, bad times).
    #[error("Invalid instrument: {reason}")]
    InvalidInstrument {
        /// Description of the problem.
        reason: String,
    },

    /// Model parameters cannot price the instrument.
    #[error("Incompatible model: {reason}")]
    IncompatibleModel {
        /// Description of the mismatch.
        reason: String,
    },

    /// Invalid model parameters.
    #[error("Invalid model parameters: {reason}")]
    InvalidParameters {
        /// Description of the problem.
        reason: String,
    },

    /// Curve lookup or evaluation failed.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Numerical failure.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Amount arithmetic failed.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl PricingError {
    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            reason: reason.into(),
        }
    }

    /// Creates an incompatible model error.
    #[must_use]
    pub fn incompatible_model(reason: impl Into<String>) -> Self {
        Self::IncompatibleModel {
            reason: reason.into(),
        }
    }

    /// Creates an invalid parameters error.
    #[must_use]
    pub fn invalid_parameters(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }
}
