//! Error types for calibration.

use strata_config::ConfigError;
use strata_curves::CurveError;
use strata_math::MathError;
use strata_pricing::PricingError;
use thiserror::Error;

/// A specialized Result type for calibration operations.
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// Errors raised while building curves or calibrating model parameters.
#[derive(Error, Debug)]
pub enum CalibrationError {
    /// The root finder failed on a calibration step.
    #[error("Root finding failed for {context}: {source}")]
    RootFinding {
        /// The unit or instrument being calibrated.
        context: String,
        /// Underlying solver error.
        #[source]
        source: MathError,
    },

    /// A root was found but the price is further from the target than allowed.
    #[error("Target missed for {context}: residual {residual:.3e} exceeds {accuracy:.3e}")]
    TargetMissed {
        /// The instrument being calibrated.
        context: String,
        /// Absolute price error at the solution.
        residual: f64,
        /// Accepted error.
        accuracy: f64,
    },

    /// A calibration unit is malformed.
    #[error("Invalid calibration unit: {reason}")]
    InvalidUnit {
        /// Description of the problem.
        reason: String,
    },

    /// Pricing error.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Curve error.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Numerical error outside the root finder.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Invalid settings.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CalibrationError {
    /// Creates a root-finding error.
    #[must_use]
    pub fn root_finding(context: impl Into<String>, source: MathError) -> Self {
        Self::RootFinding {
            context: context.into(),
            source,
        }
    }

    /// Creates a target-missed error.
    #[must_use]
    pub fn target_missed(context: impl Into<String>, residual: f64, accuracy: f64) -> Self {
        Self::TargetMissed {
            context: context.into(),
            residual,
            accuracy,
        }
    }

    /// Creates an invalid unit error.
    #[must_use]
    pub fn invalid_unit(reason: impl Into<String>) -> Self {
        Self::InvalidUnit {
            reason: reason.into(),
        }
    }
}
