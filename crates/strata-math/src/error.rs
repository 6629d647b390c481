//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Scalar root-finding algorithm failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Vector root finder stopped without meeting its tolerances.
    ///
    /// Carries the last estimate so callers can inspect how far the
    /// iteration got.
    #[error("Root not found after {iterations} iterations (residual norm: {residual_norm:.2e})")]
    RootNotFound {
        /// Number of iterations attempted.
        iterations: u32,
        /// Norm of the function value at the last estimate.
        residual_norm: f64,
        /// Last estimate of the root.
        estimate: Vec<f64>,
    },

    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Matrix is singular or numerically singular.
    #[error("Singular matrix: {decomposition} decomposition failed")]
    SingularMatrix {
        /// Name of the decomposition that detected the singularity.
        decomposition: &'static str,
    },

    /// Matrix dimensions are incompatible.
    #[error("Incompatible matrix dimensions: ({rows1}x{cols1}) and ({rows2}x{cols2})")]
    DimensionMismatch {
        /// Rows in first operand.
        rows1: usize,
        /// Columns in first operand.
        cols1: usize,
        /// Rows in second operand.
        rows2: usize,
        /// Columns in second operand.
        cols2: usize,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates a root not found error.
    #[must_use]
    pub fn root_not_found(iterations: u32, residual_norm: f64, estimate: Vec<f64>) -> Self {
        Self::RootNotFound {
            iterations,
            residual_norm,
            estimate,
        }
    }

    /// Creates a singular matrix error.
    #[must_use]
    pub fn singular(decomposition: &'static str) -> Self {
        Self::SingularMatrix { decomposition }
    }

    /// Creates a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(lhs: (usize, usize), rhs: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            rows1: lhs.0,
            cols1: lhs.1,
            rows2: rhs.0,
            cols2: rhs.1,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Returns true for errors caused by a singular matrix.
    #[must_use]
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::SingularMatrix { .. })
    }
}
