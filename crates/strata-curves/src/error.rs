//! Error types for curve operations.

use strata_core::Currency;
use strata_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// No curve with this name is known.
    #[error("Curve not found: {name}")]
    CurveNotFound {
        /// Name of the missing curve.
        name: String,
    },

    /// No discounting curve is attached to the currency.
    #[error("No discounting curve for currency {currency}")]
    DiscountingCurveNotFound {
        /// Currency without a discounting curve.
        currency: Currency,
    },

    /// No forward curve is attached to the index.
    #[error("No forward curve for index {index}")]
    IndexNotFound {
        /// Name of the index.
        index: String,
    },

    /// Invalid value (NaN, Inf, inconsistent sizes or overlapping slices).
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of why the value is invalid.
        reason: String,
    },

    /// Error from the numerical layer.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl CurveError {
    /// Creates a curve not found error.
    #[must_use]
    pub fn curve_not_found(name: impl Into<String>) -> Self {
        Self::CurveNotFound { name: name.into() }
    }

    /// Creates an index not found error.
    #[must_use]
    pub fn index_not_found(index: impl Into<String>) -> Self {
        Self::IndexNotFound {
            index: index.into(),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::curve_not_found("USD_DISC");
        assert_eq!(err.to_string(), "Curve not found: USD_DISC");

        let err = CurveError::DiscountingCurveNotFound {
            currency: Currency::EUR,
        };
        assert!(err.to_string().contains("EUR"));
    }

    #[test]
    fn test_from_math_error() {
        let err: CurveError = MathError::singular("LU").into();
        assert!(matches!(err, CurveError::Math(_)));
    }
}
