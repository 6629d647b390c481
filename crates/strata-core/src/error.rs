//! Error types for the core types.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised when building or combining core types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Currency code is not a supported ISO 4217 code.
    #[error("Unknown currency code: {code}")]
    UnknownCurrency {
        /// The code that failed to parse.
        code: String,
    },

    /// Two amounts in different currencies were combined as if they were one.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        /// Expected currency code.
        expected: String,
        /// Actual currency code.
        got: String,
    },

    /// An amount is not a finite number.
    #[error("Invalid amount: {reason}")]
    InvalidAmount {
        /// Description of the problem.
        reason: String,
    },
}

impl CoreError {
    /// Creates an unknown currency error.
    #[must_use]
    pub fn unknown_currency(code: impl Into<String>) -> Self {
        Self::UnknownCurrency { code: code.into() }
    }

    /// Creates a currency mismatch error.
    #[must_use]
    pub fn currency_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::CurrencyMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Creates an invalid amount error.
    #[must_use]
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::unknown_currency("XXX");
        assert!(err.to_string().contains("XXX"));

        let err = CoreError::currency_mismatch("USD", "EUR");
        assert!(err.to_string().contains("expected USD, got EUR"));
    }
}
