//! Curve building and LMM calibration settings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

// =============================================================================
// CURVE BUILDING
// =============================================================================

/// Quantity driven to zero when calibrating curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationTarget {
    /// Par spread in market-quote convention. Residuals are in rate units,
    /// which keeps the Newton system well scaled.
    #[default]
    ParSpreadMarketQuote,
    /// Present value in the instrument's currency.
    PresentValue,
}

impl fmt::Display for CalibrationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParSpreadMarketQuote => f.write_str("par_spread_market_quote"),
            Self::PresentValue => f.write_str("present_value"),
        }
    }
}

/// Settings of the multi-curve builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CurveBuildingConfig {
    /// Calibration target.
    pub target: CalibrationTarget,
}

impl Validate for CurveBuildingConfig {
    fn validate(&self) -> Vec<ValidationError> {
        Vec::new()
    }
}

// =============================================================================
// LMM CALIBRATION
// =============================================================================

/// Default lower bound of the volatility multiplier.
pub const DEFAULT_MIN_MULTIPLIER: f64 = 0.1;

/// Default upper bound of the volatility multiplier.
pub const DEFAULT_MAX_MULTIPLIER: f64 = 10.0;

/// Default accuracy required on the calibrated price.
pub const DEFAULT_FUNCTION_ACCURACY: f64 = 1e-4;

/// Default accuracy on the multiplier.
pub const DEFAULT_VARIABLE_ACCURACY: f64 = 1e-9;

/// Settings of the successive LMM volatility calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LmmCalibrationConfig {
    /// Lower bound of the multiplier search.
    pub min_multiplier: f64,
    /// Upper bound of the multiplier search.
    pub max_multiplier: f64,
    /// Largest accepted absolute price error at the solution.
    pub function_accuracy: f64,
    /// Tolerance on the multiplier.
    pub variable_accuracy: f64,
    /// Iteration cap of the scalar solver.
    pub max_iterations: u32,
}

impl Default for LmmCalibrationConfig {
    fn default() -> Self {
        Self {
            min_multiplier: DEFAULT_MIN_MULTIPLIER,
            max_multiplier: DEFAULT_MAX_MULTIPLIER,
            function_accuracy: DEFAULT_FUNCTION_ACCURACY,
            variable_accuracy: DEFAULT_VARIABLE_ACCURACY,
            max_iterations: 100,
        }
    }
}

impl LmmCalibrationConfig {
    /// Sets the multiplier bounds.
    #[must_use]
    pub fn with_multiplier_range(mut self, min: f64, max: f64) -> Self {
        self.min_multiplier = min;
        self.max_multiplier = max;
        self
    }

    /// Sets the accuracies on the price and on the multiplier.
    #[must_use]
    pub fn with_accuracy(mut self, function: f64, variable: f64) -> Self {
        self.function_accuracy = function;
        self.variable_accuracy = variable;
        self
    }
}

impl Validate for LmmCalibrationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.min_multiplier.is_finite() && self.min_multiplier > 0.0) {
            errors.push(ValidationError::with_rule(
                "min_multiplier",
                "Minimum multiplier must be positive",
                "positive_multiplier",
            ));
        }

        if !(self.max_multiplier.is_finite() && self.max_multiplier > self.min_multiplier) {
            errors.push(ValidationError::with_rule(
                "max_multiplier",
                "Maximum multiplier must exceed the minimum",
                "ordered_bounds",
            ));
        }

        if !(self.function_accuracy.is_finite() && self.function_accuracy > 0.0) {
            errors.push(ValidationError::with_rule(
                "function_accuracy",
                "Function accuracy must be positive",
                "positive_tolerance",
            ));
        }

        if !(self.variable_accuracy.is_finite() && self.variable_accuracy > 0.0) {
            errors.push(ValidationError::with_rule(
                "variable_accuracy",
                "Variable accuracy must be positive",
                "positive_tolerance",
            ));
        }

        if self.max_iterations == 0 {
            errors.push(ValidationError::new(
                "max_iterations",
                "Max iterations must be positive",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lmm_defaults() {
        let config = LmmCalibrationConfig::default();
        assert!((config.min_multiplier - 0.1).abs() < f64::EPSILON);
        assert!((config.max_multiplier - 10.0).abs() < f64::EPSILON);
        assert!((config.function_accuracy - 1e-4).abs() < f64::EPSILON);
        assert!((config.variable_accuracy - 1e-9).abs() < f64::EPSILON);
        assert!(config.is_valid());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = LmmCalibrationConfig::default().with_multiplier_range(2.0, 1.0);
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "max_multiplier");
    }

    #[test]
    fn test_non_positive_bounds_rejected() {
        let config = LmmCalibrationConfig::default().with_multiplier_range(0.0, 10.0);
        assert_eq!(config.validate()[0].field, "min_multiplier");
    }

    #[test]
    fn test_target_serde() {
        let json = serde_json::to_string(&CalibrationTarget::PresentValue).unwrap();
        assert_eq!(json, "\"present_value\"");
        let config: CurveBuildingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.target, CalibrationTarget::ParSpreadMarketQuote);
    }
}
