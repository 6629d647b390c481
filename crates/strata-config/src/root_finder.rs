//! Vector root finder settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_math::linear_algebra::DecompositionKind;
use strata_math::rootfinding::{
    NewtonVectorRootFinder, DEFAULT_ABSOLUTE_TOLERANCE, DEFAULT_MAX_STEPS,
    DEFAULT_RELATIVE_TOLERANCE,
};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// JACOBIAN STRATEGY
// =============================================================================

/// How the Newton solver maintains its Jacobian estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JacobianStrategy {
    /// Re-evaluate the Jacobian at every step.
    #[default]
    Newton,
    /// Rank-one updates of the Jacobian.
    Broyden,
    /// Rank-one updates of the inverse Jacobian.
    ShermanMorrison,
}

impl fmt::Display for JacobianStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Newton => "newton",
            Self::Broyden => "broyden",
            Self::ShermanMorrison => "sherman_morrison",
        };
        f.write_str(name)
    }
}

impl FromStr for JacobianStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "newton" => Ok(Self::Newton),
            "broyden" => Ok(Self::Broyden),
            "sherman_morrison" => Ok(Self::ShermanMorrison),
            other => Err(ConfigError::validation(
                "strategy",
                format!("unknown Jacobian strategy '{other}'"),
            )),
        }
    }
}

// =============================================================================
// ROOT FINDER CONFIGURATION
// =============================================================================

/// Settings of the Newton-type vector root finder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootFinderConfig {
    /// Absolute tolerance on the residual norm and the step.
    pub absolute_tolerance: f64,
    /// Relative tolerance on the step.
    pub relative_tolerance: f64,
    /// Maximum number of Newton steps.
    pub max_steps: u32,
    /// Jacobian strategy.
    pub strategy: JacobianStrategy,
    /// Decomposition used to solve the Newton systems.
    pub decomposition: DecompositionKind,
}

impl Default for RootFinderConfig {
    fn default() -> Self {
        Self {
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            max_steps: DEFAULT_MAX_STEPS,
            strategy: JacobianStrategy::default(),
            decomposition: DecompositionKind::default(),
        }
    }
}

impl RootFinderConfig {
    /// Sets the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: JacobianStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the decomposition.
    #[must_use]
    pub fn with_decomposition(mut self, decomposition: DecompositionKind) -> Self {
        self.decomposition = decomposition;
        self
    }

    /// Sets both tolerances.
    #[must_use]
    pub fn with_tolerances(mut self, absolute: f64, relative: f64) -> Self {
        self.absolute_tolerance = absolute;
        self.relative_tolerance = relative;
        self
    }

    /// Builds the configured root finder.
    pub fn root_finder(&self) -> ConfigResult<NewtonVectorRootFinder> {
        self.validate_or_error()?;
        let decomposition = self.decomposition.decomposition();
        let finder = match self.strategy {
            JacobianStrategy::Newton => NewtonVectorRootFinder::newton_default(
                self.absolute_tolerance,
                self.relative_tolerance,
                self.max_steps,
                decomposition,
            ),
            JacobianStrategy::Broyden => NewtonVectorRootFinder::broyden(
                self.absolute_tolerance,
                self.relative_tolerance,
                self.max_steps,
                decomposition,
            ),
            JacobianStrategy::ShermanMorrison => NewtonVectorRootFinder::sherman_morrison(
                self.absolute_tolerance,
                self.relative_tolerance,
                self.max_steps,
                decomposition,
            ),
        }?;
        Ok(finder)
    }
}

impl Validate for RootFinderConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.absolute_tolerance.is_finite() && self.absolute_tolerance > 0.0) {
            errors.push(ValidationError::with_rule(
                "absolute_tolerance",
                "Absolute tolerance must be positive",
                "positive_tolerance",
            ));
        }

        if !(self.relative_tolerance.is_finite() && self.relative_tolerance >= 0.0) {
            errors.push(ValidationError::with_rule(
                "relative_tolerance",
                "Relative tolerance must be non-negative",
                "non_negative_tolerance",
            ));
        }

        if self.max_steps == 0 || self.max_steps > 10_000 {
            errors.push(ValidationError::with_rule(
                "max_steps",
                "Max steps must be between 1 and 10000",
                "valid_steps",
            ));
        }

        errors
    }
}
