//! Simultaneous building of interdependent curves.
//!
//! Curves are calibrated unit by unit. A [`CalibrationUnit`] groups the curves
//! that must be solved together, each with the instruments that pin down its
//! nodes. Units are solved in order, so a unit can use every curve built by the
//! units before it.

mod builder;
mod target;

use serde::{Deserialize, Serialize};
use strata_core::Currency;
use strata_curves::{CurveNodes, IborIndex, MulticurveProvider, OvernightIndex, YieldCurve};
use strata_pricing::InstrumentDerivative;

use crate::error::{CalibrationError, CalibrationResult};

pub use builder::MulticurveBuilder;
pub use target::TargetCalculator;

/// What a calibrated curve is used for in the market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum CurveRole {
    /// Discounts cash flows in a currency.
    Discounting {
        /// The currency.
        currency: Currency,
    },
    /// Projects an Ibor index.
    Ibor {
        /// The index.
        index: IborIndex,
    },
    /// Projects an overnight index.
    Overnight {
        /// The index.
        index: OvernightIndex,
    },
}

/// One curve to calibrate: its nodes, roles and calibrating instruments.
///
/// There must be exactly one instrument per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveDefinition {
    /// Curve name and node times.
    #[serde(flatten)]
    pub nodes: CurveNodes,
    /// Roles of the curve.
    pub roles: Vec<CurveRole>,
    /// Calibrating instruments, one per node.
    pub instruments: Vec<InstrumentDerivative>,
    /// Starting zero rates; zeros when absent.
    #[serde(default)]
    pub initial_guess: Option<Vec<f64>>,
}

impl CurveDefinition {
    /// Creates a definition with a zero initial guess.
    pub fn new(
        name: impl Into<String>,
        times: Vec<f64>,
        roles: Vec<CurveRole>,
        instruments: Vec<InstrumentDerivative>,
    ) -> Self {
        Self {
            nodes: CurveNodes {
                name: name.into(),
                times,
            },
            roles,
            instruments,
            initial_guess: None,
        }
    }

    /// Sets the initial guess.
    #[must_use]
    pub fn with_initial_guess(mut self, guess: Vec<f64>) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    /// Curve name.
    pub fn name(&self) -> &str {
        &self.nodes.name
    }

    /// Number of nodes, which is the number of parameters.
    pub fn number_of_parameters(&self) -> usize {
        self.nodes.times.len()
    }

    fn initial_parameters(&self) -> Vec<f64> {
        self.initial_guess
            .clone()
            .unwrap_or_else(|| vec![0.0; self.number_of_parameters()])
    }

    fn validate(&self) -> CalibrationResult<()> {
        let n = self.number_of_parameters();
        if n == 0 {
            return Err(CalibrationError::invalid_unit(format!(
                "curve {} has no node",
                self.name()
            )));
        }
        if self.instruments.len() != n {
            return Err(CalibrationError::invalid_unit(format!(
                "curve {} has {n} nodes but {} instruments",
                self.name(),
                self.instruments.len()
            )));
        }
        if let Some(guess) = &self.initial_guess {
            if guess.len() != n {
                return Err(CalibrationError::invalid_unit(format!(
                    "curve {} has {n} nodes but an initial guess of length {}",
                    self.name(),
                    guess.len()
                )));
            }
        }
        Ok(())
    }

    /// Adds the curve with the given zero rates to `provider` under each role.
    fn install(&self, provider: &mut MulticurveProvider, rates: Vec<f64>) -> CalibrationResult<()> {
        let curve = YieldCurve::new(self.name(), self.nodes.times.clone(), rates)?;
        if self.roles.is_empty() {
            provider.set_curve(curve);
            return Ok(());
        }
        for role in &self.roles {
            match role {
                CurveRole::Discounting { currency } => {
                    provider.set_discount_curve(*currency, curve.clone());
                }
                CurveRole::Ibor { index } => provider.set_ibor_curve(index.clone(), curve.clone()),
                CurveRole::Overnight { index } => {
                    provider.set_overnight_curve(index.clone(), curve.clone());
                }
            }
        }
        Ok(())
    }
}

/// Curves calibrated together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationUnit {
    /// The curves, in parameter order.
    pub curves: Vec<CurveDefinition>,
}

impl CalibrationUnit {
    /// Creates a unit.
    pub fn new(curves: Vec<CurveDefinition>) -> Self {
        Self { curves }
    }

    /// Unit made of a single curve.
    pub fn single(curve: CurveDefinition) -> Self {
        Self::new(vec![curve])
    }

    /// Curve names in parameter order.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.curves.iter().map(CurveDefinition::name)
    }

    /// Total number of parameters.
    pub fn number_of_parameters(&self) -> usize {
        self.curves.iter().map(CurveDefinition::number_of_parameters).sum()
    }

    /// Calibrating instruments in parameter order.
    pub fn instruments(&self) -> impl Iterator<Item = &InstrumentDerivative> {
        self.curves.iter().flat_map(|c| c.instruments.iter())
    }

    fn validate(&self) -> CalibrationResult<()> {
        if self.curves.is_empty() {
            return Err(CalibrationError::invalid_unit("unit has no curve"));
        }
        for (i, curve) in self.curves.iter().enumerate() {
            curve.validate()?;
            if self.curves[..i].iter().any(|c| c.name() == curve.name()) {
                return Err(CalibrationError::invalid_unit(format!(
                    "curve {} appears twice in the unit",
                    curve.name()
                )));
            }
        }
        Ok(())
    }
}
