//! Market description files.
//!
//! A market file lists calibration units in solve order. Each curve gives its
//! roles and one quote per node; node times are the quotes' maturities.
//!
//! ```toml
//! [[units]]
//! [[units.curves]]
//! name = "USD_DISC"
//! roles = [{ role = "discounting", currency = "USD" }]
//! quotes = [
//!     { type = "deposit", currency = "USD", end = 0.5, rate = 0.018 },
//!     { type = "deposit", currency = "USD", end = 1.0, rate = 0.019 },
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_calibration::{CalibrationUnit, CurveDefinition, CurveRole};
use strata_config::ConfigFormat;
use strata_core::Currency;
use strata_curves::{IborIndex, OvernightIndex};
use strata_pricing::instrument::builder::{fixed_ibor_swap, fixed_overnight_swap};
use strata_pricing::{Cash, FixingPeriod, Fra, InstrumentDerivative, PricingResult};

use crate::error::{CliError, CliResult};

/// A market quote on a unit notional.
///
/// Swaps pay the fixed rate; the calibrated curves make every quote worth zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Quote {
    /// Deposit over `[start, end]`.
    Deposit {
        /// Currency.
        currency: Currency,
        /// Start time.
        #[serde(default)]
        start: f64,
        /// End time.
        end: f64,
        /// Deposit rate.
        rate: f64,
    },
    /// FRA on one period of the index starting at `start`.
    Fra {
        /// Index.
        index: IborIndex,
        /// Start of the rate period.
        start: f64,
        /// FRA rate.
        rate: f64,
    },
    /// Fixed against Ibor swap.
    IborSwap {
        /// Floating index.
        index: IborIndex,
        /// Start time.
        #[serde(default)]
        start: f64,
        /// Swap length.
        tenor: f64,
        /// Fixed leg period.
        fixed_period: f64,
        /// Fixed rate.
        rate: f64,
    },
    /// Fixed against overnight swap.
    OisSwap {
        /// Overnight index.
        index: OvernightIndex,
        /// Start time.
        #[serde(default)]
        start: f64,
        /// Swap length.
        tenor: f64,
        /// Period of both legs.
        period: f64,
        /// Fixed rate.
        rate: f64,
    },
}

impl Quote {
    /// Instrument whose calibration target is zero at the quote.
    pub fn to_instrument(&self) -> PricingResult<InstrumentDerivative> {
        Ok(match self {
            Quote::Deposit {
                currency,
                start,
                end,
                rate,
            } => Cash::new(*currency, *start, *end, 1.0, *rate, end - start)?.into(),
            Quote::Fra { index, start, rate } => {
                let length = f64::from(index.tenor_months()) / 12.0;
                let fixing = FixingPeriod::new(*start, start + length, length)?;
                Fra::new(*start, length, 1.0, index.clone(), fixing, *rate)?.into()
            }
            Quote::IborSwap {
                index,
                start,
                tenor,
                fixed_period,
                rate,
            } => fixed_ibor_swap(index, *start, *tenor, *fixed_period, 1.0, *rate, true)?.into(),
            Quote::OisSwap {
                index,
                start,
                tenor,
                period,
                rate,
            } => fixed_overnight_swap(index, *start, *tenor, *period, 1.0, *rate, true)?.into(),
        })
    }
}

/// A curve: name, roles and node quotes in increasing maturity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    /// Curve name.
    pub name: String,
    /// Roles of the curve in the market.
    #[serde(default)]
    pub roles: Vec<CurveRole>,
    /// One quote per node.
    pub quotes: Vec<Quote>,
}

impl CurveSpec {
    fn to_definition(&self) -> CliResult<CurveDefinition> {
        let instruments = self
            .quotes
            .iter()
            .enumerate()
            .map(|(index, quote)| {
                quote.to_instrument().map_err(|e| CliError::InvalidQuote {
                    curve: self.name.clone(),
                    index,
                    message: e.to_string(),
                })
            })
            .collect::<CliResult<Vec<_>>>()?;
        let times = instruments.iter().map(InstrumentDerivative::maturity).collect();
        Ok(CurveDefinition::new(
            self.name.clone(),
            times,
            self.roles.clone(),
            instruments,
        ))
    }
}

/// Curves solved together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Curves of the unit.
    pub curves: Vec<CurveSpec>,
}

/// Contents of a market file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketFile {
    /// Units in solve order.
    pub units: Vec<UnitSpec>,
}

impl MarketFile {
    /// Reads a TOML or JSON market file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let format = ConfigFormat::from_path(path)
            .map_err(|_| CliError::UnsupportedFormat(path.to_path_buf()))?;
        let content = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let invalid = |message: String| CliError::InvalidMarket {
            path: path.to_path_buf(),
            message,
        };
        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| invalid(e.to_string())),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
            }
        }
    }

    /// Calibration units with the quotes turned into instruments.
    pub fn units(&self) -> CliResult<Vec<CalibrationUnit>> {
        self.units
            .iter()
            .map(|unit| {
                let curves = unit
                    .curves
                    .iter()
                    .map(CurveSpec::to_definition)
                    .collect::<CliResult<Vec<_>>>()?;
                Ok(CalibrationUnit::new(curves))
            })
            .collect()
    }
}
