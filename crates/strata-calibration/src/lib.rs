//! # Strata Calibration
//!
//! Calibration of curves and model parameters to market instruments.
//!
//! This crate provides:
//!
//! - **Curve building**: [`MulticurveBuilder`] solves units of interdependent
//!   curves with a Newton-type root finder and records, for each calibrated
//!   curve, the sensitivity of its parameters to the market quotes of the
//!   instruments used
//! - **LMM calibration**: [`SuccessiveRootFinderCalibrationEngine`] fits the
//!   volatilities of a displaced-diffusion LMM to a strip of swaptions, one
//!   volatility multiplier per swaption
//!
//! ## Example
//!
//! ```rust
//! use strata_calibration::prelude::*;
//! use strata_core::Currency;
//! use strata_curves::{CurveBuildingBlockBundle, MarketBundle, MulticurveProvider};
//! use strata_pricing::{Cash, InstrumentDerivative};
//!
//! let deposits: Vec<InstrumentDerivative> = [(0.5, 0.020), (1.0, 0.022)]
//!     .iter()
//!     .map(|&(end, rate)| Cash::new(Currency::USD, 0.0, end, 1.0, rate, end).unwrap().into())
//!     .collect();
//! let curve = CurveDefinition::new(
//!     "USD_DISC",
//!     vec![0.5, 1.0],
//!     vec![CurveRole::Discounting { currency: Currency::USD }],
//!     deposits,
//! );
//!
//! let builder = MulticurveBuilder::with_defaults().unwrap();
//! let (market, bundle) = builder
//!     .make_curves_from_derivatives(
//!         &[CalibrationUnit::single(curve)],
//!         &MulticurveProvider::new(),
//!         &CurveBuildingBlockBundle::new(),
//!     )
//!     .unwrap();
//!
//! let df = market.discount_factor(Currency::USD, 1.0).unwrap();
//! assert!((df - 1.0 / 1.022).abs() < 1e-8);
//! assert!(bundle.block("USD_DISC").is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::similar_names)]

pub mod curve_building;
pub mod error;
pub mod lmm;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curve_building::{
        CalibrationUnit, CurveDefinition, CurveRole, MulticurveBuilder, TargetCalculator,
    };
    pub use crate::error::{CalibrationError, CalibrationResult};
    pub use crate::lmm::{
        CalibratedSwaption, LmmCalibrationResult, SuccessiveRootFinderCalibrationEngine,
        SwaptionPhysicalLmmDdCalibrationObjective,
    };
}

pub use curve_building::{
    CalibrationUnit, CurveDefinition, CurveRole, MulticurveBuilder, TargetCalculator,
};
pub use error::{CalibrationError, CalibrationResult};
pub use lmm::{
    CalibratedSwaption, LmmCalibrationResult, SuccessiveRootFinderCalibrationEngine,
    SwaptionPhysicalLmmDdCalibrationObjective,
};
