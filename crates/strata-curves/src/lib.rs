//! # Strata Curves
//!
//! Yield curves and the multi-curve market data built from them.
//!
//! This crate provides:
//!
//! - **Curves**: [`YieldCurve`] (zero rates at nodes, linear interpolation,
//!   flat extrapolation) and [`PriceIndexCurve`]
//! - **Indices**: [`IborIndex`] and [`OvernightIndex`]
//! - **Market data**: the [`MarketBundle`] trait and its
//!   [`MulticurveProvider`] implementation
//! - **Sensitivities**: point sensitivities ([`MulticurveSensitivity`]),
//!   parameter sensitivities and market-quote sensitivities
//! - **Building blocks**: [`CurveBuildingBlock`] and
//!   [`CurveBuildingBlockBundle`], the layout and Jacobians produced by
//!   simultaneous curve calibration
//!
//! ## Example
//!
//! ```rust
//! use strata_core::Currency;
//! use strata_curves::prelude::*;
//!
//! let mut provider = MulticurveProvider::new();
//! provider.set_discount_curve(
//!     Currency::USD,
//!     YieldCurve::new("USD_DISC", vec![1.0, 10.0], vec![0.02, 0.03]).unwrap(),
//! );
//!
//! let df = provider.discount_factor(Currency::USD, 1.0).unwrap();
//! assert!((df - (-0.02_f64).exp()).abs() < 1e-15);
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

pub mod building_block;
pub mod curve;
pub mod error;
pub mod index;
pub mod market_quote;
pub mod parameter_sensitivity;
pub mod provider;
pub mod sensitivity;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::building_block::{CurveBuildingBlock, CurveBuildingBlockBundle};
    pub use crate::curve::{CurveNodes, PriceIndexCurve, YieldCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::index::{IborIndex, OvernightIndex};
    pub use crate::market_quote::MarketQuoteSensitivityBlockCalculator;
    pub use crate::parameter_sensitivity::{
        MultipleCurrencyParameterSensitivity, ParameterSensitivityCalculator,
    };
    pub use crate::provider::{MarketBundle, MulticurveProvider};
    pub use crate::sensitivity::{
        ForwardSensitivity, MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity,
    };
}

pub use building_block::{CurveBuildingBlock, CurveBuildingBlockBundle};
pub use curve::{CurveNodes, PriceIndexCurve, YieldCurve};
pub use error::{CurveError, CurveResult};
pub use index::{IborIndex, OvernightIndex};
pub use market_quote::MarketQuoteSensitivityBlockCalculator;
pub use parameter_sensitivity::{
    MultipleCurrencyParameterSensitivity, ParameterSensitivityCalculator,
};
pub use provider::{MarketBundle, MulticurveProvider};
pub use sensitivity::{
    ForwardSensitivity, MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity,
};
