//! # Strata Pricing
//!
//! Interest-rate instruments and the calculators that price them off a
//! [`strata_curves::MarketBundle`].
//!
//! This crate provides:
//!
//! - **Instruments**: the closed [`InstrumentDerivative`] tree of payments,
//!   coupons, deposits, FRAs, annuities and swaps, plus physical swaptions
//! - **Methods**: one discounting method per leaf instrument
//! - **Calculators**: present value, curve sensitivity, par spread, par spread
//!   sensitivity and cash-flow equivalents over the whole tree
//! - **Models**: Black formula and displaced-diffusion LMM parameters
//! - **Swaptions**: Black and LMM pricing methods
//!
//! ## Example
//!
//! ```rust
//! use strata_core::Currency;
//! use strata_curves::{IborIndex, MulticurveProvider, YieldCurve};
//! use strata_pricing::prelude::*;
//!
//! let index = IborIndex::new("USD_LIBOR_3M", Currency::USD, 3);
//! let mut market = MulticurveProvider::new();
//! market.set_discount_curve(Currency::USD, YieldCurve::flat("USD_DISC", 0.02).unwrap());
//! market.set_ibor_curve(index.clone(), YieldCurve::flat("USD_FWD3M", 0.025).unwrap());
//!
//! let swap = fixed_ibor_swap(&index, 0.0, 2.0, 0.5, 1_000_000.0, 0.02, true).unwrap();
//! let swap = InstrumentDerivative::from(swap);
//!
//! let pv = PresentValueDiscountingCalculator::new()
//!     .present_value(&swap, &market)
//!     .unwrap();
//! assert!(pv.amount(Currency::USD) > 0.0);
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
#![allow(clippy::float_cmp)]

pub mod calculator;
pub mod error;
pub mod instrument;
pub mod method;
pub mod model;
pub mod swaption;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calculator::{
        CashFlowEquivalentCalculator, ParSpreadMarketQuoteCurveSensitivityDiscountingCalculator,
        ParSpreadMarketQuoteDiscountingCalculator,
        PresentValueCurveSensitivityDiscountingCalculator, PresentValueDiscountingCalculator,
    };
    pub use crate::error::{PricingError, PricingResult};
    pub use crate::instrument::builder::{
        fixed_annuity, fixed_ibor_swap, fixed_overnight_swap, ibor_annuity, overnight_annuity,
    };
    pub use crate::instrument::{
        Annuity, Cash, CashFlow, CouponFixed, CouponIbor, CouponOn, FixingPeriod, Fra,
        InstrumentDerivative, Payment, PaymentFixed, Swap,
    };
    pub use crate::model::LmmDdParameters;
    pub use crate::swaption::{
        SwaptionPhysicalBlackMethod, SwaptionPhysicalFixedIbor, SwaptionPhysicalLmmDdMethod,
        SwaptionPhysicalPricingMethod,
    };
}

pub use calculator::{
    CashFlowEquivalentCalculator, ParSpreadMarketQuoteCurveSensitivityDiscountingCalculator,
    ParSpreadMarketQuoteDiscountingCalculator, PresentValueCurveSensitivityDiscountingCalculator,
    PresentValueDiscountingCalculator,
};
pub use error::{PricingError, PricingResult};
pub use instrument::{
    Annuity, Cash, CashFlow, CouponFixed, CouponIbor, CouponOn, FixingPeriod, Fra,
    InstrumentDerivative, Payment, PaymentFixed, Swap,
};
pub use model::LmmDdParameters;
pub use swaption::{
    SwaptionPhysicalBlackMethod, SwaptionPhysicalFixedIbor, SwaptionPhysicalLmmDdMethod,
    SwaptionPhysicalPricingMethod,
};
