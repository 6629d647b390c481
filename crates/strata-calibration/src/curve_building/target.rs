//! Value and sensitivity of the quantity driven to zero by curve building.

use strata_config::CalibrationTarget;
use strata_curves::{MarketBundle, MulticurveSensitivity};
use strata_pricing::{
    InstrumentDerivative, ParSpreadMarketQuoteCurveSensitivityDiscountingCalculator,
    ParSpreadMarketQuoteDiscountingCalculator, PresentValueCurveSensitivityDiscountingCalculator,
    PresentValueDiscountingCalculator, PricingResult,
};

/// Evaluates the calibration target of an instrument and its curve
/// sensitivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetCalculator {
    target: CalibrationTarget,
    present_value: PresentValueDiscountingCalculator,
    present_value_sensitivity: PresentValueCurveSensitivityDiscountingCalculator,
    par_spread: ParSpreadMarketQuoteDiscountingCalculator,
    par_spread_sensitivity: ParSpreadMarketQuoteCurveSensitivityDiscountingCalculator,
}

impl TargetCalculator {
    /// Creates a calculator for `target`.
    #[must_use]
    pub fn new(target: CalibrationTarget) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// The target.
    pub fn target(&self) -> CalibrationTarget {
        self.target
    }

    /// Value of the target; zero when the instrument is repriced.
    pub fn value<M: MarketBundle + ?Sized>(
        &self,
        instrument: &InstrumentDerivative,
        market: &M,
    ) -> PricingResult<f64> {
        match self.target {
            CalibrationTarget::ParSpreadMarketQuote => self.par_spread.par_spread(instrument, market),
            CalibrationTarget::PresentValue => Ok(self
                .present_value
                .present_value(instrument, market)?
                .amount(instrument.currency())),
        }
    }

    /// Point sensitivity of the target.
    pub fn sensitivity<M: MarketBundle + ?Sized>(
        &self,
        instrument: &InstrumentDerivative,
        market: &M,
    ) -> PricingResult<MulticurveSensitivity> {
        match self.target {
            CalibrationTarget::ParSpreadMarketQuote => self
                .par_spread_sensitivity
                .par_spread_curve_sensitivity(instrument, market),
            CalibrationTarget::PresentValue => Ok(self
                .present_value_sensitivity
                .present_value_curve_sensitivity(instrument, market)?
                .get(instrument.currency())
                .cloned()
                .unwrap_or_default()),
        }
    }
}
