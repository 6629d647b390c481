//! Scalar residual of one swaption in the LMM.

use std::ops::RangeInclusive;

use strata_curves::MarketBundle;
use strata_pricing::{
    LmmDdParameters, PricingError, PricingResult, SwaptionPhysicalFixedIbor,
    SwaptionPhysicalLmmDdMethod,
};

/// Price error of a swaption as a function of a volatility multiplier.
///
/// The multiplier applies to the volatilities of the LMM periods
/// `start_index..=end_index`. Evaluation never modifies the initial
/// parameters, so one objective may be evaluated from several threads.
///
/// # Example
///
/// ```rust
/// use strata_calibration::lmm::SwaptionPhysicalLmmDdCalibrationObjective;
/// use strata_core::Currency;
/// use strata_curves::{IborIndex, MulticurveProvider, YieldCurve};
/// use strata_pricing::prelude::*;
///
/// let index = IborIndex::new("USD_LIBOR_6M", Currency::USD, 6);
/// let mut market = MulticurveProvider::new();
/// market.set_discount_curve(Currency::USD, YieldCurve::flat("USD_DISC", 0.02).unwrap());
/// market.set_ibor_curve(index.clone(), YieldCurve::flat("USD_FWD6M", 0.025).unwrap());
///
/// let swap = fixed_ibor_swap(&index, 1.0, 2.0, 1.0, 1_000_000.0, 0.025, true).unwrap();
/// let swaption = SwaptionPhysicalFixedIbor::new(1.0, 1.0, swap, true).unwrap();
/// let parameters = LmmDdParameters::from_ibor_leg(
///     swaption.underlying().second_leg(), 0.1, 0.01, &[0.2],
/// ).unwrap();
///
/// let price = SwaptionPhysicalLmmDdMethod::new()
///     .present_value(&swaption, &parameters, &market)
///     .unwrap()
///     .amount();
/// let objective = SwaptionPhysicalLmmDdCalibrationObjective::new(
///     &swaption, price, &parameters, &market, 0..=3,
/// ).unwrap();
/// assert!(objective.evaluate(1.0).unwrap().abs() < 1e-9);
/// assert!(objective.evaluate(1.5).unwrap() > 0.0);
/// ```
pub struct SwaptionPhysicalLmmDdCalibrationObjective<'a, M: MarketBundle + ?Sized> {
    method: SwaptionPhysicalLmmDdMethod,
    swaption: &'a SwaptionPhysicalFixedIbor,
    target_price: f64,
    parameters: &'a LmmDdParameters,
    market: &'a M,
    range: RangeInclusive<usize>,
}

impl<'a, M: MarketBundle + ?Sized> SwaptionPhysicalLmmDdCalibrationObjective<'a, M> {
    /// Creates an objective over the periods in `range`.
    pub fn new(
        swaption: &'a SwaptionPhysicalFixedIbor,
        target_price: f64,
        parameters: &'a LmmDdParameters,
        market: &'a M,
        range: RangeInclusive<usize>,
    ) -> PricingResult<Self> {
        if range.is_empty() || *range.end() >= parameters.number_of_periods() {
            return Err(PricingError::invalid_parameters(format!(
                "calibration range {range:?} is outside the {} LMM periods",
                parameters.number_of_periods()
            )));
        }
        if !target_price.is_finite() {
            return Err(PricingError::invalid_parameters(format!(
                "target price must be finite, got {target_price}"
            )));
        }
        Ok(Self {
            method: SwaptionPhysicalLmmDdMethod::new(),
            swaption,
            target_price,
            parameters,
            market,
            range,
        })
    }

    /// First calibrated period.
    pub fn start_index(&self) -> usize {
        *self.range.start()
    }

    /// Last calibrated period, inclusive.
    pub fn end_index(&self) -> usize {
        *self.range.end()
    }

    /// Target price.
    pub fn target_price(&self) -> f64 {
        self.target_price
    }

    /// Parameters before calibration.
    pub fn parameters(&self) -> &LmmDdParameters {
        self.parameters
    }

    /// `price(parameters scaled by x) − target`.
    pub fn evaluate(&self, x: f64) -> PricingResult<f64> {
        let scaled = self.apply(x)?;
        let price = self
            .method
            .present_value(self.swaption, &scaled, self.market)?
            .amount();
        Ok(price - self.target_price)
    }

    /// Parameters with the calibrated periods scaled by `x`.
    pub fn apply(&self, x: f64) -> PricingResult<LmmDdParameters> {
        self.parameters.with_scaled_volatility(self.range.clone(), x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strata_core::Currency;
    use strata_curves::{IborIndex, MulticurveProvider, YieldCurve};
    use strata_pricing::instrument::builder::fixed_ibor_swap;

    fn setup() -> (MulticurveProvider, SwaptionPhysicalFixedIbor, LmmDdParameters) {
        let index = IborIndex::new("EUR_EURIBOR_6M", Currency::EUR, 6);
        let mut market = MulticurveProvider::new();
        market.set_discount_curve(
            Currency::EUR,
            YieldCurve::new("EUR_DISC", vec![1.0, 5.0], vec![0.015, 0.02]).unwrap(),
        );
        market.set_ibor_curve(
            index.clone(),
            YieldCurve::new("EUR_FWD6M", vec![1.0, 5.0], vec![0.02, 0.026]).unwrap(),
        );
        let swap = fixed_ibor_swap(&index, 1.0, 2.0, 1.0, 1_000_000.0, 0.022, true).unwrap();
        let swaption = SwaptionPhysicalFixedIbor::new(1.0, 1.0, swap, true).unwrap();
        let parameters = LmmDdParameters::from_ibor_leg(
            swaption.underlying().second_leg(),
            0.1,
            0.01,
            &[0.2],
        )
        .unwrap();
        (market, swaption, parameters)
    }

    #[test]
    fn test_evaluate_leaves_parameters_untouched() {
        let (market, swaption, parameters) = setup();
        let objective =
            SwaptionPhysicalLmmDdCalibrationObjective::new(&swaption, 0.0, &parameters, &market, 0..=1)
                .unwrap();
        objective.evaluate(2.0).unwrap();
        assert_eq!(objective.parameters(), &parameters);
        assert_eq!(objective.start_index(), 0);
        assert_eq!(objective.end_index(), 1);
    }

    #[test]
    fn test_residual_increases_with_multiplier() {
        let (market, swaption, parameters) = setup();
        let objective =
            SwaptionPhysicalLmmDdCalibrationObjective::new(&swaption, 0.0, &parameters, &market, 0..=3)
                .unwrap();
        let low = objective.evaluate(0.5).unwrap();
        let high = objective.evaluate(2.0).unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_apply_scales_only_the_range() {
        let (market, swaption, parameters) = setup();
        let objective =
            SwaptionPhysicalLmmDdCalibrationObjective::new(&swaption, 0.0, &parameters, &market, 1..=2)
                .unwrap();
        let applied = objective.apply(1.5).unwrap();
        assert_relative_eq!(applied.volatilities()[0][0], 0.2);
        assert_relative_eq!(applied.volatilities()[1][0], 0.3);
        assert_relative_eq!(applied.volatilities()[2][0], 0.3);
        assert_relative_eq!(applied.volatilities()[3][0], 0.2);
    }

    #[test]
    fn test_range_outside_grid_rejected() {
        let (market, swaption, parameters) = setup();
        assert!(SwaptionPhysicalLmmDdCalibrationObjective::new(
            &swaption,
            0.0,
            &parameters,
            &market,
            2..=4
        )
        .is_err());
    }
}
