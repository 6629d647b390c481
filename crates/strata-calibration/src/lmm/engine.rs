//! Successive root-finder calibration of LMM volatilities.

use std::cell::RefCell;
use std::fmt;

use serde::Serialize;
use strata_config::{LmmCalibrationConfig, Validate};
use strata_curves::MarketBundle;
use strata_math::rootfinding::{bracket_root, brent, SolverConfig};
use strata_pricing::{
    LmmDdParameters, PricingError, SwaptionPhysicalFixedIbor, SwaptionPhysicalPricingMethod,
};

use super::objective::SwaptionPhysicalLmmDdCalibrationObjective;
use crate::error::{CalibrationError, CalibrationResult};

/// Outcome of calibrating one swaption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibratedSwaption {
    /// First LMM period scaled for this swaption.
    pub start_index: usize,
    /// Last LMM period scaled for this swaption, inclusive.
    pub end_index: usize,
    /// Volatility multiplier found.
    pub multiplier: f64,
    /// Price error at the multiplier.
    pub residual: f64,
    /// Brent iterations used.
    pub iterations: u32,
}

/// Calibrated parameters with one step per swaption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LmmCalibrationResult {
    /// Parameters after the last swaption.
    pub parameters: LmmDdParameters,
    /// Steps in calibration order.
    pub steps: Vec<CalibratedSwaption>,
}

/// A swaption and the price the model must reproduce.
#[derive(Debug, Clone)]
struct CalibrationInstrument {
    swaption: SwaptionPhysicalFixedIbor,
    target_price: f64,
}

/// Calibrates LMM volatilities to a strip of swaptions, one at a time.
///
/// Swaption `i` owns the LMM periods from the end of swaption `i − 1`'s
/// periods up to its own last payment. Swaptions must therefore be added
/// in increasing order of last payment.
pub struct SuccessiveRootFinderCalibrationEngine {
    config: LmmCalibrationConfig,
    instruments: Vec<CalibrationInstrument>,
}

impl SuccessiveRootFinderCalibrationEngine {
    /// Creates an engine with no instruments.
    pub fn new(config: LmmCalibrationConfig) -> CalibrationResult<Self> {
        config.validate_or_error()?;
        Ok(Self {
            config,
            instruments: Vec::new(),
        })
    }

    /// Settings in use.
    pub fn config(&self) -> &LmmCalibrationConfig {
        &self.config
    }

    /// Number of swaptions added.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Returns true if no swaption was added.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Adds a swaption priced by `method` in `market`.
    pub fn add_instrument(
        &mut self,
        swaption: SwaptionPhysicalFixedIbor,
        method: &dyn SwaptionPhysicalPricingMethod,
        market: &dyn MarketBundle,
    ) -> CalibrationResult<()> {
        let target_price = method.present_value(&swaption, market)?.amount();
        self.add_instrument_with_price(swaption, target_price)
    }

    /// Adds a swaption with a known target price.
    pub fn add_instrument_with_price(
        &mut self,
        swaption: SwaptionPhysicalFixedIbor,
        target_price: f64,
    ) -> CalibrationResult<()> {
        if !target_price.is_finite() {
            return Err(PricingError::invalid_parameters(format!(
                "target price must be finite, got {target_price}"
            ))
            .into());
        }
        self.instruments.push(CalibrationInstrument {
            swaption,
            target_price,
        });
        Ok(())
    }

    /// Calibrates every swaption in order, starting from `parameters`.
    ///
    /// `parameters` is left unchanged; the calibrated set is returned.
    pub fn calibrate<M: MarketBundle + ?Sized>(
        &self,
        parameters: &LmmDdParameters,
        market: &M,
    ) -> CalibrationResult<LmmCalibrationResult> {
        if self.instruments.is_empty() {
            return Err(CalibrationError::invalid_unit(
                "no swaption to calibrate",
            ));
        }
        let mut working = parameters.clone();
        let mut steps = Vec::with_capacity(self.instruments.len());
        let mut start_index = 0;
        for (i, instrument) in self.instruments.iter().enumerate() {
            let end_exclusive = working.time_index(instrument.swaption.last_payment_time())?;
            if end_exclusive <= start_index {
                return Err(CalibrationError::invalid_unit(format!(
                    "swaption {i} has no LMM period after index {start_index}; \
                     add swaptions in increasing order of last payment"
                )));
            }
            let end_index = end_exclusive - 1;
            let objective = SwaptionPhysicalLmmDdCalibrationObjective::new(
                &instrument.swaption,
                instrument.target_price,
                &working,
                market,
                start_index..=end_index,
            )?;
            let step = self.solve(&objective, &SwaptionContext(i))?;
            let next = objective.apply(step.multiplier)?;

            tracing::info!(
                swaption = i,
                start_index,
                end_index,
                multiplier = step.multiplier,
                iterations = step.iterations,
                "Swaption calibrated"
            );
            tracing::debug!(swaption = i, residual = step.residual, "Calibration residual");

            steps.push(step);
            working = next;
            start_index = end_exclusive;
        }
        Ok(LmmCalibrationResult {
            parameters: working,
            steps,
        })
    }

    fn solve<M: MarketBundle + ?Sized>(
        &self,
        objective: &SwaptionPhysicalLmmDdCalibrationObjective<'_, M>,
        context: &SwaptionContext,
    ) -> CalibrationResult<CalibratedSwaption> {
        let failure: RefCell<Option<PricingError>> = RefCell::new(None);
        let f = |x: f64| match objective.evaluate(x) {
            Ok(v) => v,
            Err(e) => {
                let mut slot = failure.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        };

        let (min, max) = (self.config.min_multiplier, self.config.max_multiplier);
        let bracket = bracket_root(f, min, max, Some((min, max)));
        if let Some(e) = failure.borrow_mut().take() {
            return Err(e.into());
        }
        let (lower, upper) = bracket.map_err(|e| {
            tracing::warn!(%context, error = %e, "Multiplier bracketing failed");
            CalibrationError::root_finding(context.to_string(), e)
        })?;

        let solver = SolverConfig::new(self.config.variable_accuracy, self.config.max_iterations);
        let solution = brent(f, lower, upper, &solver);
        if let Some(e) = failure.borrow_mut().take() {
            return Err(e.into());
        }
        let solution = solution.map_err(|e| {
            tracing::warn!(%context, error = %e, "Brent search failed");
            CalibrationError::root_finding(context.to_string(), e)
        })?;

        let residual = objective.evaluate(solution.root)?;
        if residual.abs() > self.config.function_accuracy {
            tracing::warn!(%context, residual, "Calibrated price outside accuracy");
            return Err(CalibrationError::target_missed(
                context.to_string(),
                residual.abs(),
                self.config.function_accuracy,
            ));
        }
        Ok(CalibratedSwaption {
            start_index: objective.start_index(),
            end_index: objective.end_index(),
            multiplier: solution.root,
            residual,
            iterations: solution.iterations,
        })
    }
}

impl fmt::Debug for SuccessiveRootFinderCalibrationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuccessiveRootFinderCalibrationEngine")
            .field("config", &self.config)
            .field("instruments", &self.instruments.len())
            .finish()
    }
}

struct SwaptionContext(usize);

impl fmt::Display for SwaptionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swaption {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Currency;
    use strata_curves::{IborIndex, MulticurveProvider, YieldCurve};
    use strata_pricing::instrument::builder::fixed_ibor_swap;

    fn market() -> (MulticurveProvider, IborIndex) {
        let index = IborIndex::new("USD_LIBOR_6M", Currency::USD, 6);
        let mut market = MulticurveProvider::new();
        market.set_discount_curve(Currency::USD, YieldCurve::flat("USD_DISC", 0.02).unwrap());
        market.set_ibor_curve(index.clone(), YieldCurve::flat("USD_FWD6M", 0.025).unwrap());
        (market, index)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LmmCalibrationConfig::default().with_multiplier_range(2.0, 1.0);
        assert!(matches!(
            SuccessiveRootFinderCalibrationEngine::new(config),
            Err(CalibrationError::Config(_))
        ));
    }

    #[test]
    fn test_empty_engine_rejected() {
        let (market, index) = market();
        let swap = fixed_ibor_swap(&index, 1.0, 2.0, 1.0, 1e6, 0.025, true).unwrap();
        let parameters =
            LmmDdParameters::from_ibor_leg(swap.second_leg(), 0.1, 0.01, &[0.2]).unwrap();
        let engine = SuccessiveRootFinderCalibrationEngine::new(LmmCalibrationConfig::default())
            .unwrap();
        assert!(engine.is_empty());
        assert!(matches!(
            engine.calibrate(&parameters, &market),
            Err(CalibrationError::InvalidUnit { .. })
        ));
    }

    #[test]
    fn test_unreachable_price_is_a_root_finding_error() {
        let (market, index) = market();
        let swap = fixed_ibor_swap(&index, 1.0, 2.0, 1.0, 1e6, 0.025, true).unwrap();
        let swaption = SwaptionPhysicalFixedIbor::new(1.0, 1.0, swap, true).unwrap();
        let parameters = LmmDdParameters::from_ibor_leg(
            swaption.underlying().second_leg(),
            0.1,
            0.01,
            &[0.2],
        )
        .unwrap();
        let mut engine =
            SuccessiveRootFinderCalibrationEngine::new(LmmCalibrationConfig::default()).unwrap();
        engine.add_instrument_with_price(swaption, 1e9).unwrap();
        assert!(matches!(
            engine.calibrate(&parameters, &market),
            Err(CalibrationError::RootFinding { .. })
        ));
    }

    #[test]
    fn test_non_finite_target_rejected() {
        let (_, index) = market();
        let swap = fixed_ibor_swap(&index, 1.0, 2.0, 1.0, 1e6, 0.025, true).unwrap();
        let swaption = SwaptionPhysicalFixedIbor::new(1.0, 1.0, swap, true).unwrap();
        let mut engine =
            SuccessiveRootFinderCalibrationEngine::new(LmmCalibrationConfig::default()).unwrap();
        assert!(engine.add_instrument_with_price(swaption, f64::NAN).is_err());
        assert_eq!(engine.len(), 0);
    }
}
