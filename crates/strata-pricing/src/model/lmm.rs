//! Displaced-diffusion Libor market model parameters.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};
use crate::instrument::{Annuity, Payment};

/// Times within this distance of a grid time are mapped to it.
pub const TIME_TOLERANCE: f64 = 1e-3;

/// Parameters of a multi-factor displaced-diffusion LMM.
///
/// The model has `N` forward rates on the grid `ibor_times[0..=N]`. Forward
/// `i` covers `[ibor_times[i], ibor_times[i + 1]]` with accrual factor
/// `accrual_factors[i]`, displacement `displacements[i]` and one volatility
/// per factor in `volatilities[i]`. Volatilities are scaled in time by a
/// common mean reversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LmmDdParametersData")]
pub struct LmmDdParameters {
    ibor_times: Vec<f64>,
    accrual_factors: Vec<f64>,
    displacements: Vec<f64>,
    volatilities: Vec<Vec<f64>>,
    mean_reversion: f64,
}

#[derive(Deserialize)]
struct LmmDdParametersData {
    ibor_times: Vec<f64>,
    accrual_factors: Vec<f64>,
    displacements: Vec<f64>,
    volatilities: Vec<Vec<f64>>,
    mean_reversion: f64,
}

impl TryFrom<LmmDdParametersData> for LmmDdParameters {
    type Error = PricingError;

    fn try_from(data: LmmDdParametersData) -> PricingResult<Self> {
        Self::new(
            data.ibor_times,
            data.accrual_factors,
            data.displacements,
            data.volatilities,
            data.mean_reversion,
        )
    }
}

impl LmmDdParameters {
    /// Creates a parameter set.
    pub fn new(
        ibor_times: Vec<f64>,
        accrual_factors: Vec<f64>,
        displacements: Vec<f64>,
        volatilities: Vec<Vec<f64>>,
        mean_reversion: f64,
    ) -> PricingResult<Self> {
        let n = accrual_factors.len();
        if n == 0 {
            return Err(PricingError::invalid_parameters("LMM needs at least one period"));
        }
        if ibor_times.len() != n + 1 || displacements.len() != n || volatilities.len() != n {
            return Err(PricingError::invalid_parameters(format!(
                "LMM with {n} periods needs {} times, {n} displacements and {n} volatility rows; \
                 got {}, {} and {}",
                n + 1,
                ibor_times.len(),
                displacements.len(),
                volatilities.len()
            )));
        }
        if ibor_times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PricingError::invalid_parameters(
                "LMM times must be strictly increasing",
            ));
        }
        if accrual_factors.iter().any(|d| *d <= 0.0) {
            return Err(PricingError::invalid_parameters(
                "LMM accrual factors must be positive",
            ));
        }
        let factors = volatilities[0].len();
        if factors == 0 || volatilities.iter().any(|row| row.len() != factors) {
            return Err(PricingError::invalid_parameters(
                "every LMM volatility row needs the same, non-zero number of factors",
            ));
        }
        if !mean_reversion.is_finite() {
            return Err(PricingError::invalid_parameters("mean reversion must be finite"));
        }
        Ok(Self {
            ibor_times,
            accrual_factors,
            displacements,
            volatilities,
            mean_reversion,
        })
    }

    /// Parameters on the Ibor grid of a leg, with the same displacement and
    /// volatility vector for every period.
    pub fn from_ibor_leg(
        leg: &Annuity<Payment>,
        displacement: f64,
        mean_reversion: f64,
        volatility: &[f64],
    ) -> PricingResult<Self> {
        let mut ibor_times = Vec::with_capacity(leg.number_of_payments() + 1);
        let mut accrual_factors = Vec::with_capacity(leg.number_of_payments());
        for payment in leg.payments() {
            let Payment::CouponIbor(coupon) = payment else {
                return Err(PricingError::invalid_instrument(
                    "LMM grid needs a leg of Ibor coupons",
                ));
            };
            let fixing = coupon.fixing();
            match ibor_times.last() {
                None => ibor_times.push(fixing.start),
                Some(&previous_end) if (fixing.start - previous_end).abs() > TIME_TOLERANCE => {
                    return Err(PricingError::invalid_parameters(format!(
                        "LMM grid needs contiguous periods; {previous_end} is followed by {}",
                        fixing.start
                    )));
                }
                Some(_) => {}
            }
            ibor_times.push(fixing.end);
            accrual_factors.push(fixing.year_fraction);
        }
        let n = accrual_factors.len();
        Self::new(
            ibor_times,
            accrual_factors,
            vec![displacement; n],
            vec![volatility.to_vec(); n],
            mean_reversion,
        )
    }

    /// Forward rate grid, `N + 1` times.
    pub fn ibor_times(&self) -> &[f64] {
        &self.ibor_times
    }

    /// Accrual factors of the forward rates.
    pub fn accrual_factors(&self) -> &[f64] {
        &self.accrual_factors
    }

    /// Displacements of the forward rates.
    pub fn displacements(&self) -> &[f64] {
        &self.displacements
    }

    /// Volatilities, one row per forward rate and one column per factor.
    pub fn volatilities(&self) -> &[Vec<f64>] {
        &self.volatilities
    }

    /// Mean reversion.
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Number of factors.
    pub fn number_of_factors(&self) -> usize {
        self.volatilities[0].len()
    }

    /// Number of forward rates.
    pub fn number_of_periods(&self) -> usize {
        self.accrual_factors.len()
    }

    /// Index of the grid time within [`TIME_TOLERANCE`] of `t`.
    ///
    /// Fails with [`PricingError::IncompatibleModel`] when `t` is not on the
    /// grid.
    pub fn time_index(&self, t: f64) -> PricingResult<usize> {
        let times = &self.ibor_times;
        let above = times.partition_point(|x| *x < t);
        if above < times.len() && times[above] - t < TIME_TOLERANCE {
            return Ok(above);
        }
        if above > 0 && t - times[above - 1] < TIME_TOLERANCE {
            return Ok(above - 1);
        }
        Err(PricingError::incompatible_model(format!(
            "time {t} is not on the LMM grid"
        )))
    }

    /// Returns new parameters with the volatility rows in `range` multiplied
    /// by `multiplier`. `self` is left unchanged.
    pub fn with_scaled_volatility(
        &self,
        range: RangeInclusive<usize>,
        multiplier: f64,
    ) -> PricingResult<Self> {
        if range.is_empty() || *range.end() >= self.number_of_periods() {
            return Err(PricingError::invalid_parameters(format!(
                "volatility range {range:?} is outside the {} LMM periods",
                self.number_of_periods()
            )));
        }
        if !multiplier.is_finite() {
            return Err(PricingError::invalid_parameters(format!(
                "volatility multiplier must be finite, got {multiplier}"
            )));
        }
        let mut volatilities = self.volatilities.clone();
        for row in &mut volatilities[range] {
            for v in row.iter_mut() {
                *v *= multiplier;
            }
        }
        Ok(Self {
            volatilities,
            ..self.clone()
        })
    }
}
