//! Swaption pricing in the displaced-diffusion Libor market model.
//!
//! The swaption is an option on the bond formed by the cash-flow equivalents
//! of the underlying swap. The bond's volatility is approximated by freezing
//! the forward rates at a point between the forward and the strike, which
//! gives a Black price on the bond.

use std::iter;

use strata_core::CurrencyAmount;
use strata_curves::MarketBundle;

use crate::calculator::CashFlowEquivalentCalculator;
use crate::error::{PricingError, PricingResult};
use crate::instrument::CashFlow;
use crate::model::black::black_price;
use crate::model::LmmDdParameters;
use crate::swaption::SwaptionPhysicalFixedIbor;

/// Below this mean reversion the volatility time scaling is linear.
const SMALL_MEAN_REVERSION: f64 = 1e-6;

/// Efficient approximation of the swaption price in the LMM.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaptionPhysicalLmmDdMethod {
    cash_flow_equivalent: CashFlowEquivalentCalculator,
}

impl SwaptionPhysicalLmmDdMethod {
    /// Creates a method.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Present value of the swaption with the given model parameters.
    ///
    /// Every cash-flow equivalent of the underlying must fall on the LMM time
    /// grid, otherwise [`PricingError::IncompatibleModel`] is returned.
    pub fn present_value<M: MarketBundle + ?Sized>(
        &self,
        swaption: &SwaptionPhysicalFixedIbor,
        parameters: &LmmDdParameters,
        market: &M,
    ) -> PricingResult<CurrencyAmount> {
        let ccy = swaption.currency();
        let cfe = self
            .cash_flow_equivalent
            .swap_fixed_coupon(swaption.underlying(), market)?;
        let flows = cfe.payments();
        let first_amount = flows[0].amount();
        if first_amount == 0.0 {
            return Err(PricingError::invalid_instrument(
                "first cash-flow equivalent of the swaption underlying is zero",
            ));
        }
        let mult = first_amount.signum();
        let is_call = first_amount < 0.0;

        // Map the flows onto the LMM grid.
        let lmm_times = parameters.ibor_times();
        let indices = flows
            .iter()
            .map(|f| parameters.time_index(f.payment_time()))
            .collect::<PricingResult<Vec<_>>>()?;
        let start = indices.iter().copied().min().unwrap_or(0);
        let end = indices.iter().copied().max().unwrap_or(0);
        let n = end - start + 1;
        if n < 2 {
            return Err(PricingError::incompatible_model(
                "swaption underlying covers less than one LMM period",
            ));
        }
        let mut amounts = vec![0.0; n];
        for (flow, &i) in flows.iter().zip(&indices) {
            amounts[i - start] -= mult * flow.amount();
        }

        let df = lmm_times[start..=end]
            .iter()
            .map(|t| market.discount_factor(ccy, *t))
            .collect::<Result<Vec<_>, _>>()?;
        let delta = &parameters.accrual_factors()[start..end];
        let displacement = &parameters.displacements()[start..end];
        let gamma = &parameters.volatilities()[start..end];
        let libor: Vec<f64> = (0..n - 1)
            .map(|i| (df[i] / df[i + 1] - 1.0) / delta[i])
            .collect();

        // The first flow is the strike; the others form the bond.
        let bond_flows: Vec<f64> = iter::once(0.0)
            .chain(amounts[1..].iter().copied())
            .collect();
        let p0: Vec<f64> = df.iter().map(|d| d / df[0]).collect();
        let dp: Vec<f64> = bond_flows.iter().zip(&p0).map(|(c, p)| c * p).collect();
        let b0: f64 = dp.iter().sum();
        let b_k = -amounts[0];
        let b_m = (b0 + b_k) / 2.0;

        let expiry = swaption.time_to_expiry();
        let amr = parameters.mean_reversion();
        let mean_reversion_impact = if amr.abs() < SMALL_MEAN_REVERSION {
            expiry
        } else {
            ((2.0 * amr * expiry).exp() - 1.0) / (2.0 * amr)
        };

        let mu0 = cumulative_mu(&libor, displacement, delta, gamma);
        let tau2: Vec<f64> = iter::once(0.0)
            .chain(
                mu0.iter()
                    .map(|m| m.iter().map(|x| x * x).sum::<f64>() * mean_reversion_impact),
            )
            .collect();
        let tau: Vec<f64> = tau2.iter().map(|t| t.sqrt()).collect();

        let sum_num = dp
            .iter()
            .zip(&tau2)
            .fold(-b_m, |acc, (d, t2)| acc + d - d * t2 / 2.0);
        let sum_den: f64 = dp.iter().zip(&tau).map(|(d, t)| d * t).sum();

        let volatility = if sum_den == 0.0 {
            0.0
        } else {
            let x_bar = sum_num / sum_den;
            let p_m: Vec<f64> = p0
                .iter()
                .zip(tau.iter().zip(&tau2))
                .map(|(p, (t, t2))| p * (1.0 - x_bar * t - t2 / 2.0))
                .collect();
            let libor_m: Vec<f64> = (0..n - 1)
                .map(|i| (p_m[i] / p_m[i + 1] - 1.0) / delta[i])
                .collect();
            let alpha_m: Vec<f64> = bond_flows
                .iter()
                .zip(&p_m)
                .map(|(c, p)| c * p / b_m)
                .collect();
            let mu_m = cumulative_mu(&libor_m, displacement, delta, gamma);
            let norm2: f64 = (0..parameters.number_of_factors())
                .map(|f| {
                    let sigma: f64 = (0..n - 1).map(|i| alpha_m[i + 1] * mu_m[i][f]).sum();
                    sigma * sigma
                })
                .sum();
            (norm2 * mean_reversion_impact).sqrt()
        };

        let price = df[0] * black_price(b0, b_k, 1.0, volatility, 1.0, is_call);
        let sign = if swaption.is_long() { 1.0 } else { -1.0 };
        Ok(CurrencyAmount::of(ccy, sign * price))
    }
}

/// Cumulative drift weights `μ_i = Σ_{j≤i} (L_j + a_j)/(L_j + 1/δ_j) γ_j`.
fn cumulative_mu(
    libor: &[f64],
    displacement: &[f64],
    delta: &[f64],
    gamma: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let mut mu: Vec<Vec<f64>> = Vec::with_capacity(libor.len());
    for i in 0..libor.len() {
        let ratio = (libor[i] + displacement[i]) / (libor[i] + 1.0 / delta[i]);
        let row: Vec<f64> = match mu.last() {
            Some(previous) => previous
                .iter()
                .zip(&gamma[i])
                .map(|(m, g)| m + ratio * g)
                .collect(),
            None => gamma[i].iter().map(|g| ratio * g).collect(),
        };
        mu.push(row);
    }
    mu
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::builder::fixed_ibor_swap;
    use crate::swaption::{SwaptionPhysicalBlackMethod, SwaptionPhysicalPricingMethod};
    use approx::assert_relative_eq;
    use strata_core::Currency;
    use strata_curves::{IborIndex, MulticurveProvider, YieldCurve};

    fn libor() -> IborIndex {
        IborIndex::new("USD_LIBOR_6M", Currency::USD, 6)
    }

    fn market() -> MulticurveProvider {
        let mut m = MulticurveProvider::new();
        m.set_discount_curve(
            Currency::USD,
            YieldCurve::new("USD_DISC", vec![1.0, 10.0], vec![0.02, 0.03]).unwrap(),
        );
        m.set_ibor_curve(
            libor(),
            YieldCurve::new("USD_FWD6M", vec![1.0, 10.0], vec![0.025, 0.035]).unwrap(),
        );
        m
    }

    fn swaption(is_payer: bool, is_long: bool) -> SwaptionPhysicalFixedIbor {
        let swap = fixed_ibor_swap(&libor(), 5.0, 5.0, 1.0, 100_000_000.0, 0.035, is_payer).unwrap();
        SwaptionPhysicalFixedIbor::new(5.0, 5.0, swap, is_long).unwrap()
    }

    fn parameters(vol: f64) -> LmmDdParameters {
        let s = swaption(true, true);
        LmmDdParameters::from_ibor_leg(s.underlying().second_leg(), 0.1, 0.01, &[vol]).unwrap()
    }

    #[test]
    fn test_price_is_positive_and_increasing_in_volatility() {
        let m = market();
        let method = SwaptionPhysicalLmmDdMethod::new();
        let low = method.present_value(&swaption(true, true), &parameters(0.1), &m).unwrap();
        let high = method.present_value(&swaption(true, true), &parameters(0.2), &m).unwrap();
        assert!(low.amount() > 0.0);
        assert!(high.amount() > low.amount());
        assert_eq!(low.currency(), Currency::USD);
    }

    #[test]
    fn test_payer_receiver_parity() {
        let m = market();
        let method = SwaptionPhysicalLmmDdMethod::new();
        let p = parameters(0.15);
        let payer = method.present_value(&swaption(true, true), &p, &m).unwrap();
        let receiver = method.present_value(&swaption(false, true), &p, &m).unwrap();
        // Same strike and forward, so the difference is the forward swap value.
        let black = SwaptionPhysicalBlackMethod::new(0.0).unwrap();
        let payer_intrinsic = black.present_value(&swaption(true, true), &m).unwrap();
        let receiver_intrinsic = black.present_value(&swaption(false, true), &m).unwrap();
        assert_relative_eq!(
            payer.amount() - receiver.amount(),
            payer_intrinsic.amount() - receiver_intrinsic.amount(),
            max_relative = 1e-8
        );
    }

    #[test]
    fn test_short_is_negative_long() {
        let m = market();
        let method = SwaptionPhysicalLmmDdMethod::new();
        let p = parameters(0.15);
        let long = method.present_value(&swaption(true, true), &p, &m).unwrap();
        let short = method.present_value(&swaption(true, false), &p, &m).unwrap();
        assert_relative_eq!(long.amount(), -short.amount());
    }

    #[test]
    fn test_grid_mismatch_is_incompatible() {
        let m = market();
        let p = LmmDdParameters::new(
            vec![0.0, 0.5, 1.0],
            vec![0.5, 0.5],
            vec![0.1, 0.1],
            vec![vec![0.2], vec![0.2]],
            0.01,
        )
        .unwrap();
        let err = SwaptionPhysicalLmmDdMethod::new()
            .present_value(&swaption(true, true), &p, &m)
            .unwrap_err();
        assert!(matches!(err, PricingError::IncompatibleModel { .. }));
    }
}
