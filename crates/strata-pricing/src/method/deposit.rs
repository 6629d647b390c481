//! Discounting methods for deposits and FRAs.

use strata_core::MultipleCurrencyAmount;
use strata_curves::{
    ForwardSensitivity, MarketBundle, MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity,
};

use crate::error::PricingResult;
use crate::instrument::{Cash, CashFlow, Fra};

/// Discounting method for [`Cash`] deposits.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashDiscountingMethod;

impl CashDiscountingMethod {
    /// Present value: `N (−P(s) + (1 + rδ) P(e))`.
    pub fn present_value<M: MarketBundle + ?Sized>(
        &self,
        deposit: &Cash,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        let ccy = deposit.currency();
        let df_start = market.discount_factor(ccy, deposit.start_time())?;
        let df_end = market.discount_factor(ccy, deposit.end_time())?;
        let repaid = 1.0 + deposit.rate() * deposit.accrual_factor();
        Ok(MultipleCurrencyAmount::of(
            ccy,
            deposit.notional() * (repaid * df_end - df_start),
        ))
    }

    /// Sensitivity of the present value to the discounting curve.
    pub fn present_value_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        deposit: &Cash,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let ccy = deposit.currency();
        let (s, e) = (deposit.start_time(), deposit.end_time());
        let df_start = market.discount_factor(ccy, s)?;
        let df_end = market.discount_factor(ccy, e)?;
        let repaid = 1.0 + deposit.rate() * deposit.accrual_factor();
        let n = deposit.notional();
        let sensitivity = MulticurveSensitivity::of_yield_discounting(
            market.discounting_curve_name(ccy)?,
            vec![(s, s * n * df_start), (e, -e * n * repaid * df_end)],
        );
        Ok(MultipleCurrencyMulticurveSensitivity::of(ccy, sensitivity))
    }

    /// Spread to add to the deposit rate to make the present value zero.
    pub fn par_spread<M: MarketBundle + ?Sized>(
        &self,
        deposit: &Cash,
        market: &M,
    ) -> PricingResult<f64> {
        let ccy = deposit.currency();
        let df_start = market.discount_factor(ccy, deposit.start_time())?;
        let df_end = market.discount_factor(ccy, deposit.end_time())?;
        Ok((df_start / df_end - 1.0) / deposit.accrual_factor() - deposit.rate())
    }

    /// Sensitivity of the par spread to the discounting curve.
    pub fn par_spread_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        deposit: &Cash,
        market: &M,
    ) -> PricingResult<MulticurveSensitivity> {
        let ccy = deposit.currency();
        let (s, e) = (deposit.start_time(), deposit.end_time());
        let ratio = market.discount_factor(ccy, s)? / market.discount_factor(ccy, e)?
            / deposit.accrual_factor();
        Ok(MulticurveSensitivity::of_yield_discounting(
            market.discounting_curve_name(ccy)?,
            vec![(s, -s * ratio), (e, e * ratio)],
        ))
    }
}

/// Discounting method for [`Fra`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FraDiscountingMethod;

impl FraDiscountingMethod {
    fn forward_rate<M: MarketBundle + ?Sized>(&self, fra: &Fra, market: &M) -> PricingResult<f64> {
        let fixing = fra.fixing();
        Ok(market.ibor_forward_rate(fra.index(), fixing.start, fixing.end, fixing.year_fraction)?)
    }

    /// Present value: `N δ (F − K) / (1 + δF) · P(t_p)`.
    pub fn present_value<M: MarketBundle + ?Sized>(
        &self,
        fra: &Fra,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        let forward = self.forward_rate(fra, market)?;
        let df = market.discount_factor(fra.currency(), fra.payment_time())?;
        let delta = fra.payment_year_fraction();
        let pv = fra.notional() * delta * (forward - fra.rate()) / (1.0 + delta * forward) * df;
        Ok(MultipleCurrencyAmount::of(fra.currency(), pv))
    }

    /// Sensitivity of the present value to the discounting and forward curves.
    pub fn present_value_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        fra: &Fra,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let forward = self.forward_rate(fra, market)?;
        let tp = fra.payment_time();
        let df = market.discount_factor(fra.currency(), tp)?;
        let delta = fra.payment_year_fraction();
        let n = fra.notional();
        let pv = n * delta * (forward - fra.rate()) / (1.0 + delta * forward) * df;
        let d_forward =
            n * delta * df * (1.0 + delta * fra.rate()) / (1.0 + delta * forward).powi(2);

        let fixing = fra.fixing();
        let sensitivity = MulticurveSensitivity::of_yield_discounting(
            market.discounting_curve_name(fra.currency())?,
            vec![(tp, -tp * pv)],
        )
        .plus(&MulticurveSensitivity::of_forward(
            market.ibor_curve_name(fra.index())?,
            vec![ForwardSensitivity::new(
                fixing.start,
                fixing.end,
                fixing.year_fraction,
                d_forward,
            )],
        ));
        Ok(MultipleCurrencyMulticurveSensitivity::of(
            fra.currency(),
            sensitivity,
        ))
    }

    /// Forward rate minus the agreed rate.
    pub fn par_spread<M: MarketBundle + ?Sized>(&self, fra: &Fra, market: &M) -> PricingResult<f64> {
        Ok(self.forward_rate(fra, market)? - fra.rate())
    }

    /// Sensitivity of the par spread to the forward curve.
    pub fn par_spread_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        fra: &Fra,
        market: &M,
    ) -> PricingResult<MulticurveSensitivity> {
        let fixing = fra.fixing();
        Ok(MulticurveSensitivity::of_forward(
            market.ibor_curve_name(fra.index())?,
            vec![ForwardSensitivity::new(
                fixing.start,
                fixing.end,
                fixing.year_fraction,
                1.0,
            )],
        ))
    }
}
