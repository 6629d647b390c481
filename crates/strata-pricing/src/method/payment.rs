//! Discounting methods for payments and coupons.

use strata_core::MultipleCurrencyAmount;
use strata_curves::{
    ForwardSensitivity, MarketBundle, MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity,
};

use crate::error::PricingResult;
use crate::instrument::{CashFlow, CouponFixed, CouponIbor, CouponOn, PaymentFixed};

/// Value and discounting sensitivity of `amount` paid at `t`.
fn discounted<M: MarketBundle + ?Sized>(
    flow: &impl CashFlow,
    amount: f64,
    market: &M,
) -> PricingResult<(f64, MulticurveSensitivity)> {
    let t = flow.payment_time();
    let df = market.discount_factor(flow.currency(), t)?;
    let name = market.discounting_curve_name(flow.currency())?;
    let pv = amount * df;
    Ok((
        pv,
        MulticurveSensitivity::of_yield_discounting(name, vec![(t, -t * pv)]),
    ))
}

/// Discounting method for [`PaymentFixed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentFixedDiscountingMethod;

impl PaymentFixedDiscountingMethod {
    /// Present value of the payment.
    pub fn present_value<M: MarketBundle + ?Sized>(
        &self,
        payment: &PaymentFixed,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        let df = market.discount_factor(payment.currency(), payment.payment_time())?;
        Ok(MultipleCurrencyAmount::of(
            payment.currency(),
            payment.amount() * df,
        ))
    }

    /// Sensitivity of the present value to the discounting curve.
    pub fn present_value_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        payment: &PaymentFixed,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let (_, sensitivity) = discounted(payment, payment.amount(), market)?;
        Ok(MultipleCurrencyMulticurveSensitivity::of(
            payment.currency(),
            sensitivity,
        ))
    }
}

/// Discounting method for [`CouponFixed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponFixedDiscountingMethod;

impl CouponFixedDiscountingMethod {
    /// Present value of the coupon.
    pub fn present_value<M: MarketBundle + ?Sized>(
        &self,
        coupon: &CouponFixed,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        let df = market.discount_factor(coupon.currency(), coupon.payment_time())?;
        Ok(MultipleCurrencyAmount::of(
            coupon.currency(),
            coupon.amount() * df,
        ))
    }

    /// Sensitivity of the present value to the discounting curve.
    pub fn present_value_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        coupon: &CouponFixed,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let (_, sensitivity) = discounted(coupon, coupon.amount(), market)?;
        Ok(MultipleCurrencyMulticurveSensitivity::of(
            coupon.currency(),
            sensitivity,
        ))
    }
}

/// Discounting method for [`CouponIbor`]: the forward rate is estimated on
/// the index's curve and the payment discounted on the currency's curve.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponIborDiscountingMethod;

impl CouponIborDiscountingMethod {
    /// Estimated forward rate of the coupon's index.
    pub fn forward_rate<M: MarketBundle + ?Sized>(
        &self,
        coupon: &CouponIbor,
        market: &M,
    ) -> PricingResult<f64> {
        let fixing = coupon.fixing();
        Ok(market.ibor_forward_rate(coupon.index(), fixing.start, fixing.end, fixing.year_fraction)?)
    }

    /// Present value of the coupon.
    pub fn present_value<M: MarketBundle + ?Sized>(
        &self,
        coupon: &CouponIbor,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        let forward = self.forward_rate(coupon, market)?;
        let df = market.discount_factor(coupon.currency(), coupon.payment_time())?;
        let pv = coupon.notional() * coupon.payment_year_fraction() * (forward + coupon.spread()) * df;
        Ok(MultipleCurrencyAmount::of(coupon.currency(), pv))
    }

    /// Sensitivity of the present value to the discounting and forward curves.
    pub fn present_value_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        coupon: &CouponIbor,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let forward = self.forward_rate(coupon, market)?;
        let amount = coupon.notional() * coupon.payment_year_fraction() * (forward + coupon.spread());
        let (_, discounting) = discounted(coupon, amount, market)?;
        let df = market.discount_factor(coupon.currency(), coupon.payment_time())?;
        let fixing = coupon.fixing();
        let forwards = MulticurveSensitivity::of_forward(
            market.ibor_curve_name(coupon.index())?,
            vec![ForwardSensitivity::new(
                fixing.start,
                fixing.end,
                fixing.year_fraction,
                coupon.notional() * coupon.payment_year_fraction() * df,
            )],
        );
        Ok(MultipleCurrencyMulticurveSensitivity::of(
            coupon.currency(),
            discounting.plus(&forwards),
        ))
    }
}

/// Discounting method for [`CouponOn`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponOnDiscountingMethod;

impl CouponOnDiscountingMethod {
    /// Estimated compounded overnight rate over the fixing period.
    pub fn forward_rate<M: MarketBundle + ?Sized>(
        &self,
        coupon: &CouponOn,
        market: &M,
    ) -> PricingResult<f64> {
        let fixing = coupon.fixing();
        Ok(market.overnight_forward_rate(
            coupon.index(),
            fixing.start,
            fixing.end,
            fixing.year_fraction,
        )?)
    }

    /// Present value of the coupon.
    pub fn present_value<M: MarketBundle + ?Sized>(
        &self,
        coupon: &CouponOn,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        let forward = self.forward_rate(coupon, market)?;
        let df = market.discount_factor(coupon.currency(), coupon.payment_time())?;
        let pv = coupon.notional() * coupon.payment_year_fraction() * forward * df;
        Ok(MultipleCurrencyAmount::of(coupon.currency(), pv))
    }

    /// Sensitivity of the present value to the discounting and overnight curves.
    pub fn present_value_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        coupon: &CouponOn,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let forward = self.forward_rate(coupon, market)?;
        let amount = coupon.notional() * coupon.payment_year_fraction() * forward;
        let (_, discounting) = discounted(coupon, amount, market)?;
        let df = market.discount_factor(coupon.currency(), coupon.payment_time())?;
        let fixing = coupon.fixing();
        let forwards = MulticurveSensitivity::of_forward(
            market.overnight_curve_name(coupon.index())?,
            vec![ForwardSensitivity::new(
                fixing.start,
                fixing.end,
                fixing.year_fraction,
                coupon.notional() * coupon.payment_year_fraction() * df,
            )],
        );
        Ok(MultipleCurrencyMulticurveSensitivity::of(
            coupon.currency(),
            discounting.plus(&forwards),
        ))
    }
}
