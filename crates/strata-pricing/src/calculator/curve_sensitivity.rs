//! Present value curve sensitivity by discounting.

use strata_curves::{MarketBundle, MultipleCurrencyMulticurveSensitivity};

use crate::calculator::fold_annuity;
use crate::error::PricingResult;
use crate::instrument::{Annuity, InstrumentDerivative, Payment, Swap};
use crate::method::{
    CashDiscountingMethod, CouponFixedDiscountingMethod, CouponIborDiscountingMethod,
    CouponOnDiscountingMethod, FraDiscountingMethod, PaymentFixedDiscountingMethod,
};

/// Point sensitivity of the present value to the curves of the market.
///
/// Follows the same traversal as
/// [`PresentValueDiscountingCalculator`](crate::PresentValueDiscountingCalculator).
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValueCurveSensitivityDiscountingCalculator {
    payment_fixed: PaymentFixedDiscountingMethod,
    coupon_fixed: CouponFixedDiscountingMethod,
    coupon_ibor: CouponIborDiscountingMethod,
    coupon_on: CouponOnDiscountingMethod,
    cash: CashDiscountingMethod,
    fra: FraDiscountingMethod,
}

impl PresentValueCurveSensitivityDiscountingCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Curve sensitivity of an instrument's present value.
    pub fn present_value_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        instrument: &InstrumentDerivative,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        match instrument {
            InstrumentDerivative::PaymentFixed(p) => {
                self.payment_fixed.present_value_curve_sensitivity(p, market)
            }
            InstrumentDerivative::CouponFixed(c) => {
                self.coupon_fixed.present_value_curve_sensitivity(c, market)
            }
            InstrumentDerivative::CouponIbor(c) => {
                self.coupon_ibor.present_value_curve_sensitivity(c, market)
            }
            InstrumentDerivative::CouponOn(c) => {
                self.coupon_on.present_value_curve_sensitivity(c, market)
            }
            InstrumentDerivative::Cash(c) => self.cash.present_value_curve_sensitivity(c, market),
            InstrumentDerivative::Fra(f) => self.fra.present_value_curve_sensitivity(f, market),
            InstrumentDerivative::Annuity(a) => self.annuity(a, market),
            InstrumentDerivative::AnnuityCouponFixed(a) => fold_annuity(
                a,
                |c| self.coupon_fixed.present_value_curve_sensitivity(c, market),
                plus,
            ),
            InstrumentDerivative::Swap(s) => self.swap(s, market),
            InstrumentDerivative::SwapFixedCoupon(s) => {
                let first = fold_annuity(
                    s.first_leg(),
                    |c| self.coupon_fixed.present_value_curve_sensitivity(c, market),
                    plus,
                )?;
                Ok(first.plus(&self.annuity(s.second_leg(), market)?))
            }
        }
    }

    /// Curve sensitivity of a single payment.
    pub fn payment<M: MarketBundle + ?Sized>(
        &self,
        payment: &Payment,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        match payment {
            Payment::Fixed(p) => self.payment_fixed.present_value_curve_sensitivity(p, market),
            Payment::CouponFixed(c) => self.coupon_fixed.present_value_curve_sensitivity(c, market),
            Payment::CouponIbor(c) => self.coupon_ibor.present_value_curve_sensitivity(c, market),
            Payment::CouponOn(c) => self.coupon_on.present_value_curve_sensitivity(c, market),
        }
    }

    /// Curve sensitivity of a leg.
    pub fn annuity<M: MarketBundle + ?Sized>(
        &self,
        annuity: &Annuity<Payment>,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        fold_annuity(annuity, |p| self.payment(p, market), plus)
    }

    /// Curve sensitivity of a swap.
    pub fn swap<M: MarketBundle + ?Sized>(
        &self,
        swap: &Swap<Payment, Payment>,
        market: &M,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let first = self.annuity(swap.first_leg(), market)?;
        Ok(first.plus(&self.annuity(swap.second_leg(), market)?))
    }
}

fn plus(
    a: &MultipleCurrencyMulticurveSensitivity,
    b: &MultipleCurrencyMulticurveSensitivity,
) -> MultipleCurrencyMulticurveSensitivity {
    a.plus(b)
}
