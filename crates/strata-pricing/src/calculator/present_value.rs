//! Present value by discounting.

use strata_core::MultipleCurrencyAmount;
use strata_curves::MarketBundle;

use crate::calculator::fold_annuity;
use crate::error::PricingResult;
use crate::instrument::{Annuity, InstrumentDerivative, Payment, Swap};
use crate::method::{
    CashDiscountingMethod, CouponFixedDiscountingMethod, CouponIborDiscountingMethod,
    CouponOnDiscountingMethod, FraDiscountingMethod, PaymentFixedDiscountingMethod,
};

/// Present value of any [`InstrumentDerivative`] by discounting.
///
/// Annuities are valued as the sum of their payments in order, swaps as the
/// sum of their legs.
///
/// # Example
///
/// ```rust
/// use strata_core::Currency;
/// use strata_curves::{MulticurveProvider, YieldCurve};
/// use strata_pricing::instrument::{InstrumentDerivative, PaymentFixed};
/// use strata_pricing::PresentValueDiscountingCalculator;
///
/// let mut market = MulticurveProvider::new();
/// market.set_discount_curve(Currency::USD, YieldCurve::flat("USD_DISC", 0.02).unwrap());
///
/// let payment: InstrumentDerivative = PaymentFixed::new(Currency::USD, 1.0, 100.0).unwrap().into();
/// let pv = PresentValueDiscountingCalculator::new()
///     .present_value(&payment, &market)
///     .unwrap();
/// assert!((pv.amount(Currency::USD) - 100.0 * (-0.02_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValueDiscountingCalculator {
    payment_fixed: PaymentFixedDiscountingMethod,
    coupon_fixed: CouponFixedDiscountingMethod,
    coupon_ibor: CouponIborDiscountingMethod,
    coupon_on: CouponOnDiscountingMethod,
    cash: CashDiscountingMethod,
    fra: FraDiscountingMethod,
}

impl PresentValueDiscountingCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Present value of an instrument.
    pub fn present_value<M: MarketBundle + ?Sized>(
        &self,
        instrument: &InstrumentDerivative,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        match instrument {
            InstrumentDerivative::PaymentFixed(p) => self.payment_fixed.present_value(p, market),
            InstrumentDerivative::CouponFixed(c) => self.coupon_fixed.present_value(c, market),
            InstrumentDerivative::CouponIbor(c) => self.coupon_ibor.present_value(c, market),
            InstrumentDerivative::CouponOn(c) => self.coupon_on.present_value(c, market),
            InstrumentDerivative::Cash(c) => self.cash.present_value(c, market),
            InstrumentDerivative::Fra(f) => self.fra.present_value(f, market),
            InstrumentDerivative::Annuity(a) => self.annuity(a, market),
            InstrumentDerivative::AnnuityCouponFixed(a) => {
                fold_annuity(a, |c| self.coupon_fixed.present_value(c, market), plus)
            }
            InstrumentDerivative::Swap(s) => self.swap(s, market),
            InstrumentDerivative::SwapFixedCoupon(s) => {
                let first = fold_annuity(
                    s.first_leg(),
                    |c| self.coupon_fixed.present_value(c, market),
                    plus,
                )?;
                Ok(first.plus(&self.annuity(s.second_leg(), market)?))
            }
        }
    }

    /// Present value of a single payment.
    pub fn payment<M: MarketBundle + ?Sized>(
        &self,
        payment: &Payment,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        match payment {
            Payment::Fixed(p) => self.payment_fixed.present_value(p, market),
            Payment::CouponFixed(c) => self.coupon_fixed.present_value(c, market),
            Payment::CouponIbor(c) => self.coupon_ibor.present_value(c, market),
            Payment::CouponOn(c) => self.coupon_on.present_value(c, market),
        }
    }

    /// Present value of a leg: the sum of its payments in order.
    pub fn annuity<M: MarketBundle + ?Sized>(
        &self,
        annuity: &Annuity<Payment>,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        fold_annuity(annuity, |p| self.payment(p, market), plus)
    }

    /// Present value of a swap: first leg plus second leg.
    pub fn swap<M: MarketBundle + ?Sized>(
        &self,
        swap: &Swap<Payment, Payment>,
        market: &M,
    ) -> PricingResult<MultipleCurrencyAmount> {
        let first = self.annuity(swap.first_leg(), market)?;
        Ok(first.plus(&self.annuity(swap.second_leg(), market)?))
    }
}

fn plus(a: &MultipleCurrencyAmount, b: &MultipleCurrencyAmount) -> MultipleCurrencyAmount {
    a.plus(b)
}
