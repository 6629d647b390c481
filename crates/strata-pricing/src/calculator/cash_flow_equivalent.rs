//! Cash-flow equivalents: fixed payments with the same value and the same
//! sensitivity to discounting as a floating instrument.
//!
//! An Ibor coupon paying `N δ_p F` at `t_p` on the period `[s, e]` is
//! equivalent to `N (δ_p/δ_f) β` at `s` and `−N δ_p/δ_f` at `t_p`, with
//! `β = (1 + δ_f F) P(t_p) / P(s)`. Fixed flows are unchanged.

use strata_curves::MarketBundle;

use crate::error::{PricingError, PricingResult};
use crate::instrument::{
    Annuity, CashFlow, CouponFixed, FixingPeriod, InstrumentDerivative, Payment, PaymentFixed,
    Swap,
};
use crate::method::{CouponIborDiscountingMethod, CouponOnDiscountingMethod};

/// Payments closer than this are merged.
const TIME_MERGE_TOLERANCE: f64 = 1e-12;

/// Computes cash-flow equivalents of payments, legs and swaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashFlowEquivalentCalculator {
    coupon_ibor: CouponIborDiscountingMethod,
    coupon_on: CouponOnDiscountingMethod,
}

impl CashFlowEquivalentCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cash-flow equivalent of an instrument, sorted by time with flows at
    /// the same time merged.
    ///
    /// FRAs have no linear equivalent and are rejected.
    pub fn cash_flow_equivalent<M: MarketBundle + ?Sized>(
        &self,
        instrument: &InstrumentDerivative,
        market: &M,
    ) -> PricingResult<Annuity<PaymentFixed>> {
        let flows = match instrument {
            InstrumentDerivative::PaymentFixed(p) => vec![*p],
            InstrumentDerivative::CouponFixed(c) => vec![c.to_payment_fixed()],
            InstrumentDerivative::CouponIbor(c) => self.payment(&Payment::CouponIbor(c.clone()), market)?,
            InstrumentDerivative::CouponOn(c) => self.payment(&Payment::CouponOn(c.clone()), market)?,
            InstrumentDerivative::Cash(c) => {
                let repaid = 1.0 + c.rate() * c.accrual_factor();
                vec![
                    PaymentFixed::new(c.currency(), c.start_time(), -c.notional())?,
                    PaymentFixed::new(c.currency(), c.end_time(), c.notional() * repaid)?,
                ]
            }
            InstrumentDerivative::Fra(_) => {
                return Err(PricingError::invalid_instrument(
                    "a FRA has no cash-flow equivalent",
                ))
            }
            InstrumentDerivative::Annuity(a) => self.flows(a, market)?,
            InstrumentDerivative::AnnuityCouponFixed(a) => {
                a.payments().iter().map(CouponFixed::to_payment_fixed).collect()
            }
            InstrumentDerivative::Swap(s) => {
                let mut flows = self.flows(s.first_leg(), market)?;
                flows.extend(self.flows(s.second_leg(), market)?);
                flows
            }
            InstrumentDerivative::SwapFixedCoupon(s) => {
                return self.swap_fixed_coupon(s, market);
            }
        };
        merge(flows)
    }

    /// Cash-flow equivalent of a swap with a fixed first leg.
    pub fn swap_fixed_coupon<M: MarketBundle + ?Sized>(
        &self,
        swap: &Swap<CouponFixed, Payment>,
        market: &M,
    ) -> PricingResult<Annuity<PaymentFixed>> {
        let mut flows: Vec<PaymentFixed> = swap
            .first_leg()
            .payments()
            .iter()
            .map(CouponFixed::to_payment_fixed)
            .collect();
        flows.extend(self.flows(swap.second_leg(), market)?);
        merge(flows)
    }

    /// Equivalent flows of a single payment.
    pub fn payment<M: MarketBundle + ?Sized>(
        &self,
        payment: &Payment,
        market: &M,
    ) -> PricingResult<Vec<PaymentFixed>> {
        match payment {
            Payment::Fixed(p) => Ok(vec![*p]),
            Payment::CouponFixed(c) => Ok(vec![c.to_payment_fixed()]),
            Payment::CouponIbor(c) => {
                let forward = self.coupon_ibor.forward_rate(c, market)?;
                let mut flows = floating(c, c.notional(), c.payment_year_fraction(), c.fixing(), forward, market)?;
                if c.spread() != 0.0 {
                    flows.push(PaymentFixed::new(
                        c.currency(),
                        c.payment_time(),
                        c.notional() * c.payment_year_fraction() * c.spread(),
                    )?);
                }
                Ok(flows)
            }
            Payment::CouponOn(c) => {
                let forward = self.coupon_on.forward_rate(c, market)?;
                floating(c, c.notional(), c.payment_year_fraction(), c.fixing(), forward, market)
            }
        }
    }

    fn flows<M: MarketBundle + ?Sized>(
        &self,
        leg: &Annuity<Payment>,
        market: &M,
    ) -> PricingResult<Vec<PaymentFixed>> {
        let mut flows = Vec::with_capacity(2 * leg.number_of_payments());
        for p in leg.payments() {
            flows.extend(self.payment(p, market)?);
        }
        Ok(flows)
    }
}

fn floating<M: MarketBundle + ?Sized>(
    coupon: &impl CashFlow,
    notional: f64,
    payment_year_fraction: f64,
    fixing: &FixingPeriod,
    forward: f64,
    market: &M,
) -> PricingResult<Vec<PaymentFixed>> {
    let ccy = coupon.currency();
    let tp = coupon.payment_time();
    let beta = (1.0 + fixing.year_fraction * forward) * market.discount_factor(ccy, tp)?
        / market.discount_factor(ccy, fixing.start)?;
    let ratio = notional * payment_year_fraction / fixing.year_fraction;
    Ok(vec![
        PaymentFixed::new(ccy, fixing.start, ratio * beta)?,
        PaymentFixed::new(ccy, tp, -ratio)?,
    ])
}

/// Sorts flows by time and merges flows at the same time.
fn merge(mut flows: Vec<PaymentFixed>) -> PricingResult<Annuity<PaymentFixed>> {
    flows.sort_by(|a, b| a.payment_time().total_cmp(&b.payment_time()));
    let mut merged: Vec<PaymentFixed> = Vec::with_capacity(flows.len());
    for flow in flows {
        match merged.last_mut() {
            Some(last) if (last.payment_time() - flow.payment_time()).abs() < TIME_MERGE_TOLERANCE => {
                *last = PaymentFixed::new(
                    last.currency(),
                    last.payment_time(),
                    last.amount() + flow.amount(),
                )?;
            }
            _ => merged.push(flow),
        }
    }
    Annuity::new(merged)
}
