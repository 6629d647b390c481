//! Par spread in market-quote convention, the target of curve calibration.
//!
//! For deposits and FRAs the par spread is the rate to add to the quoted rate
//! to make the instrument worth zero. For swaps it is the spread to add to the
//! first leg's coupons: `−PV / PVBP(first leg)`.

use strata_core::{Currency, MultipleCurrencyAmount};
use strata_curves::{MarketBundle, MulticurveSensitivity};

use crate::calculator::{
    PresentValueCurveSensitivityDiscountingCalculator, PresentValueDiscountingCalculator,
};
use crate::error::{PricingError, PricingResult};
use crate::instrument::{Annuity, CashFlow, CouponFixed, InstrumentDerivative, Payment};
use crate::method::{CashDiscountingMethod, FraDiscountingMethod};

/// Notional and accrual factor of a coupon; `None` for plain payments.
trait Accruing: CashFlow {
    fn accrual(&self) -> Option<(f64, f64)>;
}

impl Accruing for CouponFixed {
    fn accrual(&self) -> Option<(f64, f64)> {
        Some((self.notional(), self.payment_year_fraction()))
    }
}

impl Accruing for Payment {
    fn accrual(&self) -> Option<(f64, f64)> {
        Some((self.notional()?, self.payment_year_fraction()?))
    }
}

/// Value of one basis point (unit spread) on every coupon of the leg, and its
/// discounting sensitivity.
fn basis_point<P: Accruing, M: MarketBundle + ?Sized>(
    leg: &Annuity<P>,
    market: &M,
) -> PricingResult<(f64, MulticurveSensitivity)> {
    let ccy = leg.currency();
    let name = market.discounting_curve_name(ccy)?;
    let mut pvbp = 0.0;
    let mut points = Vec::with_capacity(leg.number_of_payments());
    for payment in leg.payments() {
        let (notional, year_fraction) = payment.accrual().ok_or_else(|| {
            PricingError::invalid_instrument("par spread needs a first leg of coupons")
        })?;
        let t = payment.payment_time();
        let value = notional * year_fraction * market.discount_factor(ccy, t)?;
        pvbp += value;
        points.push((t, -t * value));
    }
    if pvbp == 0.0 {
        return Err(PricingError::invalid_instrument(
            "first leg has a zero basis point value",
        ));
    }
    Ok((pvbp, MulticurveSensitivity::of_yield_discounting(name, points)))
}

fn single_currency(amount: &MultipleCurrencyAmount, ccy: Currency) -> PricingResult<f64> {
    if amount.currencies().any(|c| c != ccy) {
        return Err(PricingError::invalid_instrument(format!(
            "par spread of a swap with flows outside {ccy} is not supported"
        )));
    }
    Ok(amount.amount(ccy))
}

fn not_quoted(instrument: &InstrumentDerivative) -> PricingError {
    PricingError::invalid_instrument(format!(
        "no market quote convention for {}",
        kind_name(instrument)
    ))
}

fn kind_name(instrument: &InstrumentDerivative) -> &'static str {
    match instrument {
        InstrumentDerivative::PaymentFixed(_) => "fixed payment",
        InstrumentDerivative::CouponFixed(_) => "fixed coupon",
        InstrumentDerivative::CouponIbor(_) => "Ibor coupon",
        InstrumentDerivative::CouponOn(_) => "overnight coupon",
        InstrumentDerivative::Cash(_) => "deposit",
        InstrumentDerivative::Fra(_) => "FRA",
        InstrumentDerivative::Annuity(_) | InstrumentDerivative::AnnuityCouponFixed(_) => "annuity",
        InstrumentDerivative::Swap(_) | InstrumentDerivative::SwapFixedCoupon(_) => "swap",
    }
}

/// Par spread of deposits, FRAs and swaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParSpreadMarketQuoteDiscountingCalculator {
    present_value: PresentValueDiscountingCalculator,
    cash: CashDiscountingMethod,
    fra: FraDiscountingMethod,
}

impl ParSpreadMarketQuoteDiscountingCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Par spread of an instrument.
    ///
    /// Fails with [`PricingError::InvalidInstrument`] for instruments without
    /// a quote convention (single payments and annuities).
    pub fn par_spread<M: MarketBundle + ?Sized>(
        &self,
        instrument: &InstrumentDerivative,
        market: &M,
    ) -> PricingResult<f64> {
        match instrument {
            InstrumentDerivative::Cash(c) => self.cash.par_spread(c, market),
            InstrumentDerivative::Fra(f) => self.fra.par_spread(f, market),
            InstrumentDerivative::Swap(s) => {
                let pv = self.present_value.present_value(instrument, market)?;
                let (pvbp, _) = basis_point(s.first_leg(), market)?;
                Ok(-single_currency(&pv, s.first_leg().currency())? / pvbp)
            }
            InstrumentDerivative::SwapFixedCoupon(s) => {
                let pv = self.present_value.present_value(instrument, market)?;
                let (pvbp, _) = basis_point(s.first_leg(), market)?;
                Ok(-single_currency(&pv, s.first_leg().currency())? / pvbp)
            }
            InstrumentDerivative::PaymentFixed(_)
            | InstrumentDerivative::CouponFixed(_)
            | InstrumentDerivative::CouponIbor(_)
            | InstrumentDerivative::CouponOn(_)
            | InstrumentDerivative::Annuity(_)
            | InstrumentDerivative::AnnuityCouponFixed(_) => Err(not_quoted(instrument)),
        }
    }
}

/// Curve sensitivity of the par spread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParSpreadMarketQuoteCurveSensitivityDiscountingCalculator {
    present_value: PresentValueDiscountingCalculator,
    sensitivity: PresentValueCurveSensitivityDiscountingCalculator,
    cash: CashDiscountingMethod,
    fra: FraDiscountingMethod,
}

impl ParSpreadMarketQuoteCurveSensitivityDiscountingCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point sensitivity of the par spread.
    pub fn par_spread_curve_sensitivity<M: MarketBundle + ?Sized>(
        &self,
        instrument: &InstrumentDerivative,
        market: &M,
    ) -> PricingResult<MulticurveSensitivity> {
        match instrument {
            InstrumentDerivative::Cash(c) => self.cash.par_spread_curve_sensitivity(c, market),
            InstrumentDerivative::Fra(f) => self.fra.par_spread_curve_sensitivity(f, market),
            InstrumentDerivative::Swap(s) => {
                let bp = basis_point(s.first_leg(), market)?;
                self.swap(instrument, s.first_leg().currency(), bp, market)
            }
            InstrumentDerivative::SwapFixedCoupon(s) => {
                let bp = basis_point(s.first_leg(), market)?;
                self.swap(instrument, s.first_leg().currency(), bp, market)
            }
            InstrumentDerivative::PaymentFixed(_)
            | InstrumentDerivative::CouponFixed(_)
            | InstrumentDerivative::CouponIbor(_)
            | InstrumentDerivative::CouponOn(_)
            | InstrumentDerivative::Annuity(_)
            | InstrumentDerivative::AnnuityCouponFixed(_) => Err(not_quoted(instrument)),
        }
    }

    /// `d(−PV/PVBP) = −dPV/PVBP + PV/PVBP² · dPVBP`.
    fn swap<M: MarketBundle + ?Sized>(
        &self,
        instrument: &InstrumentDerivative,
        ccy: Currency,
        (pvbp, pvbp_sensitivity): (f64, MulticurveSensitivity),
        market: &M,
    ) -> PricingResult<MulticurveSensitivity> {
        let pv = single_currency(&self.present_value.present_value(instrument, market)?, ccy)?;
        let pv_sensitivity = self
            .sensitivity
            .present_value_curve_sensitivity(instrument, market)?
            .get(ccy)
            .cloned()
            .unwrap_or_default();
        Ok(pv_sensitivity
            .multiplied_by(-1.0 / pvbp)
            .plus(&pvbp_sensitivity.multiplied_by(pv / (pvbp * pvbp))))
    }
}
