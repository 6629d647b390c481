//! Regular legs and swaps from year-fraction schedules.
//!
//! Periods have equal length and their accrual factor is the period length.
//! Floating rates fix at the start of their period and pay at its end.

use strata_core::Currency;
use strata_curves::{IborIndex, OvernightIndex};

use crate::error::{PricingError, PricingResult};
use crate::instrument::annuity::{Annuity, Swap};
use crate::instrument::payment::{CouponFixed, CouponIbor, CouponOn, FixingPeriod, Payment};

const SCHEDULE_TOLERANCE: f64 = 1e-8;

/// Period boundaries `start, start + p, ..., start + tenor`.
pub fn schedule(start: f64, tenor: f64, period: f64) -> PricingResult<Vec<f64>> {
    if start < 0.0 || tenor <= 0.0 || period <= 0.0 {
        return Err(PricingError::invalid_instrument(format!(
            "invalid schedule: start {start}, tenor {tenor}, period {period}"
        )));
    }
    let count = (tenor / period).round();
    if count < 1.0 || (count * period - tenor).abs() > SCHEDULE_TOLERANCE {
        return Err(PricingError::invalid_instrument(format!(
            "tenor {tenor} is not a multiple of the period {period}"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = count as usize;
    #[allow(clippy::cast_precision_loss)]
    Ok((0..=count).map(|i| start + i as f64 * period).collect())
}

/// Fixed coupons over `[start, start + tenor]`.
pub fn fixed_annuity(
    currency: Currency,
    start: f64,
    tenor: f64,
    period: f64,
    notional: f64,
    rate: f64,
) -> PricingResult<Annuity<CouponFixed>> {
    let dates = schedule(start, tenor, period)?;
    let coupons = dates
        .windows(2)
        .map(|w| CouponFixed::new(currency, w[1], w[1] - w[0], notional, rate))
        .collect::<PricingResult<Vec<_>>>()?;
    Annuity::new(coupons)
}

/// Ibor coupons of `index` over `[start, start + tenor]`, one per index tenor.
pub fn ibor_annuity(
    index: &IborIndex,
    start: f64,
    tenor: f64,
    notional: f64,
) -> PricingResult<Annuity<Payment>> {
    let period = f64::from(index.tenor_months()) / 12.0;
    let dates = schedule(start, tenor, period)?;
    let coupons = dates
        .windows(2)
        .map(|w| {
            let fixing = FixingPeriod::new(w[0], w[1], w[1] - w[0])?;
            CouponIbor::new(w[1], w[1] - w[0], notional, index.clone(), fixing).map(Payment::from)
        })
        .collect::<PricingResult<Vec<_>>>()?;
    Annuity::new(coupons)
}

/// Overnight coupons of `index` over `[start, start + tenor]`.
pub fn overnight_annuity(
    index: &OvernightIndex,
    start: f64,
    tenor: f64,
    period: f64,
    notional: f64,
) -> PricingResult<Annuity<Payment>> {
    let dates = schedule(start, tenor, period)?;
    let coupons = dates
        .windows(2)
        .map(|w| {
            let fixing = FixingPeriod::new(w[0], w[1], w[1] - w[0])?;
            CouponOn::new(w[1], w[1] - w[0], notional, index.clone(), fixing).map(Payment::from)
        })
        .collect::<PricingResult<Vec<_>>>()?;
    Annuity::new(coupons)
}

/// Fixed against Ibor swap. A payer swap pays the fixed rate.
pub fn fixed_ibor_swap(
    index: &IborIndex,
    start: f64,
    tenor: f64,
    fixed_period: f64,
    notional: f64,
    fixed_rate: f64,
    is_payer: bool,
) -> PricingResult<Swap<CouponFixed, Payment>> {
    let sign = if is_payer { -1.0 } else { 1.0 };
    let fixed = fixed_annuity(
        index.currency(),
        start,
        tenor,
        fixed_period,
        sign * notional,
        fixed_rate,
    )?;
    let floating = ibor_annuity(index, start, tenor, -sign * notional)?;
    Ok(Swap::new(fixed, floating))
}

/// Fixed against overnight swap with the same period on both legs.
pub fn fixed_overnight_swap(
    index: &OvernightIndex,
    start: f64,
    tenor: f64,
    period: f64,
    notional: f64,
    fixed_rate: f64,
    is_payer: bool,
) -> PricingResult<Swap<CouponFixed, Payment>> {
    let sign = if is_payer { -1.0 } else { 1.0 };
    let fixed = fixed_annuity(
        index.currency(),
        start,
        tenor,
        period,
        sign * notional,
        fixed_rate,
    )?;
    let floating = overnight_annuity(index, start, tenor, period, -sign * notional)?;
    Ok(Swap::new(fixed, floating))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::payment::CashFlow;
    use approx::assert_relative_eq;

    #[test]
    fn test_schedule() {
        let s = schedule(0.5, 2.0, 0.5).unwrap();
        assert_eq!(s.len(), 5);
        assert_relative_eq!(s[4], 2.5);
        assert!(schedule(0.0, 1.0, 0.3).is_err());
        assert!(schedule(0.0, 0.0, 0.5).is_err());
    }

    #[test]
    fn test_fixed_ibor_swap_signs() {
        let index = IborIndex::new("USD_LIBOR_6M", Currency::USD, 6);
        let swap = fixed_ibor_swap(&index, 1.0, 2.0, 1.0, 1_000_000.0, 0.03, true).unwrap();
        assert_eq!(swap.first_leg().number_of_payments(), 2);
        assert_eq!(swap.second_leg().number_of_payments(), 4);
        assert!(swap.first_leg().payments()[0].notional() < 0.0);
        assert_eq!(swap.second_leg().payments()[0].notional(), Some(1_000_000.0));
        assert_relative_eq!(swap.last_payment_time(), 3.0);
        assert_eq!(swap.second_leg().currency(), Currency::USD);
        assert_relative_eq!(swap.second_leg().payments()[1].payment_time(), 2.0);
    }
}
