//! Payments and coupons, the leaves of the instrument tree.
//!
//! All times are year fractions from the valuation date. Notionals and
//! amounts are signed: negative values are paid, positive values received.

use serde::{Deserialize, Serialize};
use strata_core::Currency;
use strata_curves::{IborIndex, OvernightIndex};

use crate::error::{PricingError, PricingResult};

/// Common accessors of every payment.
pub trait CashFlow {
    /// Payment currency.
    fn currency(&self) -> Currency;

    /// Payment time.
    fn payment_time(&self) -> f64;
}

fn check_time(what: &str, t: f64) -> PricingResult<()> {
    if !t.is_finite() || t < 0.0 {
        return Err(PricingError::invalid_instrument(format!(
            "{what} must be a non-negative time, got {t}"
        )));
    }
    Ok(())
}

fn check_year_fraction(what: &str, yf: f64) -> PricingResult<()> {
    if !yf.is_finite() || yf <= 0.0 {
        return Err(PricingError::invalid_instrument(format!(
            "{what} must be positive, got {yf}"
        )));
    }
    Ok(())
}

/// A known amount paid at a known time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentFixed {
    currency: Currency,
    payment_time: f64,
    amount: f64,
}

impl PaymentFixed {
    /// Creates a fixed payment.
    pub fn new(currency: Currency, payment_time: f64, amount: f64) -> PricingResult<Self> {
        check_time("payment time", payment_time)?;
        Ok(Self {
            currency,
            payment_time,
            amount,
        })
    }

    /// Signed amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl CashFlow for PaymentFixed {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn payment_time(&self) -> f64 {
        self.payment_time
    }
}

/// A coupon paying `notional × year fraction × fixed rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouponFixed {
    currency: Currency,
    payment_time: f64,
    payment_year_fraction: f64,
    notional: f64,
    fixed_rate: f64,
}

impl CouponFixed {
    /// Creates a fixed coupon.
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_year_fraction: f64,
        notional: f64,
        fixed_rate: f64,
    ) -> PricingResult<Self> {
        check_time("payment time", payment_time)?;
        check_year_fraction("payment year fraction", payment_year_fraction)?;
        Ok(Self {
            currency,
            payment_time,
            payment_year_fraction,
            notional,
            fixed_rate,
        })
    }

    /// Accrual factor of the payment.
    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    /// Signed notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Fixed rate.
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }

    /// Paid amount.
    pub fn amount(&self) -> f64 {
        self.notional * self.payment_year_fraction * self.fixed_rate
    }

    /// Same coupon with another rate.
    #[must_use]
    pub fn with_rate(&self, fixed_rate: f64) -> Self {
        Self { fixed_rate, ..*self }
    }

    /// Same coupon with another notional.
    #[must_use]
    pub fn with_notional(&self, notional: f64) -> Self {
        Self { notional, ..*self }
    }

    /// The coupon as a fixed payment.
    pub fn to_payment_fixed(&self) -> PaymentFixed {
        PaymentFixed {
            currency: self.currency,
            payment_time: self.payment_time,
            amount: self.amount(),
        }
    }
}

impl CashFlow for CouponFixed {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn payment_time(&self) -> f64 {
        self.payment_time
    }
}

/// Period over which a floating rate is observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixingPeriod {
    /// Time at which the rate is fixed.
    pub fixing_time: f64,
    /// Start of the rate period.
    pub start: f64,
    /// End of the rate period.
    pub end: f64,
    /// Accrual factor of the rate period.
    pub year_fraction: f64,
}

impl FixingPeriod {
    /// Creates a fixing period; the rate fixes at its start.
    pub fn new(start: f64, end: f64, year_fraction: f64) -> PricingResult<Self> {
        Self::with_fixing_time(start, start, end, year_fraction)
    }

    /// Creates a fixing period with an explicit fixing time.
    pub fn with_fixing_time(
        fixing_time: f64,
        start: f64,
        end: f64,
        year_fraction: f64,
    ) -> PricingResult<Self> {
        check_time("fixing time", fixing_time)?;
        check_time("fixing period start", start)?;
        check_year_fraction("fixing year fraction", year_fraction)?;
        if end <= start {
            return Err(PricingError::invalid_instrument(format!(
                "fixing period end {end} is not after start {start}"
            )));
        }
        Ok(Self {
            fixing_time,
            start,
            end,
            year_fraction,
        })
    }
}

/// A coupon paying an Ibor rate plus a spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponIbor {
    currency: Currency,
    payment_time: f64,
    payment_year_fraction: f64,
    notional: f64,
    index: IborIndex,
    fixing: FixingPeriod,
    spread: f64,
}

impl CouponIbor {
    /// Creates an Ibor coupon without spread.
    pub fn new(
        payment_time: f64,
        payment_year_fraction: f64,
        notional: f64,
        index: IborIndex,
        fixing: FixingPeriod,
    ) -> PricingResult<Self> {
        check_time("payment time", payment_time)?;
        check_year_fraction("payment year fraction", payment_year_fraction)?;
        Ok(Self {
            currency: index.currency(),
            payment_time,
            payment_year_fraction,
            notional,
            index,
            fixing,
            spread: 0.0,
        })
    }

    /// Same coupon with a spread over the index.
    #[must_use]
    pub fn with_spread(&self, spread: f64) -> Self {
        Self {
            spread,
            ..self.clone()
        }
    }

    /// Same coupon with another notional.
    #[must_use]
    pub fn with_notional(&self, notional: f64) -> Self {
        Self {
            notional,
            ..self.clone()
        }
    }

    /// Accrual factor of the payment.
    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    /// Signed notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Index.
    pub fn index(&self) -> &IborIndex {
        &self.index
    }

    /// Fixing period.
    pub fn fixing(&self) -> &FixingPeriod {
        &self.fixing
    }

    /// Spread over the index.
    pub fn spread(&self) -> f64 {
        self.spread
    }
}

impl CashFlow for CouponIbor {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn payment_time(&self) -> f64 {
        self.payment_time
    }
}

/// A coupon paying the compounded overnight rate over its fixing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponOn {
    currency: Currency,
    payment_time: f64,
    payment_year_fraction: f64,
    notional: f64,
    index: OvernightIndex,
    fixing: FixingPeriod,
}

impl CouponOn {
    /// Creates an overnight coupon.
    pub fn new(
        payment_time: f64,
        payment_year_fraction: f64,
        notional: f64,
        index: OvernightIndex,
        fixing: FixingPeriod,
    ) -> PricingResult<Self> {
        check_time("payment time", payment_time)?;
        check_year_fraction("payment year fraction", payment_year_fraction)?;
        Ok(Self {
            currency: index.currency(),
            payment_time,
            payment_year_fraction,
            notional,
            index,
            fixing,
        })
    }

    /// Accrual factor of the payment.
    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    /// Signed notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Index.
    pub fn index(&self) -> &OvernightIndex {
        &self.index
    }

    /// Fixing period.
    pub fn fixing(&self) -> &FixingPeriod {
        &self.fixing
    }
}

impl CashFlow for CouponOn {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn payment_time(&self) -> f64 {
        self.payment_time
    }
}

/// Any leaf payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payment {
    /// Known amount.
    Fixed(PaymentFixed),
    /// Fixed-rate coupon.
    CouponFixed(CouponFixed),
    /// Ibor coupon.
    CouponIbor(CouponIbor),
    /// Overnight coupon.
    CouponOn(CouponOn),
}

impl Payment {
    /// Signed notional for coupons, `None` for fixed payments.
    pub fn notional(&self) -> Option<f64> {
        match self {
            Payment::Fixed(_) => None,
            Payment::CouponFixed(c) => Some(c.notional()),
            Payment::CouponIbor(c) => Some(c.notional()),
            Payment::CouponOn(c) => Some(c.notional()),
        }
    }

    /// Payment accrual factor for coupons, `None` for fixed payments.
    pub fn payment_year_fraction(&self) -> Option<f64> {
        match self {
            Payment::Fixed(_) => None,
            Payment::CouponFixed(c) => Some(c.payment_year_fraction()),
            Payment::CouponIbor(c) => Some(c.payment_year_fraction()),
            Payment::CouponOn(c) => Some(c.payment_year_fraction()),
        }
    }
}

impl CashFlow for Payment {
    fn currency(&self) -> Currency {
        match self {
            Payment::Fixed(p) => p.currency(),
            Payment::CouponFixed(c) => c.currency(),
            Payment::CouponIbor(c) => c.currency(),
            Payment::CouponOn(c) => c.currency(),
        }
    }

    fn payment_time(&self) -> f64 {
        match self {
            Payment::Fixed(p) => p.payment_time(),
            Payment::CouponFixed(c) => c.payment_time(),
            Payment::CouponIbor(c) => c.payment_time(),
            Payment::CouponOn(c) => c.payment_time(),
        }
    }
}

impl From<PaymentFixed> for Payment {
    fn from(p: PaymentFixed) -> Self {
        Payment::Fixed(p)
    }
}

impl From<CouponFixed> for Payment {
    fn from(c: CouponFixed) -> Self {
        Payment::CouponFixed(c)
    }
}

impl From<CouponIbor> for Payment {
    fn from(c: CouponIbor) -> Self {
        Payment::CouponIbor(c)
    }
}

impl From<CouponOn> for Payment {
    fn from(c: CouponOn) -> Self {
        Payment::CouponOn(c)
    }
}
