//! The instrument tree.
//!
//! [`InstrumentDerivative`] is a closed set of instrument kinds. Calculators
//! dispatch on it with an exhaustive `match`, so every calculator handles
//! every kind.

pub mod annuity;
pub mod builder;
pub mod deposit;
pub mod payment;

use serde::{Deserialize, Serialize};
use strata_core::Currency;

pub use annuity::{Annuity, Swap};
pub use deposit::{Cash, Fra};
pub use payment::{CashFlow, CouponFixed, CouponIbor, CouponOn, FixingPeriod, Payment, PaymentFixed};

/// Instruments priced by the discounting calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "instrument", rename_all = "snake_case")]
pub enum InstrumentDerivative {
    /// Known amount at a known time.
    PaymentFixed(PaymentFixed),
    /// Fixed coupon.
    CouponFixed(CouponFixed),
    /// Ibor coupon.
    CouponIbor(CouponIbor),
    /// Overnight coupon.
    CouponOn(CouponOn),
    /// Deposit.
    Cash(Cash),
    /// Forward rate agreement.
    Fra(Fra),
    /// Leg of arbitrary payments.
    Annuity(Annuity<Payment>),
    /// Leg of fixed coupons.
    AnnuityCouponFixed(Annuity<CouponFixed>),
    /// Swap of two arbitrary legs.
    Swap(Swap<Payment, Payment>),
    /// Swap whose first leg is fixed.
    SwapFixedCoupon(Swap<CouponFixed, Payment>),
}

impl InstrumentDerivative {
    /// Currency of the instrument (of the first leg for swaps).
    pub fn currency(&self) -> Currency {
        match self {
            InstrumentDerivative::PaymentFixed(p) => p.currency(),
            InstrumentDerivative::CouponFixed(c) => c.currency(),
            InstrumentDerivative::CouponIbor(c) => c.currency(),
            InstrumentDerivative::CouponOn(c) => c.currency(),
            InstrumentDerivative::Cash(c) => c.currency(),
            InstrumentDerivative::Fra(f) => f.currency(),
            InstrumentDerivative::Annuity(a) => a.currency(),
            InstrumentDerivative::AnnuityCouponFixed(a) => a.currency(),
            InstrumentDerivative::Swap(s) => s.first_leg().currency(),
            InstrumentDerivative::SwapFixedCoupon(s) => s.first_leg().currency(),
        }
    }

    /// Time of the last payment.
    pub fn maturity(&self) -> f64 {
        match self {
            InstrumentDerivative::PaymentFixed(p) => p.payment_time(),
            InstrumentDerivative::CouponFixed(c) => c.payment_time(),
            InstrumentDerivative::CouponIbor(c) => c.payment_time(),
            InstrumentDerivative::CouponOn(c) => c.payment_time(),
            InstrumentDerivative::Cash(c) => c.end_time(),
            InstrumentDerivative::Fra(f) => f.fixing().end.max(f.payment_time()),
            InstrumentDerivative::Annuity(a) => a.last_payment_time(),
            InstrumentDerivative::AnnuityCouponFixed(a) => a.last_payment_time(),
            InstrumentDerivative::Swap(s) => s.last_payment_time(),
            InstrumentDerivative::SwapFixedCoupon(s) => s.last_payment_time(),
        }
    }
}

impl From<PaymentFixed> for InstrumentDerivative {
    fn from(p: PaymentFixed) -> Self {
        InstrumentDerivative::PaymentFixed(p)
    }
}

impl From<CouponFixed> for InstrumentDerivative {
    fn from(c: CouponFixed) -> Self {
        InstrumentDerivative::CouponFixed(c)
    }
}

impl From<CouponIbor> for InstrumentDerivative {
    fn from(c: CouponIbor) -> Self {
        InstrumentDerivative::CouponIbor(c)
    }
}

impl From<CouponOn> for InstrumentDerivative {
    fn from(c: CouponOn) -> Self {
        InstrumentDerivative::CouponOn(c)
    }
}

impl From<Payment> for InstrumentDerivative {
    fn from(p: Payment) -> Self {
        match p {
            Payment::Fixed(p) => p.into(),
            Payment::CouponFixed(c) => c.into(),
            Payment::CouponIbor(c) => c.into(),
            Payment::CouponOn(c) => c.into(),
        }
    }
}

impl From<Cash> for InstrumentDerivative {
    fn from(c: Cash) -> Self {
        InstrumentDerivative::Cash(c)
    }
}

impl From<Fra> for InstrumentDerivative {
    fn from(f: Fra) -> Self {
        InstrumentDerivative::Fra(f)
    }
}

impl From<Annuity<Payment>> for InstrumentDerivative {
    fn from(a: Annuity<Payment>) -> Self {
        InstrumentDerivative::Annuity(a)
    }
}

impl From<Annuity<CouponFixed>> for InstrumentDerivative {
    fn from(a: Annuity<CouponFixed>) -> Self {
        InstrumentDerivative::AnnuityCouponFixed(a)
    }
}

impl From<Swap<Payment, Payment>> for InstrumentDerivative {
    fn from(s: Swap<Payment, Payment>) -> Self {
        InstrumentDerivative::Swap(s)
    }
}

impl From<Swap<CouponFixed, Payment>> for InstrumentDerivative {
    fn from(s: Swap<CouponFixed, Payment>) -> Self {
        InstrumentDerivative::SwapFixedCoupon(s)
    }
}
