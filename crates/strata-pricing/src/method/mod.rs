//! Leaf pricing methods.
//!
//! Each method prices one instrument kind from a [`strata_curves::MarketBundle`].
//! Methods are stateless values; calculators hold them and dispatch to them.

mod deposit;
mod payment;

pub use deposit::{CashDiscountingMethod, FraDiscountingMethod};
pub use payment::{
    CouponFixedDiscountingMethod, CouponIborDiscountingMethod, CouponOnDiscountingMethod,
    PaymentFixedDiscountingMethod,
};
