//! Calculators over the instrument tree.
//!
//! Each calculator is a plain value holding the leaf methods it dispatches to.

mod cash_flow_equivalent;
mod curve_sensitivity;
mod par_spread;
mod present_value;

pub use cash_flow_equivalent::CashFlowEquivalentCalculator;
pub use curve_sensitivity::PresentValueCurveSensitivityDiscountingCalculator;
pub use par_spread::{
    ParSpreadMarketQuoteCurveSensitivityDiscountingCalculator,
    ParSpreadMarketQuoteDiscountingCalculator,
};
pub use present_value::PresentValueDiscountingCalculator;

use crate::error::PricingResult;
use crate::instrument::{Annuity, CashFlow};

/// Sums a leaf result over the payments of an annuity, in payment order.
///
/// The first payment seeds the accumulator and the others are added with
/// `plus`.
pub(crate) fn fold_annuity<P: CashFlow, T: Default>(
    annuity: &Annuity<P>,
    mut leaf: impl FnMut(&P) -> PricingResult<T>,
    plus: impl Fn(&T, &T) -> T,
) -> PricingResult<T> {
    let mut payments = annuity.payments().iter();
    let Some(first) = payments.next() else {
        return Ok(T::default());
    };
    payments.try_fold(leaf(first)?, |acc, p| Ok(plus(&acc, &leaf(p)?)))
}
