//! Swaption pricing with a flat Black volatility on the swap rate.

use strata_core::CurrencyAmount;
use strata_curves::MarketBundle;

use crate::calculator::PresentValueDiscountingCalculator;
use crate::error::{PricingError, PricingResult};
use crate::instrument::CashFlow;
use crate::model::black::black_price;
use crate::swaption::{SwaptionPhysicalFixedIbor, SwaptionPhysicalPricingMethod};

/// Black model on the forward swap rate with a single volatility.
#[derive(Debug, Clone, Copy)]
pub struct SwaptionPhysicalBlackMethod {
    volatility: f64,
    present_value: PresentValueDiscountingCalculator,
}

impl SwaptionPhysicalBlackMethod {
    /// Creates a method with the given lognormal volatility.
    pub fn new(volatility: f64) -> PricingResult<Self> {
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(PricingError::invalid_parameters(format!(
                "Black volatility must be non-negative, got {volatility}"
            )));
        }
        Ok(Self {
            volatility,
            present_value: PresentValueDiscountingCalculator::new(),
        })
    }

    /// Volatility.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Forward swap rate, strike and annuity (unsigned PVBP of the fixed leg).
    pub fn forward_strike_annuity<M: MarketBundle + ?Sized>(
        &self,
        swaption: &SwaptionPhysicalFixedIbor,
        market: &M,
    ) -> PricingResult<(f64, f64, f64)> {
        let ccy = swaption.currency();
        let swap = swaption.underlying();
        let mut signed_pvbp = 0.0;
        let mut fixed_pv = 0.0;
        for coupon in swap.first_leg().payments() {
            let df = market.discount_factor(ccy, coupon.payment_time())?;
            signed_pvbp += coupon.notional() * coupon.payment_year_fraction() * df;
            fixed_pv += coupon.amount() * df;
        }
        if signed_pvbp == 0.0 {
            return Err(PricingError::invalid_instrument(
                "swaption fixed leg has a zero annuity",
            ));
        }
        let floating_pv = self
            .present_value
            .annuity(swap.second_leg(), market)?
            .amount(ccy);
        Ok((-floating_pv / signed_pvbp, fixed_pv / signed_pvbp, signed_pvbp.abs()))
    }
}

impl SwaptionPhysicalPricingMethod for SwaptionPhysicalBlackMethod {
    fn present_value(
        &self,
        swaption: &SwaptionPhysicalFixedIbor,
        market: &dyn MarketBundle,
    ) -> PricingResult<CurrencyAmount> {
        let (forward, strike, annuity) = self.forward_strike_annuity(swaption, market)?;
        let price = black_price(
            forward,
            strike,
            annuity,
            self.volatility,
            swaption.time_to_expiry(),
            swaption.is_call(),
        );
        let sign = if swaption.is_long() { 1.0 } else { -1.0 };
        Ok(CurrencyAmount::of(swaption.currency(), sign * price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::builder::fixed_ibor_swap;
    use approx::assert_relative_eq;
    use strata_core::Currency;
    use strata_curves::{IborIndex, MulticurveProvider, YieldCurve};

    fn libor() -> IborIndex {
        IborIndex::new("USD_LIBOR_6M", Currency::USD, 6)
    }

    fn market() -> MulticurveProvider {
        let mut m = MulticurveProvider::new();
        m.set_discount_curve(Currency::USD, YieldCurve::flat("USD_DISC", 0.02).unwrap());
        m.set_ibor_curve(libor(), YieldCurve::flat("USD_FWD6M", 0.025).unwrap());
        m
    }

    fn swaption(rate: f64, is_payer: bool, is_long: bool) -> SwaptionPhysicalFixedIbor {
        let swap = fixed_ibor_swap(&libor(), 2.0, 5.0, 1.0, 1_000_000.0, rate, is_payer).unwrap();
        SwaptionPhysicalFixedIbor::new(2.0, 2.0, swap, is_long).unwrap()
    }

    #[test]
    fn test_payer_minus_receiver_is_forward_swap() {
        let m = market();
        let method = SwaptionPhysicalBlackMethod::new(0.2).unwrap();
        let payer = method.present_value(&swaption(0.03, true, true), &m).unwrap();
        let receiver = method.present_value(&swaption(0.03, false, true), &m).unwrap();
        let swap: crate::instrument::InstrumentDerivative =
            swaption(0.03, true, true).underlying().clone().into();
        let swap_pv = PresentValueDiscountingCalculator::new()
            .present_value(&swap, &m)
            .unwrap();
        assert_relative_eq!(
            payer.amount() - receiver.amount(),
            swap_pv.amount(Currency::USD),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_short_is_negative_long() {
        let m = market();
        let method = SwaptionPhysicalBlackMethod::new(0.3).unwrap();
        let long = method.present_value(&swaption(0.028, true, true), &m).unwrap();
        let short = method.present_value(&swaption(0.028, true, false), &m).unwrap();
        assert!(long.amount() > 0.0);
        assert_relative_eq!(long.amount(), -short.amount());
    }

    #[test]
    fn test_forward_is_par_rate() {
        let m = market();
        let method = SwaptionPhysicalBlackMethod::new(0.2).unwrap();
        let s = swaption(0.03, true, true);
        let (forward, strike, annuity) = method.forward_strike_annuity(&s, &m).unwrap();
        assert_relative_eq!(strike, 0.03, epsilon = 1e-15);
        assert!(annuity > 0.0);
        let at_money = swaption(forward, true, true);
        let swap: crate::instrument::InstrumentDerivative = at_money.underlying().clone().into();
        let pv = PresentValueDiscountingCalculator::new()
            .present_value(&swap, &m)
            .unwrap();
        assert_relative_eq!(pv.amount(Currency::USD), 0.0, epsilon = 1e-7);
    }
}
