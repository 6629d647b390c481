//! Physically settled swaptions on fixed/floating swaps.

mod black;
mod lmm;

pub use black::SwaptionPhysicalBlackMethod;
pub use lmm::SwaptionPhysicalLmmDdMethod;

use serde::{Deserialize, Serialize};
use strata_core::{Currency, CurrencyAmount};
use strata_curves::MarketBundle;

use crate::error::{PricingError, PricingResult};
use crate::instrument::{CashFlow, CouponFixed, Payment, Swap};

/// Option to enter a fixed/floating swap at expiry.
///
/// The swaption is a payer swaption (a call on the swap rate) when the
/// underlying pays the fixed leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SwaptionData")]
pub struct SwaptionPhysicalFixedIbor {
    time_to_expiry: f64,
    settlement_time: f64,
    underlying: Swap<CouponFixed, Payment>,
    is_long: bool,
}

#[derive(Deserialize)]
struct SwaptionData {
    time_to_expiry: f64,
    settlement_time: f64,
    underlying: Swap<CouponFixed, Payment>,
    is_long: bool,
}

impl TryFrom<SwaptionData> for SwaptionPhysicalFixedIbor {
    type Error = PricingError;

    fn try_from(data: SwaptionData) -> PricingResult<Self> {
        Self::new(
            data.time_to_expiry,
            data.settlement_time,
            data.underlying,
            data.is_long,
        )
    }
}

impl SwaptionPhysicalFixedIbor {
    /// Creates a swaption.
    pub fn new(
        time_to_expiry: f64,
        settlement_time: f64,
        underlying: Swap<CouponFixed, Payment>,
        is_long: bool,
    ) -> PricingResult<Self> {
        if !time_to_expiry.is_finite() || time_to_expiry < 0.0 || settlement_time < time_to_expiry {
            return Err(PricingError::invalid_instrument(format!(
                "swaption expiry {time_to_expiry} and settlement {settlement_time} are inconsistent"
            )));
        }
        if underlying.first_leg().currency() != underlying.second_leg().currency() {
            return Err(PricingError::invalid_instrument(
                "swaption underlying legs must share a currency",
            ));
        }
        Ok(Self {
            time_to_expiry,
            settlement_time,
            underlying,
            is_long,
        })
    }

    /// Time to expiry.
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// Settlement time of the underlying swap.
    pub fn settlement_time(&self) -> f64 {
        self.settlement_time
    }

    /// Underlying swap.
    pub fn underlying(&self) -> &Swap<CouponFixed, Payment> {
        &self.underlying
    }

    /// Long or short the option.
    pub fn is_long(&self) -> bool {
        self.is_long
    }

    /// Currency of the underlying.
    pub fn currency(&self) -> Currency {
        self.underlying.first_leg().currency()
    }

    /// Fixed rate of the first coupon of the fixed leg.
    pub fn strike(&self) -> f64 {
        self.underlying.first_leg().payments()[0].fixed_rate()
    }

    /// True when the underlying pays the fixed leg.
    pub fn is_call(&self) -> bool {
        self.underlying.first_leg().payments()[0].notional() < 0.0
    }

    /// Latest payment time of the underlying.
    pub fn last_payment_time(&self) -> f64 {
        self.underlying
            .first_leg()
            .payments()
            .iter()
            .map(CashFlow::payment_time)
            .fold(self.underlying.second_leg().last_payment_time(), f64::max)
    }
}

/// A method giving the market price of a swaption.
pub trait SwaptionPhysicalPricingMethod {
    /// Present value of the swaption.
    fn present_value(
        &self,
        swaption: &SwaptionPhysicalFixedIbor,
        market: &dyn MarketBundle,
    ) -> PricingResult<CurrencyAmount>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::builder::fixed_ibor_swap;
    use strata_curves::IborIndex;

    fn swaption() -> SwaptionPhysicalFixedIbor {
        let libor = IborIndex::new("USD_LIBOR_6M", Currency::USD, 6);
        let swap = fixed_ibor_swap(&libor, 2.0, 5.0, 1.0, 1_000_000.0, 0.03, true).unwrap();
        SwaptionPhysicalFixedIbor::new(2.0, 2.0, swap, true).unwrap()
    }

    #[test]
    fn test_payer_strike() {
        let s = swaption();
        assert!(s.is_call());
        assert_eq!(s.strike(), 0.03);
        assert_eq!(s.last_payment_time(), 7.0);
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let s = swaption();
        let mut value = serde_json::to_value(&s).unwrap();
        let back: SwaptionPhysicalFixedIbor = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(back, s);

        value["settlement_time"] = serde_json::json!(1.0);
        assert!(serde_json::from_value::<SwaptionPhysicalFixedIbor>(value.clone()).is_err());

        value["settlement_time"] = serde_json::json!(2.0);
        value["underlying"]["first_leg"]["payments"] = serde_json::json!([]);
        let err = serde_json::from_value::<SwaptionPhysicalFixedIbor>(value)
            .unwrap_err()
            .to_string();
        assert!(err.contains("no payment"), "{err}");
    }
}
