//! Annuities and swaps.

use serde::{Deserialize, Serialize};
use strata_core::Currency;

use crate::error::{PricingError, PricingResult};
use crate::instrument::payment::CashFlow;

/// An ordered, non-empty list of payments in a single currency.
///
/// Deserialization goes through [`Annuity::new`], so an empty or mixed
/// currency leg is rejected when it is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "AnnuityData<P>",
    bound(deserialize = "P: CashFlow + Deserialize<'de>")
)]
pub struct Annuity<P> {
    payments: Vec<P>,
}

/// Unchecked wire form of an [`Annuity`].
#[derive(Deserialize)]
struct AnnuityData<P> {
    payments: Vec<P>,
}

impl<P: CashFlow> TryFrom<AnnuityData<P>> for Annuity<P> {
    type Error = PricingError;

    fn try_from(data: AnnuityData<P>) -> PricingResult<Self> {
        Self::new(data.payments)
    }
}

impl<P: CashFlow> Annuity<P> {
    /// Creates an annuity.
    pub fn new(payments: Vec<P>) -> PricingResult<Self> {
        let Some(first) = payments.first() else {
            return Err(PricingError::invalid_instrument("annuity has no payment"));
        };
        let currency = first.currency();
        if let Some(p) = payments.iter().find(|p| p.currency() != currency) {
            return Err(PricingError::invalid_instrument(format!(
                "annuity mixes {currency} and {}",
                p.currency()
            )));
        }
        Ok(Self { payments })
    }

    /// Currency of the payments.
    pub fn currency(&self) -> Currency {
        self.payments[0].currency()
    }

    /// Payments in order.
    pub fn payments(&self) -> &[P] {
        &self.payments
    }

    /// The `n`-th payment.
    pub fn nth_payment(&self, n: usize) -> Option<&P> {
        self.payments.get(n)
    }

    /// Number of payments.
    pub fn number_of_payments(&self) -> usize {
        self.payments.len()
    }

    /// Latest payment time.
    pub fn last_payment_time(&self) -> f64 {
        self.payments
            .iter()
            .map(CashFlow::payment_time)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Maps every payment, keeping the order.
    pub fn map<Q: CashFlow>(&self, f: impl FnMut(&P) -> Q) -> Annuity<Q> {
        Annuity {
            payments: self.payments.iter().map(f).collect(),
        }
    }
}

/// Two legs exchanged against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    deserialize = "P1: CashFlow + Deserialize<'de>, P2: CashFlow + Deserialize<'de>"
))]
pub struct Swap<P1, P2> {
    first_leg: Annuity<P1>,
    second_leg: Annuity<P2>,
}

impl<P1: CashFlow, P2: CashFlow> Swap<P1, P2> {
    /// Creates a swap from two legs.
    pub fn new(first_leg: Annuity<P1>, second_leg: Annuity<P2>) -> Self {
        Self {
            first_leg,
            second_leg,
        }
    }

    /// First leg (the fixed leg of a fixed/floating swap).
    pub fn first_leg(&self) -> &Annuity<P1> {
        &self.first_leg
    }

    /// Second leg.
    pub fn second_leg(&self) -> &Annuity<P2> {
        &self.second_leg
    }

    /// Latest payment time of both legs.
    pub fn last_payment_time(&self) -> f64 {
        self.first_leg
            .last_payment_time()
            .max(self.second_leg.last_payment_time())
    }
}
