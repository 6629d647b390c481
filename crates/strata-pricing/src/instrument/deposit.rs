//! Money-market instruments: cash deposits and forward rate agreements.

use serde::{Deserialize, Serialize};
use strata_core::Currency;
use strata_curves::IborIndex;

use crate::error::{PricingError, PricingResult};
use crate::instrument::payment::{CashFlow, FixingPeriod};

/// A deposit: the notional is lent at `start_time` and repaid with interest
/// at `end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cash {
    currency: Currency,
    start_time: f64,
    end_time: f64,
    notional: f64,
    rate: f64,
    accrual_factor: f64,
}

impl Cash {
    /// Creates a deposit.
    pub fn new(
        currency: Currency,
        start_time: f64,
        end_time: f64,
        notional: f64,
        rate: f64,
        accrual_factor: f64,
    ) -> PricingResult<Self> {
        if start_time < 0.0 || end_time <= start_time {
            return Err(PricingError::invalid_instrument(format!(
                "deposit period [{start_time}, {end_time}] is invalid"
            )));
        }
        if accrual_factor <= 0.0 {
            return Err(PricingError::invalid_instrument(
                "deposit accrual factor must be positive",
            ));
        }
        Ok(Self {
            currency,
            start_time,
            end_time,
            notional,
            rate,
            accrual_factor,
        })
    }

    /// Start of the deposit.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// End of the deposit.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Signed notional; positive means lending.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Deposit rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Accrual factor of the deposit period.
    pub fn accrual_factor(&self) -> f64 {
        self.accrual_factor
    }
}

impl CashFlow for Cash {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn payment_time(&self) -> f64 {
        self.end_time
    }
}

/// A forward rate agreement settled at the start of its period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fra {
    payment_time: f64,
    payment_year_fraction: f64,
    notional: f64,
    index: IborIndex,
    fixing: FixingPeriod,
    rate: f64,
}

impl Fra {
    /// Creates a FRA paying `notional × δ × (F − rate) / (1 + δF)`.
    pub fn new(
        payment_time: f64,
        payment_year_fraction: f64,
        notional: f64,
        index: IborIndex,
        fixing: FixingPeriod,
        rate: f64,
    ) -> PricingResult<Self> {
        if payment_time < 0.0 || payment_year_fraction <= 0.0 {
            return Err(PricingError::invalid_instrument(
                "FRA payment time must be non-negative and its year fraction positive",
            ));
        }
        Ok(Self {
            payment_time,
            payment_year_fraction,
            notional,
            index,
            fixing,
            rate,
        })
    }

    /// Accrual factor of the payment.
    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    /// Signed notional; positive receives the floating rate.
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

    /// Agreed rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl CashFlow for Fra {
    fn currency(&self) -> Currency {
        self.index.currency()
    }

    fn payment_time(&self) -> f64 {
        self.payment_time
    }
}
