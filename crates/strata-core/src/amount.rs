//! Monetary amounts keyed by currency.
//!
//! [`MultipleCurrencyAmount`] is the result type of present-value
//! calculations: composite instruments add the values of their parts with
//! [`MultipleCurrencyAmount::plus`], which sums amounts currency by currency.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::error::{CoreError, CoreResult};

/// An amount of money in a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    currency: Currency,
    amount: f64,
}

impl CurrencyAmount {
    /// Creates an amount.
    #[must_use]
    pub fn of(currency: Currency, amount: f64) -> Self {
        Self { currency, amount }
    }

    /// Returns the currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the amount.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Adds an amount in the same currency.
    pub fn plus(&self, other: &CurrencyAmount) -> CoreResult<CurrencyAmount> {
        if self.currency != other.currency {
            return Err(CoreError::currency_mismatch(
                self.currency.code(),
                other.currency.code(),
            ));
        }
        Ok(Self::of(self.currency, self.amount + other.amount))
    }

    /// Scales the amount.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self::of(self.currency, self.amount * factor)
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

/// A collection of amounts, at most one per currency.
///
/// Adding two collections sums amounts that share a currency and keeps the
/// others, so the combination is commutative and associative up to
/// floating-point rounding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultipleCurrencyAmount {
    amounts: BTreeMap<Currency, f64>,
}

impl MultipleCurrencyAmount {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection holding a single amount.
    #[must_use]
    pub fn of(currency: Currency, amount: f64) -> Self {
        let mut amounts = BTreeMap::new();
        amounts.insert(currency, amount);
        Self { amounts }
    }

    /// Creates a collection from a list of amounts, summing duplicates.
    #[must_use]
    pub fn of_amounts(amounts: &[CurrencyAmount]) -> Self {
        amounts
            .iter()
            .fold(Self::new(), |acc, ca| acc.plus_amount(ca.currency(), ca.amount()))
    }

    /// Returns the amount for a currency, if present.
    #[must_use]
    pub fn get(&self, currency: Currency) -> Option<f64> {
        self.amounts.get(&currency).copied()
    }

    /// Returns the amount for a currency, zero when absent.
    #[must_use]
    pub fn amount(&self, currency: Currency) -> f64 {
        self.get(currency).unwrap_or(0.0)
    }

    /// Returns the currency amount for a currency, if present.
    #[must_use]
    pub fn currency_amount(&self, currency: Currency) -> Option<CurrencyAmount> {
        self.get(currency).map(|a| CurrencyAmount::of(currency, a))
    }

    /// Returns the currencies present, in currency order.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.amounts.keys().copied()
    }

    /// Iterates over the amounts in currency order.
    pub fn iter(&self) -> impl Iterator<Item = CurrencyAmount> + '_ {
        self.amounts.iter().map(|(c, a)| CurrencyAmount::of(*c, *a))
    }

    /// Number of currencies present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Returns true if no amount is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Returns the sum of two collections.
    #[must_use]
    pub fn plus(&self, other: &MultipleCurrencyAmount) -> Self {
        let mut amounts = self.amounts.clone();
        for (ccy, amount) in &other.amounts {
            *amounts.entry(*ccy).or_insert(0.0) += amount;
        }
        Self { amounts }
    }

    /// Returns the collection with an amount added.
    #[must_use]
    pub fn plus_amount(mut self, currency: Currency, amount: f64) -> Self {
        *self.amounts.entry(currency).or_insert(0.0) += amount;
        self
    }

    /// Scales every amount.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            amounts: self
                .amounts
                .iter()
                .map(|(c, a)| (*c, a * factor))
                .collect(),
        }
    }
}

impl From<CurrencyAmount> for MultipleCurrencyAmount {
    fn from(ca: CurrencyAmount) -> Self {
        Self::of(ca.currency(), ca.amount())
    }
}

impl fmt::Display for MultipleCurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|ca| ca.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_currency_amount_plus() {
        let a = CurrencyAmount::of(Currency::USD, 10.0);
        let b = CurrencyAmount::of(Currency::USD, 5.5);
        assert_relative_eq!(a.plus(&b).unwrap().amount(), 15.5);

        let c = CurrencyAmount::of(Currency::EUR, 1.0);
        assert!(a.plus(&c).is_err());
    }

    #[test]
    fn test_plus_merges_per_currency() {
        let a = MultipleCurrencyAmount::of(Currency::USD, 100.0).plus_amount(Currency::EUR, 3.0);
        let b = MultipleCurrencyAmount::of(Currency::USD, -40.0).plus_amount(Currency::GBP, 7.0);
        let total = a.plus(&b);

        assert_eq!(total.len(), 3);
        assert_relative_eq!(total.amount(Currency::USD), 60.0);
        assert_relative_eq!(total.amount(Currency::EUR), 3.0);
        assert_relative_eq!(total.amount(Currency::GBP), 7.0);
        assert_eq!(total.get(Currency::JPY), None);
    }

    #[test]
    fn test_of_amounts_sums_duplicates() {
        let m = MultipleCurrencyAmount::of_amounts(&[
            CurrencyAmount::of(Currency::USD, 1.0),
            CurrencyAmount::of(Currency::USD, 2.0),
            CurrencyAmount::of(Currency::CHF, 4.0),
        ]);
        assert_relative_eq!(m.amount(Currency::USD), 3.0);
        assert_relative_eq!(m.amount(Currency::CHF), 4.0);
    }

    #[test]
    fn test_multiplied_by() {
        let m = MultipleCurrencyAmount::of(Currency::USD, 2.0)
            .plus_amount(Currency::EUR, -1.0)
            .multiplied_by(-3.0);
        assert_relative_eq!(m.amount(Currency::USD), -6.0);
        assert_relative_eq!(m.amount(Currency::EUR), 3.0);
    }

    #[test]
    fn test_display() {
        let m = MultipleCurrencyAmount::of(Currency::USD, 1.5);
        assert_eq!(m.to_string(), "[USD 1.5]");
    }
}
