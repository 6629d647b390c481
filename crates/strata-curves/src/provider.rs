//! Multi-curve market data.
//!
//! [`MarketBundle`] is the read-only view pricing methods consume: discount
//! factors by currency, forward rates by index, price index levels by name.
//! [`MulticurveProvider`] implements it over a set of named [`YieldCurve`]s.

use std::collections::{BTreeMap, HashMap};

use strata_core::Currency;

use crate::curve::{PriceIndexCurve, YieldCurve};
use crate::error::{CurveError, CurveResult};
use crate::index::{IborIndex, OvernightIndex};

/// Market data consumed by pricing methods.
pub trait MarketBundle {
    /// Name of the curve discounting cash flows in `currency`.
    fn discounting_curve_name(&self, currency: Currency) -> CurveResult<&str>;

    /// Name of the curve projecting `index`.
    fn ibor_curve_name(&self, index: &IborIndex) -> CurveResult<&str>;

    /// Name of the curve projecting the overnight `index`.
    fn overnight_curve_name(&self, index: &OvernightIndex) -> CurveResult<&str>;

    /// Discount factor for `currency` at time `t`.
    fn discount_factor(&self, currency: Currency, t: f64) -> CurveResult<f64>;

    /// Forward rate of `index` over `[start, end]`.
    fn ibor_forward_rate(
        &self,
        index: &IborIndex,
        start: f64,
        end: f64,
        accrual: f64,
    ) -> CurveResult<f64>;

    /// Compounded overnight forward rate over `[start, end]`.
    fn overnight_forward_rate(
        &self,
        index: &OvernightIndex,
        start: f64,
        end: f64,
        accrual: f64,
    ) -> CurveResult<f64>;

    /// Level of the named price index at time `t`.
    fn price_index(&self, name: &str, t: f64) -> CurveResult<f64>;
}

/// Named yield curves plus the currency and index mappings onto them.
///
/// Curves are kept in insertion order. One curve may serve several roles,
/// e.g. discounting USD and projecting Fed Funds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MulticurveProvider {
    curves: Vec<YieldCurve>,
    positions: HashMap<String, usize>,
    discounting: BTreeMap<Currency, String>,
    ibor: BTreeMap<IborIndex, String>,
    overnight: BTreeMap<OvernightIndex, String>,
    price_indices: BTreeMap<String, PriceIndexCurve>,
}

impl MulticurveProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a curve, replacing any curve with the same name.
    pub fn set_curve(&mut self, curve: YieldCurve) {
        match self.positions.get(curve.name()) {
            Some(&i) => self.curves[i] = curve,
            None => {
                self.positions
                    .insert(curve.name().to_string(), self.curves.len());
                self.curves.push(curve);
            }
        }
    }

    /// Adds a curve and uses it to discount `currency`.
    pub fn set_discount_curve(&mut self, currency: Currency, curve: YieldCurve) {
        self.discounting.insert(currency, curve.name().to_string());
        self.set_curve(curve);
    }

    /// Adds a curve and uses it to project `index`.
    pub fn set_ibor_curve(&mut self, index: IborIndex, curve: YieldCurve) {
        self.ibor.insert(index, curve.name().to_string());
        self.set_curve(curve);
    }

    /// Adds a curve and uses it to project the overnight `index`.
    pub fn set_overnight_curve(&mut self, index: OvernightIndex, curve: YieldCurve) {
        self.overnight.insert(index, curve.name().to_string());
        self.set_curve(curve);
    }

    /// Adds a price index curve.
    pub fn set_price_index_curve(&mut self, curve: PriceIndexCurve) {
        self.price_indices.insert(curve.name().to_string(), curve);
    }

    /// Returns the curve with this name.
    pub fn curve(&self, name: &str) -> CurveResult<&YieldCurve> {
        self.positions
            .get(name)
            .map(|&i| &self.curves[i])
            .ok_or_else(|| CurveError::curve_not_found(name))
    }

    /// Returns true if a curve with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Replaces the parameters of an existing curve.
    pub fn update_curve_parameters(&mut self, name: &str, parameters: Vec<f64>) -> CurveResult<()> {
        let &i = self
            .positions
            .get(name)
            .ok_or_else(|| CurveError::curve_not_found(name))?;
        self.curves[i] = self.curves[i].with_parameters(parameters)?;
        Ok(())
    }

    /// Curve names in insertion order.
    pub fn all_curve_names(&self) -> impl Iterator<Item = &str> {
        self.curves.iter().map(YieldCurve::name)
    }

    /// Number of parameters of the named curve.
    pub fn number_of_parameters(&self, name: &str) -> CurveResult<usize> {
        Ok(self.curve(name)?.number_of_parameters())
    }

    /// Number of curves.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns true if no curve is present.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Currencies with a discounting curve.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.discounting.keys().copied()
    }

    /// Adds every curve and mapping of `other`; `other` wins on conflicts.
    pub fn merge(&mut self, other: &MulticurveProvider) {
        for curve in &other.curves {
            self.set_curve(curve.clone());
        }
        self.discounting
            .extend(other.discounting.iter().map(|(k, v)| (*k, v.clone())));
        self.ibor
            .extend(other.ibor.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.overnight
            .extend(other.overnight.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.price_indices
            .extend(other.price_indices.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl MarketBundle for MulticurveProvider {
    fn discounting_curve_name(&self, currency: Currency) -> CurveResult<&str> {
        self.discounting
            .get(&currency)
            .map(String::as_str)
            .ok_or(CurveError::DiscountingCurveNotFound { currency })
    }

    fn ibor_curve_name(&self, index: &IborIndex) -> CurveResult<&str> {
        self.ibor
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CurveError::index_not_found(index.name()))
    }

    fn overnight_curve_name(&self, index: &OvernightIndex) -> CurveResult<&str> {
        self.overnight
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CurveError::index_not_found(index.name()))
    }

    fn discount_factor(&self, currency: Currency, t: f64) -> CurveResult<f64> {
        self.curve(self.discounting_curve_name(currency)?)?
            .discount_factor(t)
    }

    fn ibor_forward_rate(
        &self,
        index: &IborIndex,
        start: f64,
        end: f64,
        accrual: f64,
    ) -> CurveResult<f64> {
        self.curve(self.ibor_curve_name(index)?)?
            .forward_rate(start, end, accrual)
    }

    fn overnight_forward_rate(
        &self,
        index: &OvernightIndex,
        start: f64,
        end: f64,
        accrual: f64,
    ) -> CurveResult<f64> {
        self.curve(self.overnight_curve_name(index)?)?
            .forward_rate(start, end, accrual)
    }

    fn price_index(&self, name: &str, t: f64) -> CurveResult<f64> {
        self.price_indices
            .get(name)
            .ok_or_else(|| CurveError::index_not_found(name))?
            .price_index(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn usd_libor_3m() -> IborIndex {
        IborIndex::new("USD_LIBOR_3M", Currency::USD, 3)
    }

    fn provider() -> MulticurveProvider {
        let mut p = MulticurveProvider::new();
        p.set_discount_curve(Currency::USD, YieldCurve::flat("USD_DISC", 0.02).unwrap());
        p.set_ibor_curve(usd_libor_3m(), YieldCurve::flat("USD_FWD3M", 0.03).unwrap());
        p
    }

    #[test]
    fn test_lookups() {
        let p = provider();
        assert_eq!(p.discounting_curve_name(Currency::USD).unwrap(), "USD_DISC");
        assert_eq!(p.ibor_curve_name(&usd_libor_3m()).unwrap(), "USD_FWD3M");
        assert_relative_eq!(
            p.discount_factor(Currency::USD, 2.0).unwrap(),
            (-0.04_f64).exp()
        );
        let names: Vec<&str> = p.all_curve_names().collect();
        assert_eq!(names, vec!["USD_DISC", "USD_FWD3M"]);
    }

    #[test]
    fn test_missing_lookups_are_typed() {
        let p = provider();
        assert_eq!(
            p.discount_factor(Currency::EUR, 1.0).unwrap_err(),
            CurveError::DiscountingCurveNotFound {
                currency: Currency::EUR
            }
        );
        assert!(matches!(
            p.curve("EUR_DISC"),
            Err(CurveError::CurveNotFound { .. })
        ));
        let ois = OvernightIndex::new("FEDFUND", Currency::USD);
        assert!(matches!(
            p.overnight_forward_rate(&ois, 0.0, 1.0, 1.0),
            Err(CurveError::IndexNotFound { .. })
        ));
        assert!(p.price_index("US_CPI", 1.0).is_err());
    }

    #[test]
    fn test_set_curve_replaces_in_place() {
        let mut p = provider();
        p.set_curve(YieldCurve::flat("USD_DISC", 0.05).unwrap());
        assert_eq!(p.len(), 2);
        assert_relative_eq!(p.curve("USD_DISC").unwrap().zero_rate(1.0).unwrap(), 0.05);
        assert_eq!(p.all_curve_names().next(), Some("USD_DISC"));
    }

    #[test]
    fn test_update_parameters() {
        let mut p = provider();
        p.update_curve_parameters("USD_FWD3M", vec![0.04]).unwrap();
        assert_relative_eq!(
            p.curve("USD_FWD3M").unwrap().zero_rate(5.0).unwrap(),
            0.04
        );
        assert!(p.update_curve_parameters("NOPE", vec![0.04]).is_err());
    }

    #[test]
    fn test_merge() {
        let mut base = MulticurveProvider::new();
        base.set_discount_curve(Currency::EUR, YieldCurve::flat("EUR_DISC", 0.01).unwrap());
        base.merge(&provider());
        assert_eq!(base.len(), 3);
        assert!(base.discount_factor(Currency::USD, 1.0).is_ok());
        assert!(base.discount_factor(Currency::EUR, 1.0).is_ok());
    }
}
