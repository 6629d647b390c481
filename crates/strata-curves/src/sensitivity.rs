//! Point sensitivities of a value to curve points.
//!
//! A [`MulticurveSensitivity`] records, per curve name, the derivative of a
//! value with respect to the zero rate at given times (discounting) and with
//! respect to forward rates over given periods (projection). Point
//! sensitivities are converted to sensitivities with respect to curve
//! parameters by [`crate::ParameterSensitivityCalculator`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strata_core::Currency;

/// Sensitivity of a value to the forward rate over `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardSensitivity {
    /// Start time of the forward period.
    pub start: f64,
    /// End time of the forward period.
    pub end: f64,
    /// Accrual factor of the forward period.
    pub accrual: f64,
    /// Derivative of the value with respect to the forward rate.
    pub value: f64,
}

impl ForwardSensitivity {
    /// Creates a forward sensitivity.
    #[must_use]
    pub fn new(start: f64, end: f64, accrual: f64, value: f64) -> Self {
        Self {
            start,
            end,
            accrual,
            value,
        }
    }

    fn same_period(&self, other: &ForwardSensitivity) -> bool {
        self.start == other.start && self.end == other.end && self.accrual == other.accrual
    }
}

/// Point sensitivities to discounting and forward curves, keyed by curve name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MulticurveSensitivity {
    yield_discounting: BTreeMap<String, Vec<(f64, f64)>>,
    forwards: BTreeMap<String, Vec<ForwardSensitivity>>,
}

impl MulticurveSensitivity {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensitivity to the zero rates of a discounting curve.
    ///
    /// Each pair is `(time, d value / d zero rate at time)`.
    #[must_use]
    pub fn of_yield_discounting(curve: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        let mut yield_discounting = BTreeMap::new();
        yield_discounting.insert(curve.into(), points);
        Self {
            yield_discounting,
            forwards: BTreeMap::new(),
        }
    }

    /// Sensitivity to forward rates of a projection curve.
    #[must_use]
    pub fn of_forward(curve: impl Into<String>, points: Vec<ForwardSensitivity>) -> Self {
        let mut forwards = BTreeMap::new();
        forwards.insert(curve.into(), points);
        Self {
            yield_discounting: BTreeMap::new(),
            forwards,
        }
    }

    /// Discounting sensitivities by curve name.
    #[must_use]
    pub fn yield_discounting(&self) -> &BTreeMap<String, Vec<(f64, f64)>> {
        &self.yield_discounting
    }

    /// Forward sensitivities by curve name.
    #[must_use]
    pub fn forwards(&self) -> &BTreeMap<String, Vec<ForwardSensitivity>> {
        &self.forwards
    }

    /// Names of every curve with at least one point.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self
            .yield_discounting
            .keys()
            .chain(self.forwards.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter()
    }

    /// Concatenates the points of two sensitivities.
    #[must_use]
    pub fn plus(&self, other: &MulticurveSensitivity) -> Self {
        let mut result = self.clone();
        for (name, points) in &other.yield_discounting {
            result
                .yield_discounting
                .entry(name.clone())
                .or_default()
                .extend_from_slice(points);
        }
        for (name, points) in &other.forwards {
            result
                .forwards
                .entry(name.clone())
                .or_default()
                .extend_from_slice(points);
        }
        result
    }

    /// Scales every point.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            yield_discounting: self
                .yield_discounting
                .iter()
                .map(|(k, v)| (k.clone(), v.iter().map(|(t, s)| (*t, s * factor)).collect()))
                .collect(),
            forwards: self
                .forwards
                .iter()
                .map(|(k, v)| {
                    let scaled = v
                        .iter()
                        .map(|f| ForwardSensitivity {
                            value: f.value * factor,
                            ..*f
                        })
                        .collect();
                    (k.clone(), scaled)
                })
                .collect(),
        }
    }

    /// Merges points at the same time (or period) and sorts them.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        let yield_discounting = self
            .yield_discounting
            .iter()
            .map(|(name, points)| {
                let mut sorted = points.clone();
                sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
                let mut merged: Vec<(f64, f64)> = Vec::with_capacity(sorted.len());
                for (t, s) in sorted {
                    match merged.last_mut() {
                        Some(last) if last.0 == t => last.1 += s,
                        _ => merged.push((t, s)),
                    }
                }
                (name.clone(), merged)
            })
            .collect();
        let forwards = self
            .forwards
            .iter()
            .map(|(name, points)| {
                let mut sorted = points.clone();
                sorted.sort_by(|a, b| {
                    a.start
                        .total_cmp(&b.start)
                        .then(a.end.total_cmp(&b.end))
                        .then(a.accrual.total_cmp(&b.accrual))
                });
                let mut merged: Vec<ForwardSensitivity> = Vec::with_capacity(sorted.len());
                for f in sorted {
                    match merged.last_mut() {
                        Some(last) if last.same_period(&f) => last.value += f.value,
                        _ => merged.push(f),
                    }
                }
                (name.clone(), merged)
            })
            .collect();
        Self {
            yield_discounting,
            forwards,
        }
    }

    /// Returns true if no point is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yield_discounting.values().all(Vec::is_empty)
            && self.forwards.values().all(Vec::is_empty)
    }
}

/// Point sensitivities split by the currency of the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultipleCurrencyMulticurveSensitivity {
    sensitivities: BTreeMap<Currency, MulticurveSensitivity>,
}

impl MultipleCurrencyMulticurveSensitivity {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity in a single currency.
    #[must_use]
    pub fn of(currency: Currency, sensitivity: MulticurveSensitivity) -> Self {
        let mut sensitivities = BTreeMap::new();
        sensitivities.insert(currency, sensitivity);
        Self { sensitivities }
    }

    /// Sensitivity for a currency, if present.
    #[must_use]
    pub fn get(&self, currency: Currency) -> Option<&MulticurveSensitivity> {
        self.sensitivities.get(&currency)
    }

    /// Currencies present, in currency order.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.sensitivities.keys().copied()
    }

    /// Iterates over the per-currency sensitivities.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, &MulticurveSensitivity)> {
        self.sensitivities.iter().map(|(c, s)| (*c, s))
    }

    /// Sums two sensitivities currency by currency.
    #[must_use]
    pub fn plus(&self, other: &MultipleCurrencyMulticurveSensitivity) -> Self {
        let mut sensitivities = self.sensitivities.clone();
        for (ccy, sens) in &other.sensitivities {
            let merged = match sensitivities.get(ccy) {
                Some(existing) => existing.plus(sens),
                None => sens.clone(),
            };
            sensitivities.insert(*ccy, merged);
        }
        Self { sensitivities }
    }

    /// Scales every currency.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            sensitivities: self
                .sensitivities
                .iter()
                .map(|(c, s)| (*c, s.multiplied_by(factor)))
                .collect(),
        }
    }

    /// Cleans every currency.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        Self {
            sensitivities: self
                .sensitivities
                .iter()
                .map(|(c, s)| (*c, s.cleaned()))
                .collect(),
        }
    }

    /// Number of currencies present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    /// Returns true if no currency is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }
}
