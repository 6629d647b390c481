//! Sensitivities with respect to curve parameters.

use std::collections::BTreeMap;

use nalgebra::DVector;
use strata_core::Currency;

use crate::building_block::CurveBuildingBlock;
use crate::curve::YieldCurve;
use crate::error::{CurveError, CurveResult};
use crate::provider::MulticurveProvider;
use crate::sensitivity::{MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity};

/// Parameter sensitivities keyed by `(curve name, currency)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipleCurrencyParameterSensitivity {
    sensitivities: BTreeMap<(String, Currency), DVector<f64>>,
}

impl MultipleCurrencyParameterSensitivity {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity holding a single vector.
    #[must_use]
    pub fn of(name: impl Into<String>, currency: Currency, sensitivity: DVector<f64>) -> Self {
        let mut sensitivities = BTreeMap::new();
        sensitivities.insert((name.into(), currency), sensitivity);
        Self { sensitivities }
    }

    /// Adds a vector, summing with any existing vector under the same key.
    pub fn plus(
        mut self,
        name: impl Into<String>,
        currency: Currency,
        sensitivity: &DVector<f64>,
    ) -> CurveResult<Self> {
        let key = (name.into(), currency);
        match self.sensitivities.get_mut(&key) {
            Some(existing) if existing.len() != sensitivity.len() => {
                return Err(CurveError::invalid_value(format!(
                    "sensitivity to {} has {} entries, cannot add {}",
                    key.0,
                    existing.len(),
                    sensitivity.len()
                )));
            }
            Some(existing) => *existing += sensitivity,
            None => {
                self.sensitivities.insert(key, sensitivity.clone());
            }
        }
        Ok(self)
    }

    /// Adds every vector of `other`.
    pub fn plus_all(self, other: &MultipleCurrencyParameterSensitivity) -> CurveResult<Self> {
        other
            .sensitivities
            .iter()
            .try_fold(self, |acc, ((name, ccy), v)| acc.plus(name.clone(), *ccy, v))
    }

    /// Scales every vector.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            sensitivities: self
                .sensitivities
                .iter()
                .map(|(k, v)| (k.clone(), v * factor))
                .collect(),
        }
    }

    /// Vector for a curve and currency, if present.
    #[must_use]
    pub fn get(&self, name: &str, currency: Currency) -> Option<&DVector<f64>> {
        self.sensitivities.get(&(name.to_string(), currency))
    }

    /// Iterates over `(name, currency, vector)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Currency, &DVector<f64>)> {
        self.sensitivities
            .iter()
            .map(|((name, ccy), v)| (name.as_str(), *ccy, v))
    }

    /// Number of `(curve, currency)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    /// Returns true if no entry is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }
}

/// Converts point sensitivities into parameter sensitivities.
///
/// A discounting point `(t, s)` contributes `s · w_j(t)` to parameter `j`,
/// where `w_j(t)` is the weight of node `j` in the interpolated zero rate at
/// `t`. A forward point contributes through the zero rates at both ends of
/// the period.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterSensitivityCalculator;

impl ParameterSensitivityCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Sensitivity to each curve's parameters, by curve name.
    pub fn curve_sensitivities(
        &self,
        provider: &MulticurveProvider,
        sensitivity: &MulticurveSensitivity,
    ) -> CurveResult<BTreeMap<String, DVector<f64>>> {
        let mut result: BTreeMap<String, DVector<f64>> = BTreeMap::new();
        for (name, points) in sensitivity.yield_discounting() {
            let curve = provider.curve(name)?;
            let target = result
                .entry(name.clone())
                .or_insert_with(|| DVector::zeros(curve.number_of_parameters()));
            for &(t, s) in points {
                add_weighted(target, &curve.parameter_sensitivity(t)?, s);
            }
        }
        for (name, points) in sensitivity.forwards() {
            let curve = provider.curve(name)?;
            let target = result
                .entry(name.clone())
                .or_insert_with(|| DVector::zeros(curve.number_of_parameters()));
            for point in points {
                let (d_start, d_end) =
                    forward_rate_derivatives(curve, point.start, point.end, point.accrual)?;
                add_weighted(
                    target,
                    &curve.parameter_sensitivity(point.start)?,
                    point.value * d_start,
                );
                add_weighted(
                    target,
                    &curve.parameter_sensitivity(point.end)?,
                    point.value * d_end,
                );
            }
        }
        Ok(result)
    }

    /// Parameter sensitivity of a multi-currency point sensitivity.
    pub fn parameter_sensitivity(
        &self,
        provider: &MulticurveProvider,
        sensitivity: &MultipleCurrencyMulticurveSensitivity,
    ) -> CurveResult<MultipleCurrencyParameterSensitivity> {
        let mut result = MultipleCurrencyParameterSensitivity::new();
        for (ccy, sens) in sensitivity.iter() {
            for (name, vector) in self.curve_sensitivities(provider, sens)? {
                result = result.plus(name, ccy, &vector)?;
            }
        }
        Ok(result)
    }

    /// Stacked sensitivity to the parameters of the curves in `block`.
    ///
    /// Each curve's vector is placed at its slice in the block. Curves that
    /// are not part of the block are ignored.
    pub fn sensitivity_vector(
        &self,
        provider: &MulticurveProvider,
        sensitivity: &MulticurveSensitivity,
        block: &CurveBuildingBlock,
    ) -> CurveResult<DVector<f64>> {
        let mut result = DVector::zeros(block.total_parameters());
        for (name, vector) in self.curve_sensitivities(provider, sensitivity)? {
            if !block.contains(&name) {
                continue;
            }
            let (start, length) = block.slice(&name)?;
            if length != vector.len() {
                return Err(CurveError::invalid_value(format!(
                    "curve {name} has {} parameters but its block slice holds {length}",
                    vector.len()
                )));
            }
            result.rows_mut(start, length).copy_from(&vector);
        }
        Ok(result)
    }
}

fn add_weighted(target: &mut DVector<f64>, weights: &[f64], factor: f64) {
    for (t, w) in target.iter_mut().zip(weights) {
        *t += factor * w;
    }
}

/// Derivatives of the forward rate with respect to the zero rates at the
/// start and at the end of the period.
fn forward_rate_derivatives(
    curve: &YieldCurve,
    start: f64,
    end: f64,
    accrual: f64,
) -> CurveResult<(f64, f64)> {
    if accrual <= 0.0 {
        return Err(CurveError::invalid_value(format!(
            "accrual factor must be positive, got {accrual}"
        )));
    }
    let ratio = curve.discount_factor(start)? / curve.discount_factor(end)? / accrual;
    Ok((-start * ratio, end * ratio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensitivity::ForwardSensitivity;
    use approx::assert_relative_eq;

    fn provider() -> MulticurveProvider {
        let mut p = MulticurveProvider::new();
        p.set_curve(YieldCurve::new("DSC", vec![1.0, 2.0, 5.0], vec![0.01, 0.015, 0.02]).unwrap());
        p.set_curve(YieldCurve::new("FWD", vec![1.0, 3.0], vec![0.02, 0.025]).unwrap());
        p
    }

    #[test]
    fn test_discounting_maps_through_weights() {
        let sens = MulticurveSensitivity::of_yield_discounting("DSC", vec![(1.5, -3.0)]);
        let result = ParameterSensitivityCalculator::new()
            .curve_sensitivities(&provider(), &sens)
            .unwrap();
        let v = &result["DSC"];
        assert_relative_eq!(v[0], -1.5);
        assert_relative_eq!(v[1], -1.5);
        assert_relative_eq!(v[2], 0.0);
    }

    #[test]
    fn test_forward_matches_bump() {
        let p = provider();
        let sens = MulticurveSensitivity::of_forward(
            "FWD",
            vec![ForwardSensitivity::new(1.5, 2.0, 0.5, 1.0)],
        );
        let v = ParameterSensitivityCalculator::new()
            .curve_sensitivities(&p, &sens)
            .unwrap()["FWD"]
            .clone();

        let base = p.curve("FWD").unwrap();
        let shift = 1e-7;
        for j in 0..2 {
            let mut up = base.parameters().to_vec();
            up[j] += shift;
            let mut down = base.parameters().to_vec();
            down[j] -= shift;
            let f_up = base.with_parameters(up).unwrap().forward_rate(1.5, 2.0, 0.5).unwrap();
            let f_down = base.with_parameters(down).unwrap().forward_rate(1.5, 2.0, 0.5).unwrap();
            assert_relative_eq!(v[j], (f_up - f_down) / (2.0 * shift), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sensitivity_vector_uses_block_layout() {
        let p = provider();
        let block = CurveBuildingBlock::new([("DSC", (0, 3)), ("FWD", (3, 2))]).unwrap();
        let sens = MulticurveSensitivity::of_yield_discounting("FWD", vec![(3.0, 2.0)])
            .plus(&MulticurveSensitivity::of_yield_discounting("DSC", vec![(1.0, 1.0)]));
        let v = ParameterSensitivityCalculator::new()
            .sensitivity_vector(&p, &sens, &block)
            .unwrap();
        assert_eq!(v.len(), 5);
        assert_relative_eq!(v[0], 1.0);
        assert_relative_eq!(v[4], 2.0);

        let dsc_only = CurveBuildingBlock::new([("DSC", (0, 3))]).unwrap();
        let v = ParameterSensitivityCalculator::new()
            .sensitivity_vector(&p, &sens, &dsc_only)
            .unwrap();
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_multiple_currency_plus_checks_length() {
        let s = MultipleCurrencyParameterSensitivity::of("DSC", Currency::USD, DVector::zeros(3));
        assert!(s
            .clone()
            .plus("DSC", Currency::USD, &DVector::from_element(2, 1.0))
            .is_err());
        let s = s
            .plus("DSC", Currency::USD, &DVector::from_element(3, 1.0))
            .unwrap()
            .plus("DSC", Currency::EUR, &DVector::from_element(3, 2.0))
            .unwrap();
        assert_eq!(s.len(), 2);
        assert_relative_eq!(s.get("DSC", Currency::USD).unwrap()[1], 1.0);
    }
}
