//! Interpolated curves.
//!
//! A [`YieldCurve`] is parametrised by continuously compounded zero rates at
//! node times. These rates are the curve's parameters: curve building solves
//! for them, and sensitivities are expressed with respect to them.

use serde::{Deserialize, Serialize};
use strata_math::interpolation::{Interpolator, LinearInterpolator};

use crate::error::{CurveError, CurveResult};

/// A named yield curve of continuously compounded zero rates.
///
/// Rates are linearly interpolated between nodes and flat beyond them.
///
/// # Example
///
/// ```rust
/// use strata_curves::YieldCurve;
///
/// let curve = YieldCurve::new("USD_DISC", vec![1.0, 5.0], vec![0.02, 0.03]).unwrap();
/// let df = curve.discount_factor(2.0).unwrap();
/// assert!((df - (-0.0225_f64 * 2.0).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct YieldCurve {
    name: String,
    interpolator: LinearInterpolator,
}

impl YieldCurve {
    /// Creates a curve from node times and zero rates.
    pub fn new(name: impl Into<String>, times: Vec<f64>, rates: Vec<f64>) -> CurveResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CurveError::invalid_value("curve name is empty"));
        }
        if times.first().is_some_and(|t| *t < 0.0) {
            return Err(CurveError::invalid_value(format!(
                "curve {name} has a negative node time"
            )));
        }
        let interpolator = LinearInterpolator::new(times, rates)?;
        Ok(Self { name, interpolator })
    }

    /// Creates a flat curve with a single node.
    pub fn flat(name: impl Into<String>, rate: f64) -> CurveResult<Self> {
        Self::new(name, vec![1.0], vec![rate])
    }

    /// Curve name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node times.
    pub fn times(&self) -> &[f64] {
        self.interpolator.xs()
    }

    /// Zero rates at the nodes (the curve parameters).
    pub fn parameters(&self) -> &[f64] {
        self.interpolator.ys()
    }

    /// Number of parameters.
    pub fn number_of_parameters(&self) -> usize {
        self.interpolator.xs().len()
    }

    /// Returns a copy of the curve with new parameters.
    pub fn with_parameters(&self, parameters: Vec<f64>) -> CurveResult<Self> {
        if parameters.len() != self.number_of_parameters() {
            return Err(CurveError::invalid_value(format!(
                "curve {} has {} parameters, got {}",
                self.name,
                self.number_of_parameters(),
                parameters.len()
            )));
        }
        Ok(Self {
            name: self.name.clone(),
            interpolator: self.interpolator.with_ys(parameters)?,
        })
    }

    /// Continuously compounded zero rate at time `t`.
    pub fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        Ok(self.interpolator.interpolate(t)?)
    }

    /// Discount factor `exp(-r(t) t)`.
    pub fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        Ok((-self.zero_rate(t)? * t).exp())
    }

    /// Simply compounded forward rate between `start` and `end` with accrual
    /// factor `accrual`.
    pub fn forward_rate(&self, start: f64, end: f64, accrual: f64) -> CurveResult<f64> {
        if accrual <= 0.0 {
            return Err(CurveError::invalid_value(format!(
                "accrual factor must be positive, got {accrual}"
            )));
        }
        let df_start = self.discount_factor(start)?;
        let df_end = self.discount_factor(end)?;
        Ok((df_start / df_end - 1.0) / accrual)
    }

    /// Sensitivity of the zero rate at `t` to each parameter.
    pub fn parameter_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>> {
        Ok(self.interpolator.node_sensitivity(t)?)
    }
}

/// Definition of a curve's shape without values, used to seed calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveNodes {
    /// Curve name.
    pub name: String,
    /// Node times.
    pub times: Vec<f64>,
}

/// An interpolated price index curve (e.g. CPI levels).
#[derive(Debug, Clone, PartialEq)]
pub struct PriceIndexCurve {
    name: String,
    interpolator: LinearInterpolator,
}

impl PriceIndexCurve {
    /// Creates a price index curve from times and index levels.
    pub fn new(name: impl Into<String>, times: Vec<f64>, levels: Vec<f64>) -> CurveResult<Self> {
        if levels.iter().any(|v| *v <= 0.0) {
            return Err(CurveError::invalid_value("price index levels must be positive"));
        }
        Ok(Self {
            name: name.into(),
            interpolator: LinearInterpolator::new(times, levels)?,
        })
    }

    /// Curve name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Estimated index level at time `t`.
    pub fn price_index(&self, t: f64) -> CurveResult<f64> {
        Ok(self.interpolator.interpolate(t)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve() -> YieldCurve {
        YieldCurve::new("USD_DISC", vec![0.5, 1.0, 2.0, 5.0], vec![0.01, 0.015, 0.02, 0.03]).unwrap()
    }

    #[test]
    fn test_discount_factor() {
        let c = curve();
        assert_relative_eq!(c.discount_factor(0.0).unwrap(), 1.0);
        assert_relative_eq!(c.discount_factor(1.0).unwrap(), (-0.015_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(
            c.discount_factor(10.0).unwrap(),
            (-0.3_f64).exp(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_forward_rate() {
        let c = curve();
        let f = c.forward_rate(1.0, 2.0, 1.0).unwrap();
        let expected = c.discount_factor(1.0).unwrap() / c.discount_factor(2.0).unwrap() - 1.0;
        assert_relative_eq!(f, expected, epsilon = 1e-15);
        assert!(c.forward_rate(1.0, 2.0, 0.0).is_err());
    }

    #[test]
    fn test_with_parameters() {
        let c = curve();
        let bumped = c.with_parameters(vec![0.02; 4]).unwrap();
        assert_eq!(bumped.name(), "USD_DISC");
        assert_relative_eq!(bumped.zero_rate(3.0).unwrap(), 0.02);
        assert!(c.with_parameters(vec![0.02; 3]).is_err());
    }

    #[test]
    fn test_parameter_sensitivity_matches_bump() {
        let c = curve();
        let t = 1.5;
        let sens = c.parameter_sensitivity(t).unwrap();
        let base = c.zero_rate(t).unwrap();
        for i in 0..c.number_of_parameters() {
            let mut p = c.parameters().to_vec();
            p[i] += 1e-6;
            let bumped = c.with_parameters(p).unwrap().zero_rate(t).unwrap();
            assert_relative_eq!((bumped - base) / 1e-6, sens[i], epsilon = 1e-8);
        }
    }

    #[test]
    fn test_invalid_curves() {
        assert!(YieldCurve::new("", vec![1.0], vec![0.01]).is_err());
        assert!(YieldCurve::new("X", vec![-1.0], vec![0.01]).is_err());
        assert!(YieldCurve::new("X", vec![2.0, 1.0], vec![0.01, 0.02]).is_err());
    }

    #[test]
    fn test_price_index() {
        let cpi = PriceIndexCurve::new("US_CPI", vec![0.0, 1.0], vec![300.0, 306.0]).unwrap();
        assert_relative_eq!(cpi.price_index(0.5).unwrap(), 303.0);
        assert!(PriceIndexCurve::new("X", vec![0.0], vec![0.0]).is_err());
    }
}
