//! Linear interpolation with flat extrapolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Linear interpolation between nodes, flat beyond the first and last node.
///
/// A single node gives a constant function.
///
/// # Example
///
/// ```rust
/// use strata_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![0.01, 0.03]).unwrap();
/// assert!((interp.interpolate(1.5).unwrap() - 0.02).abs() < 1e-15);
/// assert_eq!(interp.interpolate(0.5).unwrap(), 0.01);
/// assert_eq!(interp.node_sensitivity(1.25).unwrap(), vec![0.75, 0.25]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Creates a linear interpolator.
    ///
    /// `xs` must be strictly increasing and of the same length as `ys`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("node values must be finite"));
        }
        Ok(Self { xs, ys })
    }

    /// Node abscissas.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Node values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Returns a copy with new node values.
    pub fn with_ys(&self, ys: Vec<f64>) -> MathResult<Self> {
        Self::new(self.xs.clone(), ys)
    }

    /// Locates `x`: `Left`/`Right` beyond the nodes, else the segment index
    /// `i` with `xs[i] <= x <= xs[i+1]` and the weight of `xs[i+1]`.
    fn locate(&self, x: f64) -> MathResult<Location> {
        if x.is_nan() {
            return Err(MathError::invalid_input("cannot interpolate at NaN"));
        }
        let n = self.xs.len();
        if n == 1 || x <= self.xs[0] {
            return Ok(Location::Left);
        }
        if x >= self.xs[n - 1] {
            return Ok(Location::Right);
        }
        let i = self.xs.partition_point(|&node| node <= x) - 1;
        let w = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        Ok(Location::Inside(i, w))
    }
}

enum Location {
    Left,
    Right,
    Inside(usize, f64),
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        Ok(match self.locate(x)? {
            Location::Left => self.ys[0],
            Location::Right => self.ys[self.ys.len() - 1],
            Location::Inside(i, w) => self.ys[i] + w * (self.ys[i + 1] - self.ys[i]),
        })
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        Ok(match self.locate(x)? {
            Location::Left | Location::Right => 0.0,
            Location::Inside(i, _) => {
                (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
            }
        })
    }

    fn node_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        let mut weights = vec![0.0; self.xs.len()];
        match self.locate(x)? {
            Location::Left => weights[0] = 1.0,
            Location::Right => weights[self.xs.len() - 1] = 1.0,
            Location::Inside(i, w) => {
                weights[i] = 1.0 - w;
                weights[i + 1] = w;
            }
        }
        Ok(weights)
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
