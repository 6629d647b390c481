//! Interpolation methods for curve construction.
//!
//! Curves built by root finding need more than values: each instrument's
//! sensitivity to the curve nodes is obtained through
//! [`Interpolator::node_sensitivity`], the weights `∂y(x)/∂yᵢ`.

mod linear;

pub use linear::LinearInterpolator;

use crate::error::MathResult;

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns `∂y(x)/∂yᵢ` for every node `i`.
    fn node_sensitivity(&self, x: f64) -> MathResult<Vec<f64>>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the node range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}
