//! Root-finding algorithms.
//!
//! - [`brent`]: scalar root of a bracketed function
//! - [`bracket_root`]: expands an interval until it brackets a root
//! - [`NewtonVectorRootFinder`]: Newton-type solver for `f: Rⁿ → Rⁿ` with
//!   pluggable Jacobian strategies (full Newton, Broyden, Sherman-Morrison)
//!
//! # Example
//!
//! ```rust
//! use strata_math::rootfinding::{bracket_root, brent, SolverConfig};
//!
//! let f = |x: f64| x * x - 2.0;
//! let (lo, hi) = bracket_root(f, 0.1, 0.2, None).unwrap();
//! let result = brent(f, lo, hi, &SolverConfig::default()).unwrap();
//! assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod bracket;
mod brent;
pub mod newton;

pub use bracket::{bracket_root, BRACKET_MAX_STEPS};
pub use brent::brent;
pub use newton::{
    NewtonResult, NewtonVectorRootFinder, SolverState, DEFAULT_ABSOLUTE_TOLERANCE,
    DEFAULT_MAX_STEPS, DEFAULT_RELATIVE_TOLERANCE,
};

/// Default tolerance for scalar root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for scalar root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for scalar root-finding algorithms.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Tolerance on the function value and on the bracket width.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a scalar root search.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(50);

        assert!((config.tolerance - 1e-8).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 50);
    }
}
