//! Brent's root-finding algorithm.

use log::trace;

use crate::error::{MathError, MathResult};
use crate::rootfinding::{SolverConfig, SolverResult};

/// Brent's root-finding algorithm.
///
/// Combines bisection with the secant method and inverse quadratic
/// interpolation. Requires `f(a)` and `f(b)` of opposite signs.
///
/// Convergence is declared when `|f(b)| < tolerance` or the bracket is
/// narrower than `tolerance`.
///
/// # Example
///
/// ```rust
/// use strata_math::rootfinding::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
#[allow(clippy::many_single_char_names)]
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if !fa.is_finite() || !fb.is_finite() {
        return Err(MathError::invalid_input(format!(
            "function is not finite on bracket [{a}, {b}]"
        )));
    }
    if fa * fb > 0.0 {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }

    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for iteration in 0..config.max_iterations {
        if fb.abs() < config.tolerance || (b - a).abs() < config.tolerance {
            trace!("brent converged after {iteration} iterations at {b}");
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
            });
        }

        let mut use_bisection = true;
        let mut s = 0.0;

        if (fa - fc).abs() > 1e-15 && (fb - fc).abs() > 1e-15 {
            // Inverse quadratic interpolation
            let r = fb / fc;
            let p = fa / fc;
            let q = fa / fb;
            s = b - (q * (q - r) * (b - a) + (1.0 - r) * (b - c) * p)
                / ((q - 1.0) * (r - 1.0) * (p - 1.0));
        } else if (fb - fa).abs() > 1e-15 {
            // Secant
            s = b - fb * (b - a) / (fb - fa);
        }

        let m = (a + b) / 2.0;
        if s > m.min(b) && s < m.max(b) && (s - b).abs() < e.abs() / 2.0 {
            use_bisection = false;
        }

        if use_bisection {
            s = m;
            e = b - a;
            d = e;
        } else {
            e = d;
            d = s - b;
        }

        c = b;
        fc = fb;

        let fs = f(s);
        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }

    Err(MathError::convergence_failed(config.max_iterations, fb.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_sin() {
        let result = brent(f64::sin, 3.0, 4.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::PI, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;
        let err = brent(f, 2.0, 3.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::InvalidBracket { .. }));
    }

    #[test]
    fn test_iteration_cap() {
        let f = |x: f64| x * x - 2.0;
        let config = SolverConfig::new(1e-15, 2);
        let err = brent(f, 0.0, 100.0, &config).unwrap_err();
        assert!(matches!(err, MathError::ConvergenceFailed { iterations: 2, .. }));
    }
}
