//! Bracketing of scalar roots.

use crate::error::{MathError, MathResult};

/// Maximum number of expansions tried by [`bracket_root`].
pub const BRACKET_MAX_STEPS: u32 = 50;

const RATIO: f64 = 1.6;

/// Expands `[lower, upper]` geometrically until `f` changes sign on it.
///
/// When `limits` is given the interval is never expanded past them. Returns
/// the bracketing interval, or [`MathError::InvalidBracket`] with the last
/// interval tried.
pub fn bracket_root<F>(
    f: F,
    lower: f64,
    upper: f64,
    limits: Option<(f64, f64)>,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if lower.partial_cmp(&upper) != Some(std::cmp::Ordering::Less) {
        return Err(MathError::invalid_input(format!(
            "bracket needs lower < upper, got [{lower}, {upper}]"
        )));
    }
    let (min_x, max_x) = limits.unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
    if lower < min_x || upper > max_x {
        return Err(MathError::invalid_input(format!(
            "initial interval [{lower}, {upper}] is outside the limits [{min_x}, {max_x}]"
        )));
    }

    let mut x1 = lower;
    let mut x2 = upper;
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    for _ in 0..BRACKET_MAX_STEPS {
        if f1 * f2 <= 0.0 {
            return Ok((x1, x2));
        }
        // Move the end with the smaller residual: the root is likely beyond it.
        if f1.abs() < f2.abs() {
            x1 = (x1 + RATIO * (x1 - x2)).max(min_x);
            f1 = f(x1);
        } else {
            x2 = (x2 + RATIO * (x2 - x1)).min(max_x);
            f2 = f(x2);
        }
        if x1 <= min_x && x2 >= max_x && f1 * f2 > 0.0 {
            break;
        }
    }

    if f1 * f2 <= 0.0 {
        return Ok((x1, x2));
    }
    Err(MathError::InvalidBracket {
        a: x1,
        b: x2,
        fa: f1,
        fb: f2,
    })
}
