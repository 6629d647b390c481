//! Black (lognormal) option price.

use statrs::function::erf::erfc;

const MIN_TOTAL_VOLATILITY: f64 = 1e-14;

/// Standard normal cumulative distribution function.
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Black price of an option on `forward` struck at `strike`.
///
/// `volatility` is the annualised lognormal volatility and `expiry` the time
/// to expiry; the price is expressed in units of `numeraire`. When the total
/// volatility vanishes, or the forward or strike is not positive, the
/// intrinsic value is returned.
///
/// # Example
///
/// ```rust
/// use strata_pricing::model::black::black_price;
///
/// let call = black_price(0.03, 0.03, 1.0, 0.2, 1.0, true);
/// let put = black_price(0.03, 0.03, 1.0, 0.2, 1.0, false);
/// assert!((call - put).abs() < 1e-15);
/// ```
pub fn black_price(
    forward: f64,
    strike: f64,
    numeraire: f64,
    volatility: f64,
    expiry: f64,
    is_call: bool,
) -> f64 {
    let sign = if is_call { 1.0 } else { -1.0 };
    let total_vol = volatility * expiry.max(0.0).sqrt();
    if total_vol < MIN_TOTAL_VOLATILITY || forward <= 0.0 || strike <= 0.0 {
        return numeraire * (sign * (forward - strike)).max(0.0);
    }
    let d1 = (forward / strike).ln() / total_vol + 0.5 * total_vol;
    let d2 = d1 - total_vol;
    numeraire * sign * (forward * normal_cdf(sign * d1) - strike * normal_cdf(sign * d2))
}
