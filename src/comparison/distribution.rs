// Distribution functions backing the comparison p-values
//
// - erf: Abramowitz & Stegun 7.1.26 rational approximation, |error| <= 1.5e-7.
//   The coefficients are fixed so p-values reproduce across implementations.
// - f_survival / chi_squared_survival: exact upper tails from statrs, used by
//   the exact ANOVA mode and the Kruskal-Wallis test.

use crate::comparison::error::{ComparisonError, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};

const A1: f64 = 0.254_829_592;
const A2: f64 = -0.284_496_736;
const A3: f64 = 1.421_413_741;
const A4: f64 = -1.453_152_027;
const A5: f64 = 1.061_405_429;
const P: f64 = 0.327_591_1;

/// Error function approximation (Abramowitz & Stegun 7.1.26)
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;

    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal CDF, Φ(x) = 0.5 * (1 + erf(x / √2))
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Two-tailed p-value for a standard normal statistic, clamped to [0, 1]
pub fn two_tailed_normal_p(z: f64) -> f64 {
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

/// P(F > f) for an F-distribution with (df1, df2) degrees of freedom
///
/// # Errors
/// `InvalidInput` when either degrees-of-freedom value is zero.
pub fn f_survival(f: f64, df1: usize, df2: usize) -> Result<f64> {
    let dist = FisherSnedecor::new(df1 as f64, df2 as f64).map_err(|e| {
        ComparisonError::InvalidInput(format!("F({}, {}) distribution: {}", df1, df2, e))
    })?;

    if f <= 0.0 {
        return Ok(1.0);
    }
    if f.is_infinite() {
        return Ok(0.0);
    }

    Ok(dist.sf(f).clamp(0.0, 1.0))
}

/// P(X > x) for a chi-squared distribution with `df` degrees of freedom
///
/// # Errors
/// `InvalidInput` when `df` is zero.
pub fn chi_squared_survival(x: f64, df: usize) -> Result<f64> {
    let dist = ChiSquared::new(df as f64).map_err(|e| {
        ComparisonError::InvalidInput(format!("chi-squared({}) distribution: {}", df, e))
    })?;

    if x <= 0.0 {
        return Ok(1.0);
    }
    if x.is_infinite() {
        return Ok(0.0);
    }

    Ok(dist.sf(x).clamp(0.0, 1.0))
}
