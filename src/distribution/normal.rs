//! Standard normal helpers
//!
//! Thin wrappers over `statrs` that validate probability arguments at the
//! boundary so an out-of-range level surfaces as an error instead of NaN.

use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

fn standard() -> Result<Normal> {
    Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::invalid_parameter("normal", "N(0, 1)", &e.to_string()))
}

fn check_open_unit(name: &str, p: f64) -> Result<()> {
    if !(p > 0.0 && p < 1.0) {
        return Err(ForecastError::invalid_parameter(name, p, "must lie in (0, 1)"));
    }
    Ok(())
}

/// Standard normal CDF, Φ(x)
pub fn cdf(x: f64) -> Result<f64> {
    Ok(standard()?.cdf(x))
}

/// Upper-tail quantile z such that P(Z > z) = alpha, i.e. Φ⁻¹(1 - alpha)
pub fn upper_quantile(alpha: f64) -> Result<f64> {
    check_open_unit("alpha", alpha)?;
    Ok(standard()?.inverse_cdf(1.0 - alpha))
}

/// Two-sided quantile z such that P(|Z| <= z) = coverage
pub fn two_sided_quantile(coverage: f64) -> Result<f64> {
    check_open_unit("coverage", coverage)?;
    Ok(standard()?.inverse_cdf(0.5 * (1.0 + coverage)))
}

/// P(X >= threshold) for X ~ N(mean, sd²)
///
/// A zero standard deviation collapses to a point mass at `mean`.
pub fn probability_at_least(threshold: f64, mean: f64, sd: f64) -> Result<f64> {
    if !sd.is_finite() || sd < 0.0 {
        return Err(ForecastError::invalid_parameter(
            "sd",
            sd,
            "must be finite and non-negative",
        ));
    }
    if sd == 0.0 {
        return Ok(if mean >= threshold { 1.0 } else { 0.0 });
    }
    cdf((mean - threshold) / sd)
}
