//! Global uncertainty factor (δ_b) calibration
//!
//! coverage(d) is the fraction of triad-carrying observations whose actual
//! falls inside `[mean − z·sd(d), mean + z·sd(d)]`. Widening only grows the
//! interval, so coverage is non-decreasing in d and bisection finds the
//! smallest d meeting the target.

use crate::calibration::{BiasModel, CalibratorConfig};
use crate::distribution::{normal, PertDistribution};
use crate::error::{ForecastError, Result};
use crate::estimate::{BiasObservation, ThreePointEstimate};

/// One observation reduced to what interval coverage needs
struct CoverageCase {
    actual: f64,
    mean: f64,
    base_sd: f64,
}

/// Observations carrying a triad, with their bias-corrected centers
struct CoverageSet {
    cases: Vec<CoverageCase>,
    z: f64,
}

impl CoverageSet {
    fn build(
        observations: &[BiasObservation],
        bias: &BiasModel,
        target_coverage: f64,
        shape: f64,
    ) -> Result<Self> {
        let z = normal::two_sided_quantile(target_coverage)?;

        let mut cases = Vec::new();
        for obs in observations {
            obs.validate()?;
            let Some(triad) = obs.triad() else {
                continue;
            };
            cases.push(Self::case(obs, triad, bias, shape)?);
        }

        if cases.is_empty() {
            return Err(ForecastError::InvalidObservation(
                "no observation carries a three-point estimate; coverage is undefined".to_string(),
            ));
        }

        Ok(Self { cases, z })
    }

    fn case(
        obs: &BiasObservation,
        triad: &ThreePointEstimate,
        bias: &BiasModel,
        shape: f64,
    ) -> Result<CoverageCase> {
        let dist = PertDistribution::new(*triad, bias.alpha_for(obs.estimator()), 0.0, shape)?;
        Ok(CoverageCase {
            actual: obs.actual(),
            mean: dist.mean(),
            base_sd: dist.std_dev(),
        })
    }

    fn coverage(&self, delta_b: f64) -> f64 {
        let widen = 1.0 + delta_b;
        let covered = self
            .cases
            .iter()
            .filter(|c| (c.actual - c.mean).abs() <= self.z * c.base_sd * widen)
            .count();
        covered as f64 / self.cases.len() as f64
    }
}

/// coverage(δ_b) for the given observations
pub(crate) fn coverage(
    observations: &[BiasObservation],
    bias: &BiasModel,
    target_coverage: f64,
    delta_b: f64,
    shape: f64,
) -> Result<f64> {
    if !delta_b.is_finite() || delta_b < 0.0 {
        return Err(ForecastError::invalid_parameter(
            "delta_b",
            delta_b,
            "uncertainty factor must be non-negative",
        ));
    }
    let set = CoverageSet::build(observations, bias, target_coverage, shape)?;
    Ok(set.coverage(delta_b))
}

/// Smallest δ_b in `[0, search_upper]` reaching `target_coverage`
pub(crate) fn fit(
    observations: &[BiasObservation],
    bias: &BiasModel,
    target_coverage: f64,
    config: &CalibratorConfig,
) -> Result<f64> {
    let set = CoverageSet::build(observations, bias, target_coverage, config.shape)?;

    let at_zero = set.coverage(0.0);
    if at_zero >= target_coverage {
        tracing::debug!(coverage = at_zero, "target met without widening");
        return Ok(0.0);
    }

    let at_upper = set.coverage(config.search_upper);
    if at_upper < target_coverage {
        return Err(ForecastError::ConvergenceFailure {
            search_upper: config.search_upper,
            target: target_coverage,
            achieved: at_upper,
        });
    }

    // Invariant: coverage(lo) < target <= coverage(hi)
    let mut lo = 0.0;
    let mut hi = config.search_upper;
    let mut iterations = 0;
    while iterations < config.max_iter && hi - lo > config.tol {
        let mid = 0.5 * (lo + hi);
        if set.coverage(mid) >= target_coverage {
            hi = mid;
        } else {
            lo = mid;
        }
        iterations += 1;
    }

    if hi - lo > config.tol {
        tracing::warn!(
            iterations,
            bracket = hi - lo,
            tol = config.tol,
            "delta_b bisection hit its iteration cap; returning the covering bound"
        );
    }

    tracing::debug!(
        delta_b = hi,
        iterations,
        coverage = set.coverage(hi),
        observations = set.cases.len(),
        "fitted uncertainty factor"
    );

    Ok(hi)
}
