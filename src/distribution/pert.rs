//! Calibrated PERT distribution
//!
//! A Beta distribution rescaled onto [o, p] and peaked at m with
//! peakedness λ (`shape`):
//!
//! ```text
//! mean₀     = (o + λ·m + p) / (λ + 2)
//! variance₀ = (mean₀ − o)·(p − mean₀) / (λ + 3)
//! ```
//!
//! Calibration multiplies the mean by the estimator bias α and the variance
//! by (1 + δ_b)².

use crate::distribution::normal;
use crate::error::{ForecastError, Result};
use crate::estimate::ThreePointEstimate;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use statrs::distribution::Beta;

/// Default PERT peakedness
pub const DEFAULT_SHAPE: f64 = 4.0;

/// Smallest Beta concentration (a + b) used when matching moments
const MIN_CONCENTRATION: f64 = 0.5;

/// Calibrated PERT distribution for one triad
///
/// Holds only its defining parameters; every statistic is derived on demand
/// and sampling never caches draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PertDistribution {
    triad: ThreePointEstimate,
    alpha: f64,
    delta_b: f64,
    shape: f64,
}

impl PertDistribution {
    /// Create a calibrated distribution
    ///
    /// `alpha` must be positive, `delta_b` non-negative and `shape` positive.
    pub fn new(triad: ThreePointEstimate, alpha: f64, delta_b: f64, shape: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(ForecastError::invalid_parameter("alpha", alpha, "bias must be positive"));
        }
        if !delta_b.is_finite() || delta_b < 0.0 {
            return Err(ForecastError::invalid_parameter(
                "delta_b",
                delta_b,
                "uncertainty factor must be non-negative",
            ));
        }
        if !shape.is_finite() || shape <= 0.0 {
            return Err(ForecastError::invalid_parameter("shape", shape, "must be positive"));
        }

        Ok(Self {
            triad,
            alpha,
            delta_b,
            shape,
        })
    }

    /// Uncalibrated PERT distribution (α = 1, δ_b = 0)
    pub fn uncalibrated(triad: ThreePointEstimate, shape: f64) -> Result<Self> {
        Self::new(triad, 1.0, 0.0, shape)
    }

    pub fn triad(&self) -> &ThreePointEstimate {
        &self.triad
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn delta_b(&self) -> f64 {
        self.delta_b
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// PERT mean before bias correction
    pub fn base_mean(&self) -> f64 {
        let t = &self.triad;
        (t.optimistic() + self.shape * t.most_likely() + t.pessimistic()) / (self.shape + 2.0)
    }

    /// PERT variance before uncertainty widening
    pub fn base_variance(&self) -> f64 {
        let mean = self.base_mean();
        let var = (mean - self.triad.optimistic()) * (self.triad.pessimistic() - mean)
            / (self.shape + 3.0);
        var.max(0.0)
    }

    /// Calibrated mean, `mean₀ · α`
    pub fn mean(&self) -> f64 {
        self.base_mean() * self.alpha
    }

    /// Calibrated variance, `variance₀ · (1 + δ_b)²`
    pub fn variance(&self) -> f64 {
        let widen = 1.0 + self.delta_b;
        self.base_variance() * widen * widen
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Normal-approximation central interval holding `coverage` of the mass
    pub fn central_interval(&self, coverage: f64) -> Result<(f64, f64)> {
        let z = normal::two_sided_quantile(coverage)?;
        let half_width = z * self.std_dev();
        let mean = self.mean();
        Ok((mean - half_width, mean + half_width))
    }

    /// Beta parameters on the unit interval matching the calibrated moments
    ///
    /// Draws are scaled by α afterwards, so the unit-interval variance is
    /// `variance() / (α · range)²`.
    fn beta_parameters(&self) -> (f64, f64) {
        let range = self.triad.range();
        let mu = (self.base_mean() - self.triad.optimistic()) / range;
        let scaled_sd = self.alpha * range;
        let var = self.variance() / (scaled_sd * scaled_sd);

        let mut concentration = mu * (1.0 - mu) / var - 1.0;
        if !concentration.is_finite() || concentration < MIN_CONCENTRATION {
            tracing::warn!(
                delta_b = self.delta_b,
                requested_variance = self.variance(),
                "calibrated variance exceeds what a Beta on [o, p] can carry; capping dispersion"
            );
            concentration = MIN_CONCENTRATION;
        }

        (mu * concentration, (1.0 - mu) * concentration)
    }

    /// Draw `n` independent values using the supplied random source
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>> {
        if self.triad.is_degenerate() {
            return Ok(vec![self.mean(); n]);
        }

        let (a, b) = self.beta_parameters();
        let beta = Beta::new(a, b).map_err(|e| {
            ForecastError::invalid_parameter("beta", format!("({}, {})", a, b), &e.to_string())
        })?;

        let o = self.triad.optimistic();
        let range = self.triad.range();
        Ok((0..n)
            .map(|_| self.alpha * (o + range * beta.sample(rng)))
            .collect())
    }

    /// Draw `n` values from a ChaCha generator seeded with `seed`, or from
    /// entropy when no seed is given
    pub fn sample_seeded(&self, n: usize, seed: Option<u64>) -> Result<Vec<f64>> {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.sample(n, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triad(o: f64, m: f64, p: f64) -> ThreePointEstimate {
        ThreePointEstimate::new(o, m, p).unwrap()
    }

    #[test]
    fn test_worked_example() {
        let dist = PertDistribution::uncalibrated(triad(5.0, 8.0, 14.0), DEFAULT_SHAPE).unwrap();
        assert!((dist.mean() - 8.5).abs() < 1e-12);
        assert!((dist.variance() - 2.75).abs() < 1e-12);
    }

    #[test]
    fn test_calibration_applies_bias_and_widening() {
        let t = triad(5.0, 8.0, 14.0);
        let dist = PertDistribution::new(t, 1.2, 0.5, DEFAULT_SHAPE).unwrap();
        assert!((dist.mean() - 8.5 * 1.2).abs() < 1e-12);
        assert!((dist.variance() - 2.75 * 2.25).abs() < 1e-12);
        assert!((dist.base_mean() - 8.5).abs() < 1e-12);
        assert!((dist.base_variance() - 2.75).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let t = triad(1.0, 2.0, 3.0);
        assert!(PertDistribution::new(t, 0.0, 0.0, 4.0).is_err());
        assert!(PertDistribution::new(t, 1.0, -0.1, 4.0).is_err());
        assert!(PertDistribution::new(t, 1.0, 0.0, 0.0).is_err());
        assert!(PertDistribution::new(t, f64::NAN, 0.0, 4.0).is_err());
    }

    #[test]
    fn test_central_interval() {
        let dist = PertDistribution::uncalibrated(triad(5.0, 8.0, 14.0), DEFAULT_SHAPE).unwrap();
        let (lo, hi) = dist.central_interval(0.9).unwrap();
        let half = 1.6448536269514722 * 2.75_f64.sqrt();
        assert!((lo - (8.5 - half)).abs() < 1e-6);
        assert!((hi - (8.5 + half)).abs() < 1e-6);
        assert!(dist.central_interval(1.0).is_err());
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let dist = PertDistribution::new(triad(5.0, 8.0, 14.0), 1.1, 0.2, DEFAULT_SHAPE).unwrap();
        let a = dist.sample_seeded(50, Some(42)).unwrap();
        let b = dist.sample_seeded(50, Some(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
    }

    #[test]
    fn test_sampling_stays_in_scaled_support() {
        let dist = PertDistribution::new(triad(5.0, 8.0, 14.0), 1.5, 0.3, DEFAULT_SHAPE).unwrap();
        let draws = dist.sample_seeded(500, Some(7)).unwrap();
        assert!(draws.iter().all(|&x| (7.5..=21.0).contains(&x)));
    }

    #[test]
    fn test_sample_moments_match() {
        let dist = PertDistribution::new(triad(5.0, 8.0, 14.0), 1.2, 0.25, DEFAULT_SHAPE).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let draws = dist.sample(40_000, &mut rng).unwrap();

        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert!((mean - dist.mean()).abs() < 0.05, "mean {} vs {}", mean, dist.mean());
        assert!(
            (var - dist.variance()).abs() / dist.variance() < 0.05,
            "variance {} vs {}",
            var,
            dist.variance()
        );
    }

    #[test]
    fn test_degenerate_triad_sampling() {
        let dist = PertDistribution::new(triad(3.0, 3.0, 3.0), 2.0, 1.0, DEFAULT_SHAPE).unwrap();
        assert_eq!(dist.variance(), 0.0);
        assert_eq!(dist.sample_seeded(3, Some(1)).unwrap(), vec![6.0; 3]);
    }

    #[test]
    fn test_extreme_widening_still_samples() {
        let dist = PertDistribution::new(triad(1.0, 2.0, 3.0), 1.0, 9.0, DEFAULT_SHAPE).unwrap();
        let draws = dist.sample_seeded(100, Some(3)).unwrap();
        assert!(draws.iter().all(|&x| (1.0..=3.0).contains(&x)));
    }
}
