//! Estimator calibration module
//!
//! Provides:
//! - Per-estimator bias fitting from historical actual/estimate ratios
//! - Global uncertainty factor fitting against a target interval coverage
//! - Construction of calibrated distributions for new triads

mod bias;
mod uncertainty;

pub use bias::{BiasModel, NEUTRAL_ALPHA};

use crate::distribution::{PertDistribution, DEFAULT_SHAPE};
use crate::error::{ForecastError, Result};
use crate::estimate::{BiasObservation, ThreePointEstimate};
use serde::{Deserialize, Serialize};

/// Configuration for calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibratorConfig {
    /// PERT peakedness λ
    pub shape: f64,
    /// Upper bound of the δ_b search range
    pub search_upper: f64,
    /// Maximum bisection iterations
    pub max_iter: usize,
    /// Convergence tolerance on δ_b
    pub tol: f64,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            shape: DEFAULT_SHAPE,
            search_upper: 10.0,
            max_iter: 100,
            tol: 1e-6,
        }
    }
}

impl CalibratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set PERT peakedness
    pub fn with_shape(mut self, shape: f64) -> Self {
        self.shape = shape;
        self
    }

    /// Set upper bound of the δ_b search
    pub fn with_search_upper(mut self, upper: f64) -> Self {
        self.search_upper = upper;
        self
    }

    /// Set maximum bisection iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.shape.is_finite() || self.shape <= 0.0 {
            return Err(ForecastError::invalid_parameter("shape", self.shape, "must be positive"));
        }
        if !self.search_upper.is_finite() || self.search_upper <= 0.0 {
            return Err(ForecastError::invalid_parameter(
                "search_upper",
                self.search_upper,
                "must be positive",
            ));
        }
        if self.max_iter == 0 {
            return Err(ForecastError::invalid_parameter("max_iter", 0, "must be at least 1"));
        }
        if !self.tol.is_finite() || self.tol <= 0.0 {
            return Err(ForecastError::invalid_parameter("tol", self.tol, "must be positive"));
        }
        Ok(())
    }
}

/// Fits bias and uncertainty from history and builds calibrated distributions
///
/// Stateless apart from its configuration: every fit returns a new value and
/// leaves the calibrator untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibrator {
    config: CalibratorConfig,
}

impl Calibrator {
    /// Create a calibrator from a validated configuration
    pub fn new(config: CalibratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    pub fn shape(&self) -> f64 {
        self.config.shape
    }

    /// Fit per-estimator bias α
    ///
    /// α is the arithmetic mean of `actual / modal_estimate` over each
    /// estimator's observations. Estimators with no observations are absent
    /// and resolve to the neutral 1.0.
    pub fn fit_bias(&self, observations: &[BiasObservation]) -> Result<BiasModel> {
        bias::fit(observations)
    }

    /// Fit the global uncertainty factor δ_b
    ///
    /// Only observations carrying a triad take part. Returns the smallest
    /// δ_b >= 0 whose coverage reaches `target_coverage`, or
    /// `ConvergenceFailure` when even the top of the search range falls short.
    pub fn fit_delta_b(
        &self,
        observations: &[BiasObservation],
        bias: &BiasModel,
        target_coverage: f64,
    ) -> Result<f64> {
        uncertainty::fit(observations, bias, target_coverage, &self.config)
    }

    /// Fraction of triad-carrying observations covered at `delta_b`
    pub fn coverage(
        &self,
        observations: &[BiasObservation],
        bias: &BiasModel,
        target_coverage: f64,
        delta_b: f64,
    ) -> Result<f64> {
        uncertainty::coverage(observations, bias, target_coverage, delta_b, self.config.shape)
    }

    /// Calibrated distribution for `triad` given by `estimator`
    pub fn build_distribution(
        &self,
        triad: &ThreePointEstimate,
        estimator: &str,
        bias: &BiasModel,
        delta_b: f64,
    ) -> Result<PertDistribution> {
        self.build_distribution_with_shape(triad, estimator, bias, delta_b, self.config.shape)
    }

    /// Calibrated distribution with an explicit peakedness
    pub fn build_distribution_with_shape(
        &self,
        triad: &ThreePointEstimate,
        estimator: &str,
        bias: &BiasModel,
        delta_b: f64,
        shape: f64,
    ) -> Result<PertDistribution> {
        PertDistribution::new(*triad, bias.alpha_for(estimator), delta_b, shape)
    }
}

/// Calibrator with the default search settings and the given peakedness
pub fn default_calibrator(shape: f64) -> Result<Calibrator> {
    Calibrator::new(CalibratorConfig::default().with_shape(shape))
}
