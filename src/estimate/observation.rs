//! Historical estimate-vs-actual observation

use crate::error::{ForecastError, Result};
use crate::estimate::ThreePointEstimate;
use serde::{Deserialize, Serialize};

/// A single historical bias sample
///
/// Observations without a triad still feed bias fitting but carry too little
/// information to test interval coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasObservation {
    /// Estimator identifier
    estimator: String,
    /// Single-point estimate originally given
    modal_estimate: f64,
    /// Realized effort
    actual: f64,
    /// Optional three-point estimate given alongside the modal estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    triad: Option<ThreePointEstimate>,
}

impl BiasObservation {
    /// Create an observation without a triad
    pub fn new(estimator: impl Into<String>, modal_estimate: f64, actual: f64) -> Self {
        Self {
            estimator: estimator.into(),
            modal_estimate,
            actual,
            triad: None,
        }
    }

    /// Attach the triad given alongside the modal estimate
    pub fn with_triad(mut self, triad: ThreePointEstimate) -> Self {
        self.triad = Some(triad);
        self
    }

    pub fn estimator(&self) -> &str {
        &self.estimator
    }

    pub fn modal_estimate(&self) -> f64 {
        self.modal_estimate
    }

    pub fn actual(&self) -> f64 {
        self.actual
    }

    pub fn triad(&self) -> Option<&ThreePointEstimate> {
        self.triad.as_ref()
    }

    /// Ratio `actual / modal_estimate`
    pub fn ratio(&self) -> f64 {
        self.actual / self.modal_estimate
    }

    /// Check the numeric fields used by fitting
    pub fn validate(&self) -> Result<()> {
        if !self.modal_estimate.is_finite() || self.modal_estimate <= 0.0 {
            return Err(ForecastError::InvalidObservation(format!(
                "estimator '{}': modal_estimate must be positive, got {}",
                self.estimator, self.modal_estimate
            )));
        }
        if !self.actual.is_finite() || self.actual < 0.0 {
            return Err(ForecastError::InvalidObservation(format!(
                "estimator '{}': actual must be non-negative, got {}",
                self.estimator, self.actual
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_ratio() {
        let obs = BiasObservation::new("e1", 8.0, 10.0);
        assert!((obs.ratio() - 1.25).abs() < 1e-12);
        assert!(obs.triad().is_none());
        assert!(obs.validate().is_ok());
    }

    #[test]
    fn test_accessors() {
        let obs = BiasObservation::new("e7", 5.0, 6.5);
        assert_eq!(obs.estimator(), "e7");
        assert_eq!(obs.modal_estimate(), 5.0);
        assert_eq!(obs.actual(), 6.5);
    }

    #[test]
    fn test_with_triad() {
        let triad = ThreePointEstimate::new(6.0, 8.0, 12.0).unwrap();
        let obs = BiasObservation::new("e1", 8.0, 10.2).with_triad(triad);
        assert_eq!(obs.triad(), Some(&triad));
    }

    #[test]
    fn test_non_positive_modal_rejected() {
        let err = BiasObservation::new("e1", 0.0, 3.0).validate().unwrap_err();
        assert!(matches!(err, ForecastError::InvalidObservation(_)));

        let err = BiasObservation::new("e1", -2.0, 3.0).validate().unwrap_err();
        assert!(matches!(err, ForecastError::InvalidObservation(_)));
    }

    #[test]
    fn test_negative_actual_rejected() {
        let err = BiasObservation::new("e1", 2.0, -3.0).validate().unwrap_err();
        assert!(matches!(err, ForecastError::InvalidObservation(_)));
    }

    #[test]
    fn test_deserialize_without_triad() {
        let obs: BiasObservation =
            serde_json::from_str(r#"{"estimator":"e2","modal_estimate":4.0,"actual":3.2}"#)
                .unwrap();
        assert!(obs.triad().is_none());
    }
}
