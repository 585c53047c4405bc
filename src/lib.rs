//! Capacity Forecast - bias-calibrated delivery capacity forecasting
//!
//! This crate turns historical estimate-vs-actual data and three-point
//! estimates into team commit levels:
//! - Per-estimator bias (α) fitted from actual/estimate ratios
//! - A global uncertainty factor (δ_b) fitted against a target coverage
//! - Calibrated PERT distributions for any new triad
//! - Correlation-aware, multi-day aggregation of engineer capacity into
//!   commit levels and probabilities of meeting a workload
//!
//! # Modules
//!
//! - [`estimate`] - Three-point estimates and bias observations
//! - [`distribution`] - Calibrated PERT distributions and normal helpers
//! - [`calibration`] - Bias and uncertainty fitting
//! - [`capacity`] - Daily inputs and the commit capacity engine
//! - [`cli`] - Reporting harness
//!
//! # Example
//!
//! ```
//! use capacity_forecast::prelude::*;
//!
//! let observations = vec![
//!     BiasObservation::new("e1", 8.0, 10.0)
//!         .with_triad(ThreePointEstimate::new(6.0, 8.0, 12.0).unwrap()),
//!     BiasObservation::new("e1", 4.0, 4.6)
//!         .with_triad(ThreePointEstimate::new(3.0, 4.0, 6.0).unwrap()),
//! ];
//!
//! let calibrator = default_calibrator(4.0).unwrap();
//! let bias = calibrator.fit_bias(&observations).unwrap();
//! let delta_b = calibrator.fit_delta_b(&observations, &bias, 0.9).unwrap();
//!
//! let triad = ThreePointEstimate::new(5.0, 8.0, 14.0).unwrap();
//! let dist = calibrator.build_distribution(&triad, "e1", &bias, delta_b).unwrap();
//! assert!(dist.mean() > 8.5);
//! ```

// Core error handling
pub mod error;

// Forecasting core
pub mod estimate;
pub mod distribution;
pub mod calibration;
pub mod capacity;

// Harness
pub mod cli;

pub use error::{ForecastError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{ForecastError, Result};

    // Entities
    pub use crate::estimate::{BiasObservation, ThreePointEstimate};

    // Distributions
    pub use crate::distribution::{PertDistribution, DEFAULT_SHAPE};

    // Calibration
    pub use crate::calibration::{default_calibrator, BiasModel, Calibrator, CalibratorConfig};

    // Capacity
    pub use crate::capacity::{CommitCapacityEngine, DailyInputs, EngineerPair, ScheduleMoments};
}
