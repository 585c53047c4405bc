//! Calibrated effort distributions
//!
//! Provides:
//! - PERT-style Beta distributions rescaled onto a triad, with bias and
//!   uncertainty calibration applied
//! - Standard normal helpers for quantiles and tail probabilities

mod pert;
pub mod normal;

pub use pert::{PertDistribution, DEFAULT_SHAPE};
