//! Estimate and observation value types
//!
//! Immutable inputs to calibration:
//! - Three-point (optimistic / most likely / pessimistic) estimates
//! - Historical estimate-vs-actual bias observations

mod triad;
mod observation;

pub use triad::ThreePointEstimate;
pub use observation::BiasObservation;
