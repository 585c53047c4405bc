//! Team capacity aggregation module
//!
//! Provides:
//! - Per-day scheduling inputs (hours, availability, efficiency triads,
//!   pair correlations)
//! - Correlation-aware daily capacity moments
//! - Commit levels at a shortfall risk and probability of meeting a workload

mod inputs;
mod engine;

pub use inputs::{CorrelationEntry, DailyInputs, EngineerPair};
pub use engine::{CommitCapacityEngine, ScheduleMoments};
