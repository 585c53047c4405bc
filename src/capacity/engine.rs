//! Commit capacity engine
//!
//! Per engineer i on a day:
//!
//! ```text
//! capacity_i = H_i · q_i · mean_i
//! var_i      = (H_i · q_i)² · variance_i
//! ```
//!
//! Day mean is Σ capacity_i; day variance is
//! Σ var_i + 2·Σ_{i<j} ρ_ij·sd_i·sd_j. Days are independent, so horizon
//! moments are plain sums.

use crate::calibration::{BiasModel, Calibrator};
use crate::capacity::DailyInputs;
use crate::distribution::normal;
use crate::error::{ForecastError, Result};
use ndarray::{s, Array1};
use serde::Serialize;
use std::ops::Range;

/// Daily capacity moments for a schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleMoments {
    /// Expected capacity per day
    pub means: Array1<f64>,
    /// Capacity variance per day
    pub variances: Array1<f64>,
}

impl ScheduleMoments {
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Summed mean and variance over `days`, clamped to the schedule
    pub fn cumulative(&self, days: Range<usize>) -> (f64, f64) {
        let end = days.end.min(self.len());
        let start = days.start.min(end);
        let mean = self.means.slice(s![start..end]).sum();
        let variance = self.variances.slice(s![start..end]).sum();
        (mean, variance.max(0.0))
    }

    /// Split into (means, variances)
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.means.to_vec(), self.variances.to_vec())
    }
}

/// Aggregates per-engineer capacity into team commit levels
///
/// Holds only the fitted calibration; schedules are passed per call and
/// never retained, so one engine can serve concurrent readers.
#[derive(Debug, Clone, Serialize)]
pub struct CommitCapacityEngine {
    calibrator: Calibrator,
    bias: BiasModel,
    delta_b: f64,
}

impl CommitCapacityEngine {
    /// Create an engine from fitted calibration
    pub fn new(calibrator: Calibrator, bias: BiasModel, delta_b: f64) -> Result<Self> {
        if !delta_b.is_finite() || delta_b < 0.0 {
            return Err(ForecastError::invalid_parameter(
                "delta_b",
                delta_b,
                "uncertainty factor must be non-negative",
            ));
        }
        Ok(Self {
            calibrator,
            bias,
            delta_b,
        })
    }

    pub fn calibrator(&self) -> &Calibrator {
        &self.calibrator
    }

    pub fn bias(&self) -> &BiasModel {
        &self.bias
    }

    pub fn delta_b(&self) -> f64 {
        self.delta_b
    }

    /// Mean and variance of team capacity for one day
    pub fn day_moments(&self, day: &DailyInputs) -> Result<(f64, f64)> {
        let mut mean = 0.0;
        let mut contributions: Vec<(&str, f64)> = Vec::with_capacity(day.len());

        for engineer in day.engineers() {
            let (Some(h), Some(q), Some(triad)) = (
                day.hours(engineer),
                day.availability(engineer),
                day.efficiency(engineer),
            ) else {
                return Err(ForecastError::DimensionMismatch {
                    engineer: engineer.to_string(),
                    mapping: "daily inputs".to_string(),
                });
            };

            let dist = self
                .calibrator
                .build_distribution(triad, engineer, &self.bias, self.delta_b)?;
            let effective_hours = h * q;
            mean += effective_hours * dist.mean();
            contributions.push((engineer, effective_hours * effective_hours * dist.variance()));
        }

        let mut variance: f64 = contributions.iter().map(|&(_, v)| v).sum();
        for (i, &(a, var_a)) in contributions.iter().enumerate() {
            for &(b, var_b) in &contributions[i + 1..] {
                let rho = day.correlation(a, b);
                if rho != 0.0 {
                    variance += 2.0 * rho * var_a.max(0.0).sqrt() * var_b.max(0.0).sqrt();
                }
            }
        }

        Ok((mean, variance.max(0.0)))
    }

    /// Per-day capacity moments, each day computed independently
    pub fn daily_schedule_moments(&self, days: &[DailyInputs]) -> Result<ScheduleMoments> {
        let mut means = Vec::with_capacity(days.len());
        let mut variances = Vec::with_capacity(days.len());

        for day in days {
            let (mean, variance) = self.day_moments(day)?;
            means.push(mean);
            variances.push(variance);
        }

        Ok(ScheduleMoments {
            means: Array1::from_vec(means),
            variances: Array1::from_vec(variances),
        })
    }

    /// Capacity committed through the first `t` days at shortfall risk `alpha`
    ///
    /// Returns μ − z(α)·σ with z(α) = Φ⁻¹(1 − α), so cumulative capacity
    /// falls below the returned level with probability α. `t` beyond the
    /// schedule covers every day; `t = 0` commits nothing.
    pub fn commit_capacity(&self, days: &[DailyInputs], t: usize, alpha: f64) -> Result<f64> {
        let z = normal::upper_quantile(alpha)?;

        let elapsed = &days[..t.min(days.len())];
        let moments = self.daily_schedule_moments(elapsed)?;
        let (mean, variance) = moments.cumulative(0..elapsed.len());

        let commit = mean - z * variance.sqrt();
        tracing::debug!(t, alpha, mean, variance, commit, "commit capacity");
        Ok(commit)
    }

    /// Probability the days after `t` deliver the remaining workload
    ///
    /// `achieved_to_date` is the capacity realized over the first `t` days.
    /// Returns exactly 1.0 once the workload is met and 0.0 when work remains
    /// but no days do.
    pub fn probability_of_success(
        &self,
        days: &[DailyInputs],
        t: usize,
        workload: f64,
        achieved_to_date: f64,
    ) -> Result<f64> {
        if !workload.is_finite() || workload < 0.0 {
            return Err(ForecastError::invalid_parameter(
                "workload",
                workload,
                "must be non-negative",
            ));
        }
        if !achieved_to_date.is_finite() || achieved_to_date < 0.0 {
            return Err(ForecastError::invalid_parameter(
                "achieved_to_date",
                achieved_to_date,
                "must be non-negative",
            ));
        }

        let remaining_required = workload - achieved_to_date;
        if remaining_required <= 0.0 {
            return Ok(1.0);
        }

        let remaining = &days[t.min(days.len())..];
        if remaining.is_empty() {
            return Ok(0.0);
        }

        let moments = self.daily_schedule_moments(remaining)?;
        let (mean, variance) = moments.cumulative(0..remaining.len());
        let p = normal::probability_at_least(remaining_required, mean, variance.sqrt())?;

        tracing::debug!(
            t,
            remaining_days = remaining.len(),
            remaining_required,
            mean,
            variance,
            probability = p,
            "probability of success"
        );
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::default_calibrator;
    use crate::estimate::ThreePointEstimate;

    fn triad(o: f64, m: f64, p: f64) -> ThreePointEstimate {
        ThreePointEstimate::new(o, m, p).unwrap()
    }

    fn neutral_engine() -> CommitCapacityEngine {
        CommitCapacityEngine::new(default_calibrator(4.0).unwrap(), BiasModel::neutral(), 0.0)
            .unwrap()
    }

    fn day_one() -> DailyInputs {
        DailyInputs::new(
            [("e1", 6.0), ("e2", 7.5)],
            [("e1", 0.95), ("e2", 0.90)],
            [("e1", triad(0.8, 1.0, 1.3)), ("e2", triad(0.7, 0.9, 1.2))],
        )
        .unwrap()
        .with_correlation("e1", "e2", 0.25)
        .unwrap()
    }

    #[test]
    fn test_single_engineer_moments() {
        let day = DailyInputs::new([("e1", 8.0)], [("e1", 0.5)], [("e1", triad(5.0, 8.0, 14.0))])
            .unwrap();
        let (mean, variance) = neutral_engine().day_moments(&day).unwrap();
        assert!((mean - 4.0 * 8.5).abs() < 1e-12);
        assert!((variance - 16.0 * 2.75).abs() < 1e-12);
    }

    #[test]
    fn test_correlated_day_fixture() {
        let (mean, variance) = neutral_engine().day_moments(&day_one()).unwrap();
        assert!((mean - 11.9825).abs() < 1e-9);
        assert!((variance - 0.853217857142857).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_negative_correlation_clamps_to_zero() {
        let t = triad(1.0, 2.0, 3.0);
        let day = DailyInputs::new(
            [("a", 4.0), ("b", 4.0)],
            [("a", 1.0), ("b", 1.0)],
            [("a", t), ("b", t)],
        )
        .unwrap()
        .with_correlation("a", "b", -1.0)
        .unwrap();
        let (_, variance) = neutral_engine().day_moments(&day).unwrap();
        assert!(variance >= 0.0);
        assert!(variance < 1e-12);
    }

    #[test]
    fn test_empty_day() {
        let day = DailyInputs::new(
            Vec::<(String, f64)>::new(),
            Vec::<(String, f64)>::new(),
            Vec::<(String, ThreePointEstimate)>::new(),
        )
        .unwrap();
        assert_eq!(neutral_engine().day_moments(&day).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn test_commit_zero_horizon() {
        let engine = neutral_engine();
        let days = vec![day_one()];
        assert_eq!(engine.commit_capacity(&days, 0, 0.1).unwrap(), 0.0);
    }

    #[test]
    fn test_commit_rejects_alpha_bounds() {
        let engine = neutral_engine();
        let days = vec![day_one()];
        for alpha in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(matches!(
                engine.commit_capacity(&days, 1, alpha),
                Err(ForecastError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_commit_one_day() {
        let engine = neutral_engine();
        let days = vec![day_one()];
        let commit = engine.commit_capacity(&days, 1, 0.1).unwrap();
        assert!((commit - 10.798733477783568).abs() < 1e-6);
    }

    #[test]
    fn test_success_already_met() {
        let engine = neutral_engine();
        let days = vec![day_one()];
        assert_eq!(engine.probability_of_success(&days, 0, 10.0, 12.0).unwrap(), 1.0);
        assert_eq!(engine.probability_of_success(&days, 5, 10.0, 10.0).unwrap(), 1.0);
    }

    #[test]
    fn test_success_no_days_left() {
        let engine = neutral_engine();
        let days = vec![day_one()];
        assert_eq!(engine.probability_of_success(&days, 1, 20.0, 5.0).unwrap(), 0.0);
        assert_eq!(engine.probability_of_success(&days, 9, 20.0, 5.0).unwrap(), 0.0);
    }

    #[test]
    fn test_success_at_mean_is_half() {
        let engine = neutral_engine();
        let days = vec![day_one()];
        let p = engine.probability_of_success(&days, 0, 11.9825, 0.0).unwrap();
        assert!((p - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_success_rejects_negative_workload() {
        let engine = neutral_engine();
        assert!(engine.probability_of_success(&[], 0, -1.0, 0.0).is_err());
    }

    #[test]
    fn test_engine_rejects_negative_delta_b() {
        let result =
            CommitCapacityEngine::new(default_calibrator(4.0).unwrap(), BiasModel::neutral(), -0.1);
        assert!(result.is_err());
    }

    #[test]
    fn test_cumulative_clamps_range() {
        let moments = ScheduleMoments {
            means: Array1::from_vec(vec![1.0, 2.0]),
            variances: Array1::from_vec(vec![0.5, 0.25]),
        };
        assert_eq!(moments.cumulative(0..5), (3.0, 0.75));
        assert_eq!(moments.cumulative(3..5), (0.0, 0.0));
        assert_eq!(moments.cumulative(1..2), (2.0, 0.25));
    }
}
