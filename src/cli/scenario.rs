//! Scenario files for the reporting harness

use crate::calibration::{BiasModel, Calibrator, CalibratorConfig};
use crate::capacity::{CommitCapacityEngine, DailyInputs};
use crate::error::Result;
use crate::estimate::{BiasObservation, ThreePointEstimate};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_target_coverage() -> f64 {
    0.9
}

/// Triad to show as a worked distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Probe {
    pub estimator: String,
    pub triad: ThreePointEstimate,
}

/// Horizons and risk levels for the commit table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitPlan {
    pub horizons: Vec<usize>,
    pub alphas: Vec<f64>,
}

/// Capacity realized after `t` elapsed days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub t: usize,
    pub achieved: f64,
}

/// Workload and checkpoints for the success table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessPlan {
    pub workload: f64,
    pub checkpoints: Vec<Checkpoint>,
}

/// Everything one forecasting run needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub calibrator: CalibratorConfig,
    #[serde(default = "default_target_coverage")]
    pub target_coverage: f64,
    pub observations: Vec<BiasObservation>,
    #[serde(default)]
    pub probe: Option<Probe>,
    #[serde(default)]
    pub days: Vec<DailyInputs>,
    #[serde(default)]
    pub commit: CommitPlan,
    #[serde(default)]
    pub success: Option<SuccessPlan>,
}

/// Calibration fitted from a scenario's history
#[derive(Debug, Clone)]
pub struct FittedScenario {
    pub calibrator: Calibrator,
    pub bias: BiasModel,
    pub delta_b: f64,
}

impl FittedScenario {
    pub fn engine(&self) -> Result<CommitCapacityEngine> {
        CommitCapacityEngine::new(self.calibrator.clone(), self.bias.clone(), self.delta_b)
    }
}

impl Scenario {
    /// Load a JSON scenario
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fit bias then δ_b from the scenario's observations
    pub fn fit(&self) -> Result<FittedScenario> {
        let calibrator = Calibrator::new(self.calibrator.clone())?;
        let bias = calibrator.fit_bias(&self.observations)?;
        let delta_b = calibrator.fit_delta_b(&self.observations, &bias, self.target_coverage)?;
        Ok(FittedScenario {
            calibrator,
            bias,
            delta_b,
        })
    }

    /// Two engineers, six historical samples and a two-day sprint
    pub fn quickstart() -> Result<Self> {
        let t = ThreePointEstimate::new;
        let observations = vec![
            BiasObservation::new("e1", 6.0, 9.0).with_triad(t(4.0, 6.0, 18.0)?),
            BiasObservation::new("e1", 8.0, 24.0).with_triad(t(6.0, 8.0, 14.0)?),
            BiasObservation::new("e2", 3.0, 2.5).with_triad(t(2.0, 3.0, 5.0)?),
            BiasObservation::new("e2", 4.0, 3.2),
            BiasObservation::new("e1", 8.0, 10.2).with_triad(t(6.0, 8.0, 12.0)?),
            BiasObservation::new("e2", 6.0, 5.1).with_triad(t(5.0, 6.0, 9.0)?),
        ];

        let days = vec![
            DailyInputs::new(
                [("e1", 6.0), ("e2", 7.5)],
                [("e1", 0.95), ("e2", 0.90)],
                [("e1", t(0.8, 1.0, 1.3)?), ("e2", t(0.7, 0.9, 1.2)?)],
            )?
            .with_correlation("e1", "e2", 0.25)?,
            DailyInputs::new(
                [("e1", 6.0), ("e2", 7.5)],
                [("e1", 0.90), ("e2", 0.85)],
                [("e1", t(0.7, 0.95, 1.25)?), ("e2", t(0.65, 0.9, 1.2)?)],
            )?,
        ];

        Ok(Self {
            calibrator: CalibratorConfig::default(),
            target_coverage: 0.9,
            observations,
            probe: Some(Probe {
                estimator: "e1".to_string(),
                triad: t(5.0, 8.0, 14.0)?,
            }),
            days,
            commit: CommitPlan {
                horizons: vec![0, 1, 2],
                alphas: vec![0.10, 0.20, 0.05],
            },
            success: Some(SuccessPlan {
                workload: 20.0,
                checkpoints: vec![
                    Checkpoint { t: 0, achieved: 0.0 },
                    Checkpoint { t: 1, achieved: 13.0 },
                ],
            }),
        })
    }
}
