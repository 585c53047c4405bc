//! Per-estimator bias model

use crate::error::{ForecastError, Result};
use crate::estimate::BiasObservation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Neutral bias for estimators with no history
pub const NEUTRAL_ALPHA: f64 = 1.0;

/// Immutable mapping from estimator identifier to bias multiplier α
///
/// Lookups for unseen estimators return [`NEUTRAL_ALPHA`]; missing history
/// is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct BiasModel {
    alphas: BTreeMap<String, f64>,
}

impl BiasModel {
    /// Model with no known estimators
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Build a model from explicit multipliers, rejecting α <= 0
    pub fn from_alphas<I, K>(alphas: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (id, alpha) in alphas {
            let id = id.into();
            if !alpha.is_finite() || alpha <= 0.0 {
                return Err(ForecastError::invalid_parameter(
                    &format!("alpha[{}]", id),
                    alpha,
                    "bias must be positive",
                ));
            }
            map.insert(id, alpha);
        }
        Ok(Self { alphas: map })
    }

    /// Bias multiplier for `estimator`, 1.0 when unseen
    pub fn alpha_for(&self, estimator: &str) -> f64 {
        self.alphas.get(estimator).copied().unwrap_or(NEUTRAL_ALPHA)
    }

    pub fn contains(&self, estimator: &str) -> bool {
        self.alphas.contains_key(estimator)
    }

    pub fn len(&self) -> usize {
        self.alphas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }

    /// Fitted multipliers in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.alphas.iter().map(|(id, &alpha)| (id.as_str(), alpha))
    }
}

impl TryFrom<BTreeMap<String, f64>> for BiasModel {
    type Error = ForecastError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self> {
        Self::from_alphas(map)
    }
}

impl From<BiasModel> for BTreeMap<String, f64> {
    fn from(model: BiasModel) -> Self {
        model.alphas
    }
}

/// Fit α per estimator as the arithmetic mean of `actual / modal_estimate`
pub(crate) fn fit(observations: &[BiasObservation]) -> Result<BiasModel> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for obs in observations {
        obs.validate()?;
        let entry = groups.entry(obs.estimator()).or_insert((0.0, 0));
        entry.0 += obs.ratio();
        entry.1 += 1;
    }

    let mut alphas = BTreeMap::new();
    for (id, (sum, count)) in groups {
        let alpha = sum / count as f64;
        if alpha <= 0.0 {
            return Err(ForecastError::InvalidObservation(format!(
                "estimator '{}': every actual is zero, bias would not be positive",
                id
            )));
        }
        tracing::debug!(estimator = id, alpha, observations = count, "fitted bias");
        alphas.insert(id.to_string(), alpha);
    }

    Ok(BiasModel { alphas })
}
