//! Per-day scheduling inputs

use crate::error::{ForecastError, Result};
use crate::estimate::ThreePointEstimate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Unordered pair of engineer identifiers, stored sorted
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EngineerPair {
    first: String,
    second: String,
}

impl EngineerPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Correlation entry as it appears in scenario files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub a: String,
    pub b: String,
    pub rho: f64,
}

#[derive(Deserialize)]
struct RawDailyInputs {
    hours: BTreeMap<String, f64>,
    availability: BTreeMap<String, f64>,
    efficiency: BTreeMap<String, ThreePointEstimate>,
    #[serde(default)]
    correlations: Vec<CorrelationEntry>,
}

/// Inputs for one scheduling day
///
/// Every engineer appears in all three of the hours (H), availability (q) and
/// efficiency-triad mappings. Pair correlations default to 0 when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDailyInputs", into = "SerializedDailyInputs")]
pub struct DailyInputs {
    hours: BTreeMap<String, f64>,
    availability: BTreeMap<String, f64>,
    efficiency: BTreeMap<String, ThreePointEstimate>,
    correlations: BTreeMap<EngineerPair, f64>,
}

#[derive(Serialize)]
struct SerializedDailyInputs {
    hours: BTreeMap<String, f64>,
    availability: BTreeMap<String, f64>,
    efficiency: BTreeMap<String, ThreePointEstimate>,
    correlations: Vec<CorrelationEntry>,
}

impl From<DailyInputs> for SerializedDailyInputs {
    fn from(day: DailyInputs) -> Self {
        let correlations = day
            .correlations
            .into_iter()
            .map(|(pair, rho)| CorrelationEntry {
                a: pair.first,
                b: pair.second,
                rho,
            })
            .collect();
        Self {
            hours: day.hours,
            availability: day.availability,
            efficiency: day.efficiency,
            correlations,
        }
    }
}

impl TryFrom<RawDailyInputs> for DailyInputs {
    type Error = ForecastError;

    fn try_from(raw: RawDailyInputs) -> Result<Self> {
        let mut day = Self::new(raw.hours, raw.availability, raw.efficiency)?;
        for entry in raw.correlations {
            day = day.with_correlation(entry.a, entry.b, entry.rho)?;
        }
        Ok(day)
    }
}

impl DailyInputs {
    /// Create validated inputs for one day
    ///
    /// Fails with `DimensionMismatch` when an engineer is missing from any
    /// mapping, and `InvalidParameter` for negative hours or availability
    /// outside [0, 1].
    pub fn new<K>(
        hours: impl IntoIterator<Item = (K, f64)>,
        availability: impl IntoIterator<Item = (K, f64)>,
        efficiency: impl IntoIterator<Item = (K, ThreePointEstimate)>,
    ) -> Result<Self>
    where
        K: Into<String>,
    {
        let hours: BTreeMap<String, f64> = hours.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let availability: BTreeMap<String, f64> =
            availability.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let efficiency: BTreeMap<String, ThreePointEstimate> =
            efficiency.into_iter().map(|(k, v)| (k.into(), v)).collect();

        let engineers: BTreeSet<&String> = hours
            .keys()
            .chain(availability.keys())
            .chain(efficiency.keys())
            .collect();

        for engineer in engineers {
            for (mapping, present) in [
                ("hours", hours.contains_key(engineer)),
                ("availability", availability.contains_key(engineer)),
                ("efficiency", efficiency.contains_key(engineer)),
            ] {
                if !present {
                    return Err(ForecastError::DimensionMismatch {
                        engineer: engineer.clone(),
                        mapping: mapping.to_string(),
                    });
                }
            }
        }

        for (engineer, &h) in &hours {
            if !h.is_finite() || h < 0.0 {
                return Err(ForecastError::invalid_parameter(
                    &format!("hours[{}]", engineer),
                    h,
                    "must be non-negative",
                ));
            }
        }
        for (engineer, &q) in &availability {
            if !(0.0..=1.0).contains(&q) {
                return Err(ForecastError::invalid_parameter(
                    &format!("availability[{}]", engineer),
                    q,
                    "must lie in [0, 1]",
                ));
            }
        }

        Ok(Self {
            hours,
            availability,
            efficiency,
            correlations: BTreeMap::new(),
        })
    }

    /// Set the correlation between two distinct engineers
    ///
    /// Both engineers must be scheduled on this day; an unknown identifier
    /// fails with `DimensionMismatch`.
    pub fn with_correlation(
        mut self,
        a: impl Into<String>,
        b: impl Into<String>,
        rho: f64,
    ) -> Result<Self> {
        let pair = EngineerPair::new(a, b);
        if pair.first == pair.second {
            return Err(ForecastError::invalid_parameter(
                "correlation",
                &pair.first,
                "an engineer cannot be paired with themselves",
            ));
        }
        for engineer in [&pair.first, &pair.second] {
            if !self.hours.contains_key(engineer) {
                return Err(ForecastError::DimensionMismatch {
                    engineer: engineer.clone(),
                    mapping: "correlation".to_string(),
                });
            }
        }
        if !(-1.0..=1.0).contains(&rho) {
            return Err(ForecastError::invalid_parameter(
                &format!("rho[{}, {}]", pair.first, pair.second),
                rho,
                "must lie in [-1, 1]",
            ));
        }
        self.correlations.insert(pair, rho);
        Ok(self)
    }

    /// Engineers scheduled this day, in identifier order
    pub fn engineers(&self) -> impl Iterator<Item = &str> {
        self.hours.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn hours(&self, engineer: &str) -> Option<f64> {
        self.hours.get(engineer).copied()
    }

    pub fn availability(&self, engineer: &str) -> Option<f64> {
        self.availability.get(engineer).copied()
    }

    pub fn efficiency(&self, engineer: &str) -> Option<&ThreePointEstimate> {
        self.efficiency.get(engineer)
    }

    /// Correlation for an unordered pair, 0 when not given
    pub fn correlation(&self, a: &str, b: &str) -> f64 {
        self.correlations
            .get(&EngineerPair::new(a, b))
            .copied()
            .unwrap_or(0.0)
    }
}
