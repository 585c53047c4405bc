//! Three-point estimate

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Three-point estimate (o, m, p)
///
/// Always satisfies `0 <= o <= m <= p` with finite fields; construction
/// rejects anything else instead of clamping it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTriad")]
pub struct ThreePointEstimate {
    optimistic: f64,
    most_likely: f64,
    pessimistic: f64,
}

#[derive(Deserialize)]
struct RawTriad {
    optimistic: f64,
    most_likely: f64,
    pessimistic: f64,
}

impl TryFrom<RawTriad> for ThreePointEstimate {
    type Error = ForecastError;

    fn try_from(raw: RawTriad) -> Result<Self> {
        Self::new(raw.optimistic, raw.most_likely, raw.pessimistic)
    }
}

impl ThreePointEstimate {
    /// Create a validated triad
    pub fn new(optimistic: f64, most_likely: f64, pessimistic: f64) -> Result<Self> {
        for (name, value) in [
            ("optimistic", optimistic),
            ("most_likely", most_likely),
            ("pessimistic", pessimistic),
        ] {
            if !value.is_finite() {
                return Err(ForecastError::InvalidTriad(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
            if value < 0.0 {
                return Err(ForecastError::InvalidTriad(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        if optimistic > most_likely || most_likely > pessimistic {
            return Err(ForecastError::InvalidTriad(format!(
                "expected optimistic <= most_likely <= pessimistic, got ({}, {}, {})",
                optimistic, most_likely, pessimistic
            )));
        }

        Ok(Self {
            optimistic,
            most_likely,
            pessimistic,
        })
    }

    pub fn optimistic(&self) -> f64 {
        self.optimistic
    }

    pub fn most_likely(&self) -> f64 {
        self.most_likely
    }

    pub fn pessimistic(&self) -> f64 {
        self.pessimistic
    }

    /// Width of the support, `p - o`
    pub fn range(&self) -> f64 {
        self.pessimistic - self.optimistic
    }

    /// True when all three points coincide
    pub fn is_degenerate(&self) -> bool {
        self.range() == 0.0
    }
}
