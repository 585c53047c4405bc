//! Error types for capacity forecasting

use thiserror::Error;

/// Result type alias for forecasting operations
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Main error type for calibration and capacity forecasting
///
/// An estimator with no history is never an error: it resolves to the
/// neutral bias of 1.0. Everything below is malformed input or a search that
/// could not meet its target.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Invalid triad: {0}")]
    InvalidTriad(String),

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Convergence failed: coverage {achieved:.4} at delta_b = {search_upper} below target {target:.4}")]
    ConvergenceFailure {
        search_upper: f64,
        target: f64,
        achieved: f64,
    },

    #[error("Dimension mismatch: engineer '{engineer}' missing from {mapping} mapping")]
    DimensionMismatch { engineer: String, mapping: String },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ForecastError {
    /// Shorthand for an `InvalidParameter` error
    pub(crate) fn invalid_parameter(
        name: &str,
        value: impl std::fmt::Display,
        reason: &str,
    ) -> Self {
        ForecastError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForecastError::InvalidTriad("o > p".to_string());
        assert_eq!(err.to_string(), "Invalid triad: o > p");

        let err = ForecastError::invalid_parameter("alpha", 1.5, "must lie in (0, 1)");
        assert_eq!(err.to_string(), "Invalid parameter: alpha = 1.5, must lie in (0, 1)");

        let err = ForecastError::ConvergenceFailure {
            search_upper: 10.0,
            target: 0.9,
            achieved: 0.5,
        };
        assert_eq!(
            err.to_string(),
            "Convergence failed: coverage 0.5000 at delta_b = 10 below target 0.9000"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ForecastError = io_err.into();
        assert!(matches!(err, ForecastError::IoError(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<f64>("not a number").unwrap_err();
        let err: ForecastError = json_err.into();
        assert!(matches!(err, ForecastError::SerializationError(_)));
    }
}
