//! Error types for the CAM tools crate.
//!
//! This module provides structured error types for path measurement,
//! perforation and filter pipeline construction. None of these escape the
//! public filter contract; they drive the per-polyline fallback and the
//! diagnostics logged alongside it.

use thiserror::Error;

/// Errors that can occur while measuring or sampling a polyline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The polyline has a NaN or infinite coordinate.
    #[error("Non-finite coordinate at point {index}")]
    NonFiniteCoordinate { index: usize },

    /// A requested distance is NaN or infinite.
    #[error("Non-finite distance: {0}")]
    NonFiniteDistance(f64),

    /// The polyline has no points to sample from.
    #[error("Cannot sample an empty polyline")]
    EmptyPath,

    /// The measuring backend produced an inconsistent result.
    #[error("Inconsistent measurement: {0}")]
    Inconsistent(String),
}

/// Errors that can occur while perforating a single polyline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerforationError {
    /// The perforation parameters cannot drive the segmenter.
    #[error("Invalid perforation parameters: {0}")]
    InvalidConfig(#[from] ParameterError),

    /// The cut/bridge pattern would need more phases than allowed.
    #[error("Perforation pattern exceeds {limit} phases for a path of length {length}")]
    TooManyPhases { limit: usize, length: f64 },

    /// Measuring the source polyline failed.
    #[error("Measurement failed: {0}")]
    Measure(#[from] MeasureError),
}

/// Errors related to CAM tool parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Parameters are mutually incompatible.
    #[error("Incompatible parameters: {0}")]
    Incompatible(String),
}

/// Errors that can occur during CAM tool operations.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// No filter is registered under the requested name.
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// A perforation error occurred.
    #[error("Perforation error: {0}")]
    Perforation(#[from] PerforationError),
}

/// Result type alias for measurement operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Result type alias for perforation of one polyline.
pub type PerforationResult<T> = Result<T, PerforationError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_error_display() {
        let err = MeasureError::NonFiniteCoordinate { index: 3 };
        assert_eq!(err.to_string(), "Non-finite coordinate at point 3");

        let err = MeasureError::EmptyPath;
        assert_eq!(err.to_string(), "Cannot sample an empty polyline");
    }

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::InvalidValue {
            name: "cut_length".to_string(),
            reason: "must be finite".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for 'cut_length': must be finite"
        );
    }

    #[test]
    fn test_perforation_error_display() {
        let err = PerforationError::TooManyPhases {
            limit: 10,
            length: 2.5,
        };
        assert_eq!(
            err.to_string(),
            "Perforation pattern exceeds 10 phases for a path of length 2.5"
        );
    }

    #[test]
    fn test_error_conversion() {
        let measure_err = MeasureError::EmptyPath;
        let perf_err: PerforationError = measure_err.into();
        assert!(matches!(perf_err, PerforationError::Measure(_)));

        let param_err = ParameterError::Incompatible("zero period".to_string());
        let perf_err: PerforationError = param_err.clone().into();
        assert!(matches!(perf_err, PerforationError::InvalidConfig(_)));

        let cam_err: CamToolError = param_err.into();
        assert!(matches!(cam_err, CamToolError::Parameter(_)));

        let cam_err: CamToolError = perf_err.into();
        assert!(matches!(cam_err, CamToolError::Perforation(_)));
    }
}
