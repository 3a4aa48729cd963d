//! Estimator errors.

use tessel_core::OperatorKind;
use thiserror::Error;

/// Errors raised by the estimators.
#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("activity factor must be in [0, 1], got {activity}")]
    ActivityOutOfRange { activity: f64 },

    #[error("target frequency must be positive, got {frequency} GHz")]
    InvalidFrequency { frequency: f64 },

    #[error("operator {operator} is not present in the operator catalog")]
    UnknownOperator { operator: OperatorKind },
}

/// Result type for estimator operations.
pub type Result<T> = std::result::Result<T, EstimateError>;
