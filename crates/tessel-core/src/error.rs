//! Error types for configuration, synthesis, and design access.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::OperatorKind;

/// Errors raised while loading or validating a configuration.
///
/// Every validation failure names the field, the offending value, and what
/// would have been accepted.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file not found.
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A field holds a value outside its enumerated set.
    #[error("invalid {field}: '{value}'. Must be one of {allowed}")]
    InvalidValue {
        /// Dotted field path (e.g. `interconnect.topology`).
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Human-readable list of accepted values.
        allowed: String,
    },

    /// A numeric field lies outside its permitted range.
    #[error("invalid {field}: {value}. Must be in {range}")]
    OutOfRange {
        /// Dotted field path (e.g. `timing.target_frequency`).
        field: &'static str,
        /// The rejected value, rendered as text.
        value: String,
        /// Human-readable description of the permitted range.
        range: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<String>, allowed: &[&str]) -> Self {
        ConfigError::InvalidValue {
            field,
            value: value.into(),
            allowed: format!("[{}]", allowed.join(", ")),
        }
    }

    pub(crate) fn out_of_range(
        field: &'static str,
        value: impl ToString,
        range: impl Into<String>,
    ) -> Self {
        ConfigError::OutOfRange {
            field,
            value: value.to_string(),
            range: range.into(),
        }
    }
}

/// Errors raised by the synthesis pipeline.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("configuration error: parallelism must be at least 1, got {parallelism}")]
    NoExecutionUnits { parallelism: u32 },

    #[error("operator {operator} is not present in the operator catalog")]
    UnknownOperator { operator: OperatorKind },

    #[error("synthesis phase '{phase}' ran before its inputs were produced")]
    PhaseOrder { phase: &'static str },
}

/// A read-only consumer was invoked before synthesis produced a design.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("{consumer} requires a synthesized design; call synthesize() first")]
    NotSynthesized { consumer: &'static str },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
