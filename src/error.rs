//! Custom error types for SpreadSaver
//!
//! This module defines the error hierarchy for the engine using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for SpreadSaver operations
#[derive(Error, Debug)]
pub enum SpreadError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for input data
    #[error("Validation error: {0}")]
    Validation(String),

    /// An argument outside the accepted domain (e.g. a zero smoothing window)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A value could not be coerced while running in strict mode
    #[error("Cannot coerce {field} from '{value}'")]
    Coercion { field: &'static str, value: String },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl SpreadError {
    /// Create a coercion error for an amount field
    pub fn bad_amount(value: impl Into<String>) -> Self {
        Self::Coercion {
            field: "amount",
            value: value.into(),
        }
    }

    /// Create a coercion error for a date field
    pub fn bad_date(value: impl Into<String>) -> Self {
        Self::Coercion {
            field: "date",
            value: value.into(),
        }
    }

    /// Check if this is a coercion error
    pub fn is_coercion(&self) -> bool {
        matches!(self, Self::Coercion { .. })
    }

    /// Check if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SpreadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SpreadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for SpreadError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for SpreadError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for SpreadSaver operations
pub type SpreadResult<T> = Result<T, SpreadError>;
