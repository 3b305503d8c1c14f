//! Cost intelligence error types
//!
//! Analysis itself never fails: engines return empty result sets on
//! insufficient or malformed data. Errors only surface while building or
//! loading engine configuration.

use thiserror::Error;

/// Cost intelligence error types
#[derive(Debug, Error)]
pub enum CostIntelligenceError {
    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    /// Numeric calculation could not be performed
    #[error("Cost calculation error: {details}")]
    CalculationError { details: String },

    /// I/O error
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl CostIntelligenceError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }
}

/// Cost intelligence result type
pub type CostIntelligenceResult<T> = Result<T, CostIntelligenceError>;
