//! Error types for trust index operations.
//!
//! Audit and scoring never fail on bad data: degraded inputs surface as
//! zero scores or `error` markers inside reports. The errors here cover the
//! edges of the system (loading datasets, configuration, persistence).

use thiserror::Error;

use crate::config::ConfigValidationError;
use crate::validation::ValidationError;

/// Main error type for trust index operations.
#[derive(Debug, Error)]
pub enum TrustIndexError {
    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Scoring configuration failed validation
    #[error("Invalid scoring configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// A dataset could not be loaded from its source
    #[error("Dataset load failed for source '{source_name}': {context}")]
    DatasetLoad {
        source_name: String,
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Report failed its output contract
    #[error("Report validation failed: {0}")]
    ReportValidation(#[from] ValidationError),

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with TrustIndexError
pub type Result<T> = std::result::Result<T, TrustIndexError>;

impl TrustIndexError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a dataset load error with context
    pub fn dataset_load<E>(source_name: impl Into<String>, context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DatasetLoad {
            source_name: source_name.into(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, error: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_message() {
        let err = TrustIndexError::configuration("weights must sum to 1.0");
        assert_eq!(
            err.to_string(),
            "Configuration error: weights must sum to 1.0"
        );
    }

    #[test]
    fn test_dataset_load_keeps_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err = TrustIndexError::dataset_load("fca", "reading dataset file", io);

        assert!(err.to_string().contains("'fca'"));
        assert!(err.to_string().contains("reading dataset file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_validation_converts() {
        let err: TrustIndexError = ConfigValidationError::WeightsDoNotSumToOne {
            group: "audit".to_string(),
            sum: 0.9,
        }
        .into();
        assert!(matches!(err, TrustIndexError::InvalidConfig(_)));
    }
}
