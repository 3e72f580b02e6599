//! Error types for document analysis

use thiserror::Error;

use crate::generation::GenerationError;

/// Result type alias for doc-insight operations
pub type Result<T> = std::result::Result<T, Error>;

/// Document analysis errors
#[derive(Debug, Error)]
pub enum Error {
    /// Caller passed an argument outside the accepted domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// User input rejected before any work was done
    #[error("{0}")]
    Validation(String),

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the generation backend
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML config error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the error was caused by the caller's input rather than the system
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::Validation(_) | Self::UnsupportedFileType(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_is_transparent() {
        let err: Error = GenerationError::RateLimited("quota exceeded".to_string()).into();
        assert_eq!(err.to_string(), GenerationError::RateLimited("quota exceeded".to_string()).to_string());
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_user_errors() {
        assert!(Error::validation("Question is required").is_user_error());
        assert!(Error::invalid_argument("chunk size must be positive").is_user_error());
        assert!(!Error::config("bad file").is_user_error());
    }
}
