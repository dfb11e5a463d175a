//! Error types for georesolve

use thiserror::Error;

/// Result type alias using GeoResolveError
pub type Result<T> = std::result::Result<T, GeoResolveError>;

/// Error type alias for convenience
pub type Error = GeoResolveError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for georesolve
#[derive(Debug, Error)]
pub enum GeoResolveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External service error: {0}")]
    ExternalError(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl GeoResolveError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => exit_codes::NOT_FOUND,
            Self::Validation(_) | Self::Config(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Whether the error came from the network rather than from the payload
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Io(_) | Self::ExternalError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            GeoResolveError::Validation("bbox".into()).exit_code(),
            exit_codes::INVALID_INPUT
        );
        assert_eq!(
            GeoResolveError::NotFound("Atlantis".into()).exit_code(),
            exit_codes::NOT_FOUND
        );
        assert_eq!(
            GeoResolveError::Llm("boom".into()).exit_code(),
            exit_codes::GENERAL_ERROR
        );
    }

    #[test]
    fn test_transport_classification() {
        assert!(GeoResolveError::ExternalError("HTTP 503".into()).is_transport());
        assert!(!GeoResolveError::SchemaViolation("missing keys".into()).is_transport());
    }
}
