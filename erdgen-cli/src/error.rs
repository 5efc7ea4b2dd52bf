//! CLI error types and result alias.

use erdgen_schema::SchemaError;
use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(erdgen::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(erdgen::config))]
    Config(String),

    /// Schema compilation error
    #[error("Schema error: {0}")]
    #[diagnostic(code(erdgen::schema))]
    Schema(String),

    /// Validation error
    #[error("Validation error: {0}")]
    #[diagnostic(code(erdgen::validation))]
    Validation(String),

    /// Command error
    #[error("Command error: {0}")]
    #[diagnostic(code(erdgen::command))]
    Command(String),
}

impl From<SchemaError> for CliError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::ConfigError { .. } | SchemaError::TomlError { .. } => {
                CliError::Config(err.to_string())
            }
            SchemaError::ValidationFailed { count, .. } => {
                CliError::Validation(format!("Found {} validation errors", count))
            }
            other => CliError::Schema(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Command(format!("Failed to render JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_conversion() {
        let err: CliError =
            SchemaError::malformed_payload("validate", "{ required: true", 3, "eof").into();
        assert!(matches!(err, CliError::Schema(_)));
        assert!(err.to_string().contains("{ required: true"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = SchemaError::ConfigError {
            message: "bad".to_string(),
        }
        .into();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: CliError = SchemaError::ValidationFailed {
            count: 2,
            errors: vec![],
        }
        .into();
        assert_eq!(err.to_string(), "Validation error: Found 2 validation errors");
    }
}
