//! Error types and exit codes for openqa-review
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, invalid configuration values)
//! - 3: Data error (malformed results, ambiguous or missing builds)

mod macros;

use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - malformed or ambiguous build data (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while reviewing builds
#[derive(Error, Debug)]
pub enum ReviewError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    /// Ingested build data lacks a required field or carries an unknown value
    #[error("malformed result in {source_name}: {reason}")]
    MalformedResult { source_name: String, reason: String },

    /// The previous-build lookup returned several equally valid candidates
    #[error("ambiguous previous build for {build}: candidates {}", candidates.join(", "))]
    AmbiguousPreviousBuild {
        build: String,
        candidates: Vec<String>,
    },

    #[error("build not found: {0}")]
    BuildNotFound(String),

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperation {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl ReviewError {
    /// Create an error for a build record that failed validation
    pub fn malformed(source: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        ReviewError::MalformedResult {
            source_name: source.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        ReviewError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        ReviewError::FailedOperation {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ReviewError::UnknownFormat(_)
            | ReviewError::UsageError(_)
            | ReviewError::InvalidValue { .. } => ExitCode::Usage,

            ReviewError::MalformedResult { .. }
            | ReviewError::AmbiguousPreviousBuild { .. }
            | ReviewError::BuildNotFound(_) => ExitCode::Data,

            ReviewError::Io(_)
            | ReviewError::Json(_)
            | ReviewError::Yaml(_)
            | ReviewError::Toml(_)
            | ReviewError::FailedOperation { .. }
            | ReviewError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            ReviewError::UnknownFormat(_) => "unknown_format",
            ReviewError::UsageError(_) => "usage_error",
            ReviewError::InvalidValue { .. } => "invalid_value",
            ReviewError::MalformedResult { .. } => "malformed_result",
            ReviewError::AmbiguousPreviousBuild { .. } => "ambiguous_previous_build",
            ReviewError::BuildNotFound(_) => "build_not_found",
            ReviewError::Io(_) => "io_error",
            ReviewError::Json(_) => "json_error",
            ReviewError::Yaml(_) => "yaml_error",
            ReviewError::Toml(_) => "toml_error",
            ReviewError::FailedOperation { .. } => "failed_operation",
            ReviewError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for review operations
pub type Result<T> = std::result::Result<T, ReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            ReviewError::malformed("b.json", "missing name").exit_code(),
            ExitCode::Data
        );
        assert_eq!(
            ReviewError::AmbiguousPreviousBuild {
                build: "100".into(),
                candidates: vec!["99".into(), "99".into()],
            }
            .exit_code(),
            ExitCode::Data
        );
        assert_eq!(
            ReviewError::UsageError("x".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(ReviewError::Other("x".into()).exit_code(), ExitCode::Failure);
    }

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let err = ReviewError::AmbiguousPreviousBuild {
            build: "100".into(),
            candidates: vec!["99@x86_64".into(), "99@x86_64".into()],
        };
        assert_eq!(
            err.to_string(),
            "ambiguous previous build for 100: candidates 99@x86_64, 99@x86_64"
        );
    }

    #[test]
    fn test_to_json_shape() {
        let json = ReviewError::malformed("b.json", "missing outcome").to_json();
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["type"], "malformed_result");
        assert_eq!(
            json["error"]["message"],
            "malformed result in b.json: missing outcome"
        );
    }
}
