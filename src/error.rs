//! Error types for the command line tool.
//!
//! Each layer has its own error type; this module wraps them into one
//! [`PublisherError`] with actionable recovery suggestions.

use thiserror::Error;

use crate::config::ConfigError;
use crate::upload::{UploadError, UploadFailure};

/// Result type alias for publisher operations
pub type Result<T> = std::result::Result<T, PublisherError>;

/// Main error type for all publisher operations
#[derive(Error, Debug)]
pub enum PublisherError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bundle assembly errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Terminal upload failure
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// HTTP client setup errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl PublisherError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PublisherError::Config(ConfigError::MissingCredentials { path }) => vec![
                "Pass --username/--password or --token".to_string(),
                "Or set CENTRAL_PORTAL_USERNAME and CENTRAL_PORTAL_PASSWORD".to_string(),
                format!("Or add credentials to {}", path.display()),
            ],
            PublisherError::Config(ConfigError::MissingField { field }) => vec![format!(
                "Set {field} in the project file or pass it on the command line"
            )],
            PublisherError::Bundler(e) if e.is_collision() => vec![
                "Two build outputs map to the same published file name".to_string(),
                "Remove the stale output or pass --collision-policy warn to keep the later one"
                    .to_string(),
            ],
            PublisherError::Upload(e) => match &e.failure {
                UploadFailure::Authentication { .. } => {
                    vec!["Check the portal user token and its password".to_string()]
                }
                UploadFailure::Validation { .. } => vec![
                    "The portal rejected the bundle; see the response body above".to_string(),
                    "Run the bundle command and inspect the archive entries".to_string(),
                ],
                UploadFailure::Archive { path, .. } => {
                    vec![format!("Make sure {} is readable", path.display())]
                }
                _ => vec!["The portal may be unavailable; retry later".to_string()],
            },
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable by retrying the same command
    pub fn is_recoverable(&self) -> bool {
        match self {
            PublisherError::Upload(e) => e.failure.is_retryable(),
            PublisherError::Http(_) | PublisherError::Io(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_credentials_suggest_sources() {
        let err = PublisherError::from(ConfigError::MissingCredentials {
            path: PathBuf::from("local.toml"),
        });
        let suggestions = err.recovery_suggestions();
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions[2].contains("local.toml"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn server_failures_are_recoverable() {
        let err = PublisherError::from(UploadError {
            attempts: 5,
            failure: UploadFailure::Server {
                status: 503,
                body: String::new(),
            },
        });
        assert!(err.is_recoverable());
    }
}
