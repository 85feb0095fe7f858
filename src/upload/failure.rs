//! Upload failure taxonomy and the per-run outcome.

use std::path::PathBuf;

/// Why a single upload attempt failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UploadFailure {
    /// Credentials were rejected (401/403).
    #[error("authentication rejected (HTTP {status}): {body}")]
    Authentication {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The bundle or request was rejected (4xx other than auth and 429).
    #[error("bundle rejected (HTTP {status}): {body}")]
    Validation {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Too many requests (429).
    #[error("rate limited (HTTP {status}): {body}")]
    RateLimited {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Server-side failure (5xx).
    #[error("server error (HTTP {status}): {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Connection, TLS or timeout failure before a response arrived.
    #[error("transport error: {reason}")]
    Transport {
        /// Description of the failure.
        reason: String,
    },

    /// The archive to upload could not be read.
    #[error("cannot read bundle archive {}: {reason}", path.display())]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Description of the I/O failure.
        reason: String,
    },
}

impl UploadFailure {
    /// Classifies a non-2xx response.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Authentication { status, body },
            429 => Self::RateLimited { status, body },
            400..=499 => Self::Validation { status, body },
            _ => Self::Server { status, body },
        }
    }

    /// Builds a transport failure from a client error.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        Self::Transport { reason }
    }

    /// Whether another attempt could change the result.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Server { .. } | Self::RateLimited { .. } | Self::Transport { .. }
        )
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::Validation { status, .. }
            | Self::RateLimited { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Archive { .. } => None,
        }
    }

    /// Response body, when a response was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Authentication { body, .. }
            | Self::Validation { body, .. }
            | Self::RateLimited { body, .. }
            | Self::Server { body, .. } => Some(body),
            Self::Transport { .. } | Self::Archive { .. } => None,
        }
    }
}

/// Terminal upload failure: the last attempt's failure plus how many
/// attempts were made.
#[derive(Debug, Clone, thiserror::Error)]
#[error("upload failed after {attempts} attempt(s): {failure}")]
pub struct UploadError {
    /// Attempts made, including the failing one.
    pub attempts: u32,
    /// Failure of the last attempt.
    #[source]
    pub failure: UploadFailure,
}

impl UploadError {
    /// Outcome record for this failure.
    pub fn outcome(&self) -> UploadOutcome {
        UploadOutcome {
            attempts: self.attempts,
            status: self.failure.status(),
            error: Some(self.failure.to_string()),
            succeeded: false,
            body: self.failure.body().map(str::to_string),
        }
    }
}

/// Result of one upload run. Reported, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UploadOutcome {
    /// Attempts made.
    pub attempts: u32,
    /// HTTP status of the last response, if any.
    pub status: Option<u16>,
    /// Description of the last failure, if the run failed.
    pub error: Option<String>,
    /// Whether the remote API accepted the bundle.
    pub succeeded: bool,
    /// Response body of the last response, kept for diagnostics.
    pub body: Option<String>,
}

impl UploadOutcome {
    pub(crate) fn success(attempts: u32, status: u16, body: String) -> Self {
        Self {
            attempts,
            status: Some(status),
            error: None,
            succeeded: true,
            body: Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            UploadFailure::from_status(403, String::new()),
            UploadFailure::Authentication { status: 403, .. }
        ));
        assert!(matches!(
            UploadFailure::from_status(422, String::new()),
            UploadFailure::Validation { status: 422, .. }
        ));
        assert!(matches!(
            UploadFailure::from_status(502, String::new()),
            UploadFailure::Server { status: 502, .. }
        ));
    }

    #[test]
    fn error_outcome_keeps_status_and_body() {
        let err = UploadError {
            attempts: 5,
            failure: UploadFailure::from_status(503, "maintenance".into()),
        };
        let outcome = err.outcome();
        assert!(!outcome.succeeded);
        assert_eq!(outcome.attempts, 5);
        assert_eq!(outcome.status, Some(503));
        assert_eq!(outcome.body.as_deref(), Some("maintenance"));
    }
}
