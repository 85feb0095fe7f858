//! Configuration errors.
//!
//! All of these are raised before any artifact is touched or any request is
//! sent.

use std::path::PathBuf;

/// Errors raised while building [`Settings`](super::Settings) or resolving
/// [`Credentials`](super::Credentials).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required identifier was not supplied.
    #[error("missing required configuration value: {field}")]
    MissingField {
        /// Name of the missing option.
        field: &'static str,
    },

    /// A value was supplied but cannot be used.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the offending option.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Neither a username/password pair nor a token was found.
    #[error(
        "no upload credentials found: set CENTRAL_PORTAL_USERNAME and CENTRAL_PORTAL_PASSWORD, \
         CENTRAL_PORTAL_TOKEN, or provide them in {}",
        path.display()
    )]
    MissingCredentials {
        /// Local credentials file that was consulted.
        path: PathBuf,
    },

    /// A configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for its schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },
}
