//! Upload credentials.
//!
//! Credentials never come from the versioned project file. They are taken
//! from the command line / environment, or from a local, non-versioned TOML
//! file such as:
//!
//! ```toml
//! username = "portal-user-token-name"
//! password = "portal-user-token-secret"
//! ```

use super::ConfigError;
use base64::Engine;
use std::path::Path;

/// Default name of the local credentials file.
pub const DEFAULT_CREDENTIALS_FILE: &str = "local.toml";

/// Credentials sent in the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username/password pair sent as a basic-auth token.
    Basic {
        /// Portal user token name.
        username: String,
        /// Portal user token secret.
        password: String,
    },
    /// Pre-built bearer token.
    Bearer {
        /// Token value.
        token: String,
    },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// On-disk shape of the local credentials file.
#[derive(Debug, Default, serde::Deserialize)]
struct LocalCredentials {
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
}

impl Credentials {
    /// Value of the `Authorization` header.
    ///
    /// ```
    /// use central_portal_bundler::config::Credentials;
    ///
    /// let creds = Credentials::Basic {
    ///     username: "user".into(),
    ///     password: "pass".into(),
    /// };
    /// assert_eq!(creds.authorization_header(), "Basic dXNlcjpwYXNz");
    /// ```
    pub fn authorization_header(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                let raw = format!("{username}:{password}");
                format!(
                    "Basic {}",
                    base64::engine::general_purpose::STANDARD.encode(raw)
                )
            }
            Self::Bearer { token } => format!("Bearer {token}"),
        }
    }

    /// Resolves credentials, explicit values first and the local file second.
    ///
    /// A complete username/password pair wins over a token; a lone username
    /// or password is ignored. The local file is only read when the explicit
    /// values are incomplete, and a missing file is not an error.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingCredentials`] when nothing usable is found, and
    /// read/parse errors for an unreadable local file.
    pub fn resolve(
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
        local_file: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(creds) = Self::from_parts(username, password, token) {
            return creds.validated();
        }

        let local = if local_file.is_file() {
            let text = std::fs::read_to_string(local_file).map_err(|source| ConfigError::Read {
                path: local_file.to_path_buf(),
                source,
            })?;
            toml::from_str::<LocalCredentials>(&text).map_err(|source| ConfigError::Parse {
                path: local_file.to_path_buf(),
                source,
            })?
        } else {
            log::debug!("No local credentials file at {}", local_file.display());
            LocalCredentials::default()
        };

        Self::from_parts(local.username, local.password, local.token)
            .ok_or_else(|| ConfigError::MissingCredentials {
                path: local_file.to_path_buf(),
            })?
            .validated()
    }

    /// Rejects credentials that cannot be sent as an `Authorization` header,
    /// such as a token copied with a trailing newline.
    fn validated(self) -> Result<Self, ConfigError> {
        match reqwest::header::HeaderValue::from_str(&self.authorization_header()) {
            Ok(_) => Ok(self),
            Err(_) => Err(ConfigError::InvalidValue {
                field: "credentials",
                reason: "the token contains characters not allowed in an HTTP header".to_string(),
            }),
        }
    }

    fn from_parts(
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
    ) -> Option<Self> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (non_blank(username), non_blank(password), non_blank(token)) {
            (Some(username), Some(password), _) => Some(Self::Basic { username, password }),
            (_, _, Some(token)) => Some(Self::Bearer { token }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header() {
        let creds = Credentials::Bearer {
            token: "abc123".into(),
        };
        assert_eq!(creds.authorization_header(), "Bearer abc123");
    }

    #[test]
    fn explicit_pair_skips_the_local_file() {
        let creds = Credentials::resolve(
            Some("u".into()),
            Some("p".into()),
            None,
            Path::new("/nonexistent/local.toml"),
        )
        .unwrap();
        assert_eq!(
            creds,
            Credentials::Basic {
                username: "u".into(),
                password: "p".into()
            }
        );
    }

    #[test]
    fn falls_back_to_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.toml");
        std::fs::write(&path, "username = \"alice\"\npassword = \"s3cret\"\n").unwrap();

        let creds = Credentials::resolve(Some("ignored".into()), None, None, &path).unwrap();
        assert_eq!(
            creds,
            Credentials::Basic {
                username: "alice".into(),
                password: "s3cret".into()
            }
        );
    }

    #[test]
    fn nothing_found_is_missing_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let err = Credentials::resolve(None, None, None, &dir.path().join("local.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials { .. }));
    }

    #[test]
    fn token_with_control_characters_is_rejected() {
        let err = Credentials::resolve(
            None,
            None,
            Some("abc\ndef".into()),
            Path::new("/nonexistent/local.toml"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "credentials",
                ..
            }
        ));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let creds = Credentials::Basic {
            username: "alice".into(),
            password: "s3cret".into(),
        };
        let printed = format!("{creds:?}");
        assert!(printed.contains("alice"));
        assert!(!printed.contains("s3cret"));
    }
}
