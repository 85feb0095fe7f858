//! Error types for bundle assembly.
//!
//! Every failure raised while discovering, staging or packaging artifacts is
//! an [`Error`]. Filesystem failures carry the operation and path they belong
//! to via [`ErrorExt::fs_context`].

use std::path::{Path, PathBuf};

/// Result alias for bundle assembly.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling a bundle.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Plain I/O failure without further context.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Filesystem failure with the operation and path involved.
    #[error("{context} {}: {source}", path.display())]
    Fs {
        /// What was being done.
        context: &'static str,
        /// Path the operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Two different source files map onto the same canonical name.
    ///
    /// This indicates misconfigured sources, not a transient condition.
    #[error(
        "canonical name collision for '{name}': {} ({first_role}) and {} ({second_role})",
        first.display(),
        second.display()
    )]
    NameCollision {
        /// Canonical name both files resolve to.
        name: String,
        /// File staged first.
        first: PathBuf,
        /// Role of the first file.
        first_role: String,
        /// File that tried to replace it.
        second: PathBuf,
        /// Role of the second file.
        second_role: String,
    },

    /// Archive writer failure.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal failure.
    #[error("directory walk failed: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Whether this error is a canonical-name collision.
    pub fn is_collision(&self) -> bool {
        matches!(self, Error::NameCollision { .. })
    }
}

/// Attaches filesystem context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps the error with the operation and the path it concerned.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
