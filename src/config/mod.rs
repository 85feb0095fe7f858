//! Run configuration.
//!
//! Settings are assembled once at process start (project file, then
//! command-line overrides) into an immutable [`Settings`] value that every
//! component borrows. Credentials are kept apart in [`Credentials`] and never
//! reach the bundle.

mod builder;
mod coordinates;
mod core;
mod credentials;
mod error;
mod file;
mod upload;

pub use builder::{
    DEFAULT_ARCHIVE_NAME, DEFAULT_BINARY_EXTENSION, DEFAULT_BUILD_DIR, DEFAULT_COMPONENT_NAME,
    DEFAULT_PUBLICATION_NAME, DEFAULT_STAGING_DIR, SettingsBuilder,
};
pub use coordinates::Coordinates;
pub use self::core::Settings;
pub use credentials::{Credentials, DEFAULT_CREDENTIALS_FILE};
pub use error::ConfigError;
pub use file::{DEFAULT_PROJECT_FILE, ProjectFile, UploadSection};
pub use upload::{DEFAULT_TIMEOUT, UploadSettings};
