//! Release bundle assembly and upload for the Central Portal publisher API.
//!
//! This library collects a library's release artifacts (binary, sources and
//! documentation jars, metadata descriptors and detached signatures), stages
//! them under canonical repository names with checksum files, packages them
//! into one zip archive and uploads that archive with bounded retries.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod upload;

// Re-export commonly used types
pub use error::{CliError, PublisherError, Result};
