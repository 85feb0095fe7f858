//! Bundle assembly.
//!
//! This module turns build outputs into one upload-ready archive:
//!
//! 1. [`Collector`] drains the artifact sources into the staging directory,
//!    renaming each file canonically and writing checksum siblings
//! 2. [`Packager`] zips the staging directory under the repository layout
//!    prefix
//! 3. [`Bundler`] runs both for one set of settings and reports a
//!    [`BundledArchive`]
//!
//! # Module Organization
//!
//! - [`checksum`] - MD5 and SHA-1 digests of staged files
//! - `collector` - discovery, naming and staging
//! - `packager` - zip writing and atomic replacement
//! - `orchestrator` - the [`Bundler`] itself

pub mod checksum;
mod collector;
mod orchestrator;
mod packager;

pub use collector::Collector;
pub use orchestrator::Bundler;
pub use packager::{BundledArchive, Packager};
