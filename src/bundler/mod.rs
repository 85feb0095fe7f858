//! Artifact bundle assembly.
//!
//! Discovers release artifacts in the build output, stages them under their
//! canonical repository names with checksum siblings, and packages them
//! into a single archive laid out the way the publishing API expects.

mod artifact;
pub mod builder;
pub mod error;
mod naming;
mod sources;
pub mod utils;

pub use artifact::{ArtifactFile, ArtifactRole, Bundle, CollisionPolicy, StagedEntry};
pub use builder::{BundledArchive, Bundler, Collector, Packager};
pub use error::{Error, ErrorExt, Result};
pub use naming::{NamingError, NamingRules, SignatureFallback};
pub use sources::{
    ArtifactSource, BinaryOutputSource, ClassifiedJarSource, DescriptorSource, VariantFilter,
};
