//! Core Settings struct and implementations.

use super::{Coordinates, UploadSettings};
use crate::bundler::{CollisionPolicy, SignatureFallback};
use std::path::{Path, PathBuf};

/// Immutable settings for one publishing run.
///
/// Constructed once via [`SettingsBuilder`](super::SettingsBuilder) and passed
/// by reference to the collector, packager and upload client.
///
/// # Examples
///
/// ```no_run
/// use central_portal_bundler::config::SettingsBuilder;
///
/// # fn example() -> Result<(), central_portal_bundler::config::ConfigError> {
/// let settings = SettingsBuilder::new()
///     .group_id("com.example")
///     .artifact_id("foo")
///     .version("1.0.0")
///     .build_dir("build")
///     .build()?;
///
/// assert_eq!(settings.variant_marker(), "release");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Published coordinates.
    pub(super) coordinates: Coordinates,

    /// Build variant whose output is published, e.g. `release` or
    /// `prodRelease`.
    pub(super) component_name: String,

    /// Output-name marker distinguishing coexisting variants, e.g.
    /// `prod-release`.
    pub(super) flavor_name: Option<String>,

    /// Extension of the primary binary (`aar` for Android libraries).
    pub(super) binary_extension: String,

    /// Directory holding the primary binary and its signature.
    pub(super) binary_output_dir: PathBuf,

    /// Directory holding sources/javadoc jars and their signatures.
    pub(super) classified_jar_dir: PathBuf,

    /// Directory holding the generated POM, module descriptor and signatures.
    pub(super) descriptor_dir: PathBuf,

    /// Staging directory, erased at the start of every run.
    pub(super) staging_dir: PathBuf,

    /// Final archive path.
    pub(super) output_archive: PathBuf,

    /// Target assumed for an ambiguous `.asc` file.
    pub(super) signature_fallback: SignatureFallback,

    /// Reaction to two files claiming one canonical name.
    pub(super) collision_policy: CollisionPolicy,

    /// Upload configuration.
    pub(super) upload: UploadSettings,
}

impl Settings {
    /// Returns the published coordinates.
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Returns the component name.
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Returns the flavor name, if configured.
    pub fn flavor_name(&self) -> Option<&str> {
        self.flavor_name.as_deref()
    }

    /// Substring identifying the selected variant's output files.
    ///
    /// The flavor name when configured, otherwise the component name in
    /// kebab case (`prodRelease` becomes `prod-release`, `release` stays
    /// `release`).
    pub fn variant_marker(&self) -> String {
        match &self.flavor_name {
            Some(flavor) => flavor.clone(),
            None => kebab_case(&self.component_name),
        }
    }

    /// Returns the primary binary extension.
    pub fn binary_extension(&self) -> &str {
        &self.binary_extension
    }

    /// Returns the primary binary directory.
    pub fn binary_output_dir(&self) -> &Path {
        &self.binary_output_dir
    }

    /// Returns the classified jar directory.
    pub fn classified_jar_dir(&self) -> &Path {
        &self.classified_jar_dir
    }

    /// Returns the descriptor directory.
    pub fn descriptor_dir(&self) -> &Path {
        &self.descriptor_dir
    }

    /// Returns the staging directory.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Returns the output archive path.
    pub fn output_archive(&self) -> &Path {
        &self.output_archive
    }

    /// Returns the signature fallback.
    pub fn signature_fallback(&self) -> SignatureFallback {
        self.signature_fallback
    }

    /// Returns the collision policy.
    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    /// Returns the upload settings.
    pub fn upload(&self) -> &UploadSettings {
        &self.upload
    }

    /// Deployment title: the configured one, or `<artifactId> <version>`.
    pub fn title(&self) -> String {
        self.upload.title().map(str::to_string).unwrap_or_else(|| {
            format!(
                "{} {}",
                self.coordinates.artifact_id(),
                self.coordinates.version()
            )
        })
    }
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
