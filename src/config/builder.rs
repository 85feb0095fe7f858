//! Builder for constructing Settings.

use super::{ConfigError, Coordinates, Settings, UploadSettings};
use path_absolutize::Absolutize;
use crate::bundler::{CollisionPolicy, SignatureFallback};
use crate::upload::{PublishingType, RetryMode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default build output root.
pub const DEFAULT_BUILD_DIR: &str = "build";
/// Default component name.
pub const DEFAULT_COMPONENT_NAME: &str = "release";
/// Default primary binary extension.
pub const DEFAULT_BINARY_EXTENSION: &str = "aar";
/// Default publication whose descriptors are bundled.
pub const DEFAULT_PUBLICATION_NAME: &str = "maven";
/// Default staging directory name under the build root.
pub const DEFAULT_STAGING_DIR: &str = "central-portal-bundle";
/// Default archive file name under the build root.
pub const DEFAULT_ARCHIVE_NAME: &str = "central-portal-upload.zip";

/// Builder for constructing [`Settings`].
///
/// Every directory defaults to the conventional location under the build
/// root:
///
/// | Setting | Default |
/// |---|---|
/// | binary output | `<build>/outputs/<binary_extension>` |
/// | classified jars | `<build>/libs` |
/// | descriptors | `<build>/publications/<publication_name>` |
/// | staging | `<build>/central-portal-bundle` |
/// | archive | `<build>/central-portal-upload.zip` |
///
/// # Examples
///
/// ```
/// use central_portal_bundler::config::SettingsBuilder;
///
/// let settings = SettingsBuilder::new()
///     .group_id("io.github.someone")
///     .artifact_id("publish-test")
///     .version("2.0.4")
///     .component_name("prodRelease")
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.variant_marker(), "prod-release");
/// assert!(settings.binary_output_dir().ends_with("build/outputs/aar"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct SettingsBuilder {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    component_name: Option<String>,
    flavor_name: Option<String>,
    build_dir: Option<PathBuf>,
    binary_extension: Option<String>,
    publication_name: Option<String>,
    binary_output_dir: Option<PathBuf>,
    classified_jar_dir: Option<PathBuf>,
    descriptor_dir: Option<PathBuf>,
    staging_dir: Option<PathBuf>,
    output_archive: Option<PathBuf>,
    signature_fallback: SignatureFallback,
    collision_policy: CollisionPolicy,
    endpoint: Option<String>,
    publishing_type: PublishingType,
    title: Option<String>,
    timeout: Option<Duration>,
    max_attempts: Option<u32>,
    backoff_base: Option<Duration>,
    retry_mode: RetryMode,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the group id.
    ///
    /// # Required
    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Sets the artifact id.
    ///
    /// # Required
    pub fn artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.artifact_id = Some(artifact_id.into());
        self
    }

    /// Sets the version.
    ///
    /// # Required
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the component name.
    ///
    /// Default: `release`
    pub fn component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = Some(name.into());
        self
    }

    /// Sets the flavor name used to pick one variant's output files.
    ///
    /// Default: derived from the component name
    pub fn flavor_name(mut self, name: impl Into<String>) -> Self {
        self.flavor_name = Some(name.into());
        self
    }

    /// Sets the build output root.
    ///
    /// Default: `build`
    pub fn build_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the primary binary extension, without the dot.
    ///
    /// Default: `aar`
    pub fn binary_extension(mut self, extension: impl Into<String>) -> Self {
        self.binary_extension = Some(extension.into());
        self
    }

    /// Sets the publication whose descriptors are bundled.
    ///
    /// Default: `maven`
    pub fn publication_name(mut self, name: impl Into<String>) -> Self {
        self.publication_name = Some(name.into());
        self
    }

    /// Overrides the primary binary directory.
    pub fn binary_output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.binary_output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the classified jar directory.
    pub fn classified_jar_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.classified_jar_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the descriptor directory.
    pub fn descriptor_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.descriptor_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the staging directory.
    pub fn staging_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.staging_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the archive path.
    pub fn output_archive<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_archive = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the target assumed for an ambiguous `.asc` file.
    ///
    /// Default: [`SignatureFallback::Pom`]
    pub fn signature_fallback(mut self, fallback: SignatureFallback) -> Self {
        self.signature_fallback = fallback;
        self
    }

    /// Sets the collision policy.
    ///
    /// Default: [`CollisionPolicy::Fail`]
    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Overrides the upload endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the publishing mode.
    ///
    /// Default: [`PublishingType::UserManaged`]
    pub fn publishing_type(mut self, publishing_type: PublishingType) -> Self {
        self.publishing_type = publishing_type;
        self
    }

    /// Sets the deployment title.
    ///
    /// Default: `<artifactId> <version>`
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the per-attempt timeout.
    ///
    /// Default: 5 minutes
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the attempt budget.
    ///
    /// Default: 5
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Sets the linear backoff unit.
    ///
    /// Default: 2 seconds
    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = Some(base);
        self
    }

    /// Sets which failures are retried.
    ///
    /// Default: [`RetryMode::Classified`]
    pub fn retry_mode(mut self, retry_mode: RetryMode) -> Self {
        self.retry_mode = retry_mode;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `group_id`, `artifact_id` or `version` is missing
    /// or unusable, or if any other value is out of range.
    pub fn build(self) -> Result<Settings, ConfigError> {
        let coordinates = Coordinates::new(
            self.group_id.ok_or(ConfigError::MissingField { field: "group_id" })?,
            self.artifact_id
                .ok_or(ConfigError::MissingField { field: "artifact_id" })?,
            self.version.ok_or(ConfigError::MissingField { field: "version" })?,
        )?;

        let binary_extension = self
            .binary_extension
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .unwrap_or_else(|| DEFAULT_BINARY_EXTENSION.to_string());
        if binary_extension.is_empty() || binary_extension.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "binary_extension",
                reason: format!("'{binary_extension}' is not a file extension"),
            });
        }

        let component_name = self
            .component_name
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COMPONENT_NAME.to_string());
        let flavor_name = self.flavor_name.filter(|f| !f.trim().is_empty());
        let publication_name = self
            .publication_name
            .unwrap_or_else(|| DEFAULT_PUBLICATION_NAME.to_string());

        let build_dir = self
            .build_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR));
        let binary_output_dir = self
            .binary_output_dir
            .unwrap_or_else(|| build_dir.join("outputs").join(&binary_extension));
        let classified_jar_dir = self
            .classified_jar_dir
            .unwrap_or_else(|| build_dir.join("libs"));
        let descriptor_dir = self
            .descriptor_dir
            .unwrap_or_else(|| build_dir.join("publications").join(&publication_name));
        let staging_dir = self
            .staging_dir
            .unwrap_or_else(|| build_dir.join(DEFAULT_STAGING_DIR));
        let output_archive = self
            .output_archive
            .unwrap_or_else(|| build_dir.join(DEFAULT_ARCHIVE_NAME));

        check_staging_dir(
            &staging_dir,
            &output_archive,
            [&binary_output_dir, &classified_jar_dir, &descriptor_dir],
        )?;

        let mut upload = UploadSettings {
            publishing_type: self.publishing_type,
            title: self.title.filter(|t| !t.trim().is_empty()),
            retry_mode: self.retry_mode,
            ..UploadSettings::default()
        };
        if let Some(endpoint) = self.endpoint {
            upload.endpoint = Url::parse(&endpoint).map_err(|e| ConfigError::InvalidValue {
                field: "endpoint",
                reason: format!("'{endpoint}': {e}"),
            })?;
        }
        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: "timeout",
                    reason: "must be greater than zero".to_string(),
                });
            }
            upload.timeout = timeout;
        }
        if let Some(max_attempts) = self.max_attempts {
            if max_attempts == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "max_attempts",
                    reason: "at least one attempt is required".to_string(),
                });
            }
            upload.max_attempts = max_attempts;
        }
        if let Some(base) = self.backoff_base {
            upload.backoff_base = base;
        }

        Ok(Settings {
            coordinates,
            component_name,
            flavor_name,
            binary_extension,
            binary_output_dir,
            classified_jar_dir,
            descriptor_dir,
            staging_dir,
            output_archive,
            signature_fallback: self.signature_fallback,
            collision_policy: self.collision_policy,
            upload,
        })
    }
}

fn absolute(field: &'static str, path: &Path) -> Result<PathBuf, ConfigError> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| ConfigError::InvalidValue {
            field,
            reason: format!("cannot resolve {}: {e}", path.display()),
        })
}

/// The staging directory is erased on every run, so it must not overlap
/// anything the run reads from or the directory it is started in.
fn check_staging_dir<'a>(
    staging_dir: &Path,
    output_archive: &Path,
    source_dirs: impl IntoIterator<Item = &'a PathBuf>,
) -> Result<(), ConfigError> {
    let staging = absolute("staging_dir", staging_dir)?;
    let archive = absolute("output_archive", output_archive)?;

    let overlapping = |other: &Path| other.starts_with(&staging) || staging.starts_with(other);
    let cwd = absolute("staging_dir", Path::new("."))?;
    let mut conflict = cwd.starts_with(&staging).then(|| PathBuf::from("."));
    if conflict.is_none() {
        for dir in source_dirs {
            if overlapping(&absolute("staging_dir", dir)?) {
                conflict = Some(dir.clone());
                break;
            }
        }
    }

    if let Some(dir) = conflict {
        return Err(ConfigError::InvalidValue {
            field: "staging_dir",
            reason: format!(
                "{} is erased on every run and must not overlap {}",
                staging_dir.display(),
                dir.display()
            ),
        });
    }

    if archive.starts_with(&staging) {
        return Err(ConfigError::InvalidValue {
            field: "output_archive",
            reason: format!(
                "{} must not be inside the staging directory {}",
                output_archive.display(),
                staging_dir.display()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SettingsBuilder {
        SettingsBuilder::new()
            .group_id("com.example")
            .artifact_id("foo")
            .version("1.0.0")
    }

    #[test]
    fn defaults_follow_build_dir() {
        let settings = base().build_dir("/work/build").build().unwrap();
        assert_eq!(
            settings.binary_output_dir(),
            Path::new("/work/build/outputs/aar")
        );
        assert_eq!(settings.classified_jar_dir(), Path::new("/work/build/libs"));
        assert_eq!(
            settings.descriptor_dir(),
            Path::new("/work/build/publications/maven")
        );
        assert_eq!(
            settings.output_archive(),
            Path::new("/work/build/central-portal-upload.zip")
        );
        assert_eq!(settings.title(), "foo 1.0.0");
        assert_eq!(settings.upload().max_attempts(), 5);
        assert_eq!(settings.upload().timeout(), Duration::from_secs(300));
    }

    #[test]
    fn missing_coordinates_fail_fast() {
        let err = SettingsBuilder::new()
            .artifact_id("foo")
            .version("1.0.0")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "group_id" }));
    }

    #[test]
    fn flavor_overrides_component_marker() {
        let settings = base()
            .component_name("prodRelease")
            .flavor_name("prod-release")
            .build()
            .unwrap();
        assert_eq!(settings.variant_marker(), "prod-release");

        let settings = base().build().unwrap();
        assert_eq!(settings.variant_marker(), "release");
    }

    #[test]
    fn staging_overlapping_inputs_is_rejected() {
        let staging_field = |builder: SettingsBuilder| {
            matches!(
                builder.build(),
                Err(ConfigError::InvalidValue {
                    field: "staging_dir",
                    ..
                })
            )
        };

        // Staging equal to the build root would erase every input.
        assert!(staging_field(
            base().build_dir("/work/build").staging_dir("/work/build")
        ));
        // Staging inside an input directory.
        assert!(staging_field(
            base()
                .build_dir("/work/build")
                .staging_dir("/work/build/libs/stage")
        ));
        // Same input reached through a non-normalized path.
        assert!(staging_field(
            base()
                .build_dir("/work/build")
                .staging_dir("/work/build/tmp/../outputs/aar")
        ));
        // The directory the tool runs in.
        assert!(staging_field(base().staging_dir(".")));
    }

    #[test]
    fn separate_staging_dir_is_accepted() {
        let settings = base()
            .build_dir("/work/build")
            .staging_dir("/work/build/bundle-stage")
            .build()
            .unwrap();
        assert_eq!(settings.staging_dir(), Path::new("/work/build/bundle-stage"));
    }

    #[test]
    fn archive_inside_staging_is_rejected() {
        let err = base()
            .staging_dir("/tmp/stage")
            .output_archive("/tmp/stage/bundle.zip")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "output_archive",
                ..
            }
        ));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let err = base().max_attempts(0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_attempts",
                ..
            }
        ));
    }
}
