//! Project configuration file.
//!
//! The versioned `central-portal.toml` next to the build carries everything
//! except credentials:
//!
//! ```toml
//! group_id = "io.github.someone"
//! artifact_id = "publish-test"
//! version = "2.0.4"
//! component_name = "prodRelease"
//! flavor_name = "prod-release"
//! build_dir = "build"
//!
//! [upload]
//! publishing_type = "AUTOMATIC"
//! name = "Publish Test 2.0.4"
//! timeout_secs = 300
//! max_attempts = 5
//! backoff_secs = 2
//! retry = "classified"
//! ```
//!
//! Relative paths are resolved against the directory containing the file.

use super::{ConfigError, SettingsBuilder};
use crate::bundler::{CollisionPolicy, SignatureFallback};
use crate::upload::{PublishingType, RetryMode};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default project file name.
pub const DEFAULT_PROJECT_FILE: &str = "central-portal.toml";

/// Deserialized project file. Every field is optional so command-line flags
/// can fill gaps.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    /// Group id.
    pub group_id: Option<String>,
    /// Artifact id.
    pub artifact_id: Option<String>,
    /// Version.
    pub version: Option<String>,
    /// Component name.
    pub component_name: Option<String>,
    /// Flavor name.
    pub flavor_name: Option<String>,
    /// Build output root.
    pub build_dir: Option<PathBuf>,
    /// Primary binary extension.
    pub binary_extension: Option<String>,
    /// Publication name.
    pub publication_name: Option<String>,
    /// Staging directory.
    pub staging_dir: Option<PathBuf>,
    /// Archive path.
    pub output_archive: Option<PathBuf>,
    /// Ambiguous `.asc` target.
    pub signature_fallback: Option<SignatureFallback>,
    /// Collision policy.
    pub collision_policy: Option<CollisionPolicy>,
    /// `[upload]` table.
    #[serde(default)]
    pub upload: UploadSection,
}

/// `[upload]` table of the project file.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadSection {
    /// Endpoint override.
    pub endpoint: Option<String>,
    /// Publishing mode; unknown values mean `USER_MANAGED`.
    pub publishing_type: Option<String>,
    /// Deployment title.
    pub name: Option<String>,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Attempt budget.
    pub max_attempts: Option<u32>,
    /// Linear backoff unit in seconds.
    pub backoff_secs: Option<u64>,
    /// Retry mode.
    pub retry: Option<RetryMode>,
}

impl ProjectFile {
    /// Reads and parses a project file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Seeds a builder with this file's values, resolving relative paths
    /// against `base_dir`.
    pub fn into_builder(self, base_dir: &Path) -> SettingsBuilder {
        let resolve = |p: PathBuf| if p.is_relative() { base_dir.join(p) } else { p };

        let mut builder = SettingsBuilder::new()
            .build_dir(resolve(self.build_dir.unwrap_or_else(|| PathBuf::from("build"))));

        if let Some(v) = self.group_id {
            builder = builder.group_id(v);
        }
        if let Some(v) = self.artifact_id {
            builder = builder.artifact_id(v);
        }
        if let Some(v) = self.version {
            builder = builder.version(v);
        }
        if let Some(v) = self.component_name {
            builder = builder.component_name(v);
        }
        if let Some(v) = self.flavor_name {
            builder = builder.flavor_name(v);
        }
        if let Some(v) = self.binary_extension {
            builder = builder.binary_extension(v);
        }
        if let Some(v) = self.publication_name {
            builder = builder.publication_name(v);
        }
        if let Some(v) = self.staging_dir {
            builder = builder.staging_dir(resolve(v));
        }
        if let Some(v) = self.output_archive {
            builder = builder.output_archive(resolve(v));
        }
        if let Some(v) = self.signature_fallback {
            builder = builder.signature_fallback(v);
        }
        if let Some(v) = self.collision_policy {
            builder = builder.collision_policy(v);
        }

        let upload = self.upload;
        builder = builder.publishing_type(PublishingType::parse_from(
            upload.publishing_type.as_deref(),
        ));
        if let Some(v) = upload.endpoint {
            builder = builder.endpoint(v);
        }
        if let Some(v) = upload.name {
            builder = builder.title(v);
        }
        if let Some(v) = upload.timeout_secs {
            builder = builder.timeout(Duration::from_secs(v));
        }
        if let Some(v) = upload.max_attempts {
            builder = builder.max_attempts(v);
        }
        if let Some(v) = upload.backoff_secs {
            builder = builder.backoff_base(Duration::from_secs(v));
        }
        if let Some(v) = upload.retry {
            builder = builder.retry_mode(v);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_full_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_PROJECT_FILE);
        std::fs::write(
            &path,
            r#"
group_id = "io.github.someone"
artifact_id = "publish-test"
version = "2.0.4"
component_name = "prodRelease"
signature_fallback = "reject"

[upload]
publishing_type = "AUTOMATIC"
name = "Publish Test 2.0.4"
max_attempts = 3
retry = "uniform"
"#,
        )
        .unwrap();

        let settings = ProjectFile::load(&path)
            .unwrap()
            .into_builder(dir.path())
            .build()
            .unwrap();

        assert_eq!(settings.coordinates().artifact_id(), "publish-test");
        assert_eq!(settings.variant_marker(), "prod-release");
        assert_eq!(settings.signature_fallback(), SignatureFallback::Reject);
        assert_eq!(settings.upload().publishing_type(), PublishingType::Automatic);
        assert_eq!(settings.upload().max_attempts(), 3);
        assert_eq!(settings.upload().retry_mode(), RetryMode::Uniform);
        assert_eq!(settings.title(), "Publish Test 2.0.4");
        assert_eq!(settings.staging_dir(), dir.path().join("build/central-portal-bundle"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_PROJECT_FILE);
        std::fs::write(&path, "groupId = \"com.example\"\n").unwrap();

        assert!(matches!(
            ProjectFile::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn unknown_publishing_type_is_user_managed() {
        let file = ProjectFile {
            group_id: Some("com.example".into()),
            artifact_id: Some("foo".into()),
            version: Some("1.0.0".into()),
            upload: UploadSection {
                publishing_type: Some("SOMETIMES".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let settings = file.into_builder(Path::new("/p")).build().unwrap();
        assert_eq!(
            settings.upload().publishing_type(),
            PublishingType::UserManaged
        );
    }
}
