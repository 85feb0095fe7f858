//! Repository coordinates of the published component.

use super::ConfigError;

/// Group, artifact and version identifying the published component.
///
/// Supplied once per run and shared read-only by every naming decision and
/// by the archive layout.
///
/// # Examples
///
/// ```
/// use central_portal_bundler::config::Coordinates;
///
/// let coords = Coordinates::new("com.example", "foo", "1.0.0").unwrap();
/// assert_eq!(coords.repository_path(), "com/example/foo/1.0.0");
/// assert_eq!(coords.base_name(), "foo-1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Coordinates {
    /// Reverse-domain group, e.g. `io.github.someone`.
    group_id: String,

    /// Artifact name within the group.
    artifact_id: String,

    /// Published version string.
    version: String,
}

impl Coordinates {
    /// Validates and builds coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for blank values and
    /// [`ConfigError::InvalidValue`] when a value cannot appear in a
    /// repository path.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let group_id = required("group_id", group_id.into())?;
        let artifact_id = required("artifact_id", artifact_id.into())?;
        let version = required("version", version.into())?;

        if group_id.split('.').any(str::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "group_id",
                reason: format!("'{group_id}' contains an empty segment"),
            });
        }
        for (field, value) in [
            ("group_id", &group_id),
            ("artifact_id", &artifact_id),
            ("version", &version),
        ] {
            if let Some(c) = value
                .chars()
                .find(|c| c.is_whitespace() || matches!(c, '/' | '\\' | ':'))
            {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("'{value}' contains forbidden character {c:?}"),
                });
            }
        }

        Ok(Self {
            group_id,
            artifact_id,
            version,
        })
    }

    /// Returns the group id.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Returns the artifact id.
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// Returns the version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `<group as path>/<artifactId>/<version>`, the directory every bundle
    /// entry lives under.
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}",
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version
        )
    }

    /// `<artifactId>-<version>`, the stem shared by every canonical name.
    pub fn base_name(&self) -> String {
        format!("{}-{}", self.artifact_id, self.version)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

fn required(field: &'static str, value: String) -> Result<String, ConfigError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        Err(ConfigError::MissingField { field })
    } else {
        Ok(value)
    }
}
