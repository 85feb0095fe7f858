//! Discovered artifacts, staged entries and the bundle they form.

use super::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a discovered file is to the published component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactRole {
    /// Primary binary (e.g. the `.aar`).
    Main,
    /// Sources jar.
    Sources,
    /// Documentation jar.
    Javadoc,
    /// POM-equivalent metadata descriptor.
    Pom,
    /// Module/variant descriptor.
    Module,
    /// Detached `.asc` signature of one of the above.
    Signature,
}

impl ArtifactRole {
    /// Classifier carried in the canonical name, if any.
    pub fn classifier(self) -> Option<&'static str> {
        match self {
            Self::Sources => Some("sources"),
            Self::Javadoc => Some("javadoc"),
            _ => None,
        }
    }

    /// Whether files of this role are detached signatures.
    pub fn is_signature(self) -> bool {
        self == Self::Signature
    }
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Main => "main",
            Self::Sources => "sources",
            Self::Javadoc => "javadoc",
            Self::Pom => "pom",
            Self::Module => "module",
            Self::Signature => "signature",
        })
    }
}

/// A build output file found by an artifact source.
///
/// Identified by its source path and never modified after discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    source_path: PathBuf,
    role: ArtifactRole,
    extension: String,
    classifier: Option<String>,
}

impl ArtifactFile {
    /// Describes a discovered file. The classifier follows from the role.
    pub fn new(source_path: impl Into<PathBuf>, role: ArtifactRole, extension: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            role,
            extension: extension.into(),
            classifier: role.classifier().map(str::to_string),
        }
    }

    /// Path of the file in the build output.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// File name of the source path.
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Role of the file.
    pub fn role(&self) -> ArtifactRole {
        self.role
    }

    /// Extension used in the canonical name.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Classifier, for sources and javadoc jars.
    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }
}

/// A file placed in the staging directory under its canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    canonical_name: String,
    content_path: PathBuf,
    needs_checksum: bool,
}

impl StagedEntry {
    /// Canonical file name.
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Path of the staged copy.
    pub fn content_path(&self) -> &Path {
        &self.content_path
    }

    /// Whether `.md5`/`.sha1` siblings are written for this entry.
    pub fn needs_checksum(&self) -> bool {
        self.needs_checksum
    }

    /// Names of the checksum siblings, empty for signatures.
    pub fn checksum_names(&self) -> Vec<String> {
        if self.needs_checksum {
            vec![
                format!("{}.md5", self.canonical_name),
                format!("{}.sha1", self.canonical_name),
            ]
        } else {
            Vec::new()
        }
    }
}

/// How to react when two different files claim one canonical name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Abort the run with [`Error::NameCollision`].
    #[default]
    Fail,
    /// Keep the later file and log a warning.
    Warn,
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "warn" => Ok(Self::Warn),
            other => Err(format!("unknown collision policy '{other}' (expected fail or warn)")),
        }
    }
}

/// The set of staged entries for one run, keyed by canonical name.
#[derive(Debug)]
pub struct Bundle {
    staging_dir: PathBuf,
    entries: BTreeMap<String, (StagedEntry, ArtifactFile)>,
}

impl Bundle {
    /// Empty bundle staged under `staging_dir`.
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Directory holding the staged files.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Registers `origin` under `canonical_name` and returns where it must be
    /// staged.
    ///
    /// Re-registering the same source file is a no-op. A different file with
    /// the same name is an [`Error::NameCollision`] under
    /// [`CollisionPolicy::Fail`], or replaces the earlier one with a warning
    /// under [`CollisionPolicy::Warn`].
    pub fn admit(
        &mut self,
        origin: &ArtifactFile,
        canonical_name: String,
        policy: CollisionPolicy,
    ) -> Result<StagedEntry> {
        if let Some((_, existing)) = self
            .entries
            .get(&canonical_name)
            .filter(|(_, existing)| existing.source_path() != origin.source_path())
        {
            match policy {
                CollisionPolicy::Fail => {
                    return Err(Error::NameCollision {
                        name: canonical_name,
                        first: existing.source_path().to_path_buf(),
                        first_role: existing.role().to_string(),
                        second: origin.source_path().to_path_buf(),
                        second_role: origin.role().to_string(),
                    });
                }
                CollisionPolicy::Warn => log::warn!(
                    "{} replaces {} as {canonical_name}",
                    origin.source_path().display(),
                    existing.source_path().display()
                ),
            }
        }

        let entry = StagedEntry {
            content_path: self.staging_dir.join(&canonical_name),
            needs_checksum: !origin.role().is_signature(),
            canonical_name: canonical_name.clone(),
        };
        self.entries
            .insert(canonical_name, (entry.clone(), origin.clone()));
        Ok(entry)
    }

    /// Staged entries in canonical-name order.
    pub fn entries(&self) -> impl Iterator<Item = &StagedEntry> {
        self.entries.values().map(|(entry, _)| entry)
    }

    /// Number of staged entries, checksums excluded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every file name the staging directory should contain, checksums
    /// included, sorted.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries()
            .flat_map(|entry| {
                std::iter::once(entry.canonical_name().to_string()).chain(entry.checksum_names())
            })
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_get_no_checksums() {
        let mut bundle = Bundle::new("/stage");
        let sig = ArtifactFile::new("/b/foo.pom.asc", ArtifactRole::Signature, "asc");
        let entry = bundle
            .admit(&sig, "foo-1.0.0.pom.asc".into(), CollisionPolicy::Fail)
            .unwrap();
        assert!(!entry.needs_checksum());
        assert!(entry.checksum_names().is_empty());
        assert_eq!(entry.content_path(), Path::new("/stage/foo-1.0.0.pom.asc"));
    }

    #[test]
    fn collision_between_different_files_fails() {
        let mut bundle = Bundle::new("/stage");
        let first = ArtifactFile::new("/b/pom-default.xml", ArtifactRole::Pom, "pom");
        let second = ArtifactFile::new("/b/foo.pom", ArtifactRole::Pom, "pom");

        bundle
            .admit(&first, "foo-1.0.0.pom".into(), CollisionPolicy::Fail)
            .unwrap();
        let err = bundle
            .admit(&second, "foo-1.0.0.pom".into(), CollisionPolicy::Fail)
            .unwrap_err();
        assert!(err.is_collision());
    }

    #[test]
    fn warn_policy_keeps_last_writer() {
        let mut bundle = Bundle::new("/stage");
        let first = ArtifactFile::new("/b/a.aar", ArtifactRole::Main, "aar");
        let second = ArtifactFile::new("/b/b.aar", ArtifactRole::Main, "aar");

        bundle
            .admit(&first, "foo-1.0.0.aar".into(), CollisionPolicy::Warn)
            .unwrap();
        bundle
            .admit(&second, "foo-1.0.0.aar".into(), CollisionPolicy::Warn)
            .unwrap();

        assert_eq!(bundle.len(), 1);
        assert_eq!(
            bundle.entries["foo-1.0.0.aar"].1.source_path(),
            Path::new("/b/b.aar")
        );
    }

    #[test]
    fn same_file_twice_is_not_a_collision() {
        let mut bundle = Bundle::new("/stage");
        let file = ArtifactFile::new("/b/a.aar", ArtifactRole::Main, "aar");
        bundle
            .admit(&file, "foo-1.0.0.aar".into(), CollisionPolicy::Fail)
            .unwrap();
        assert!(bundle
            .admit(&file, "foo-1.0.0.aar".into(), CollisionPolicy::Fail)
            .is_ok());
    }

    #[test]
    fn file_names_include_checksums() {
        let mut bundle = Bundle::new("/stage");
        let aar = ArtifactFile::new("/b/a.aar", ArtifactRole::Main, "aar");
        let sig = ArtifactFile::new("/b/a.aar.asc", ArtifactRole::Signature, "asc");
        bundle
            .admit(&aar, "foo-1.0.0.aar".into(), CollisionPolicy::Fail)
            .unwrap();
        bundle
            .admit(&sig, "foo-1.0.0.aar.asc".into(), CollisionPolicy::Fail)
            .unwrap();

        assert_eq!(
            bundle.file_names(),
            vec![
                "foo-1.0.0.aar",
                "foo-1.0.0.aar.asc",
                "foo-1.0.0.aar.md5",
                "foo-1.0.0.aar.sha1"
            ]
        );
    }
}
