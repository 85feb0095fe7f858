//! Artifact collection into the staging directory.

use std::path::Path;
use std::sync::Arc;

use super::checksum::write_checksum_files;
use crate::bundler::{
    ArtifactFile, ArtifactSource, Bundle, CollisionPolicy, NamingRules, Result, utils::fs,
};

/// Drains artifact sources into a [`Bundle`].
///
/// For every discovered file the collector computes the canonical name,
/// copies the bytes into the staging directory and, unless the file is a
/// signature, writes checksum siblings computed from the staged copy.
///
/// Files that cannot be named or listed are skipped with a warning. Copy
/// failures and collisions abort the run.
pub struct Collector {
    rules: NamingRules,
    policy: CollisionPolicy,
    sources: Vec<Arc<dyn ArtifactSource>>,
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("rules", &self.rules)
            .field("policy", &self.policy)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.describe()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Collector {
    /// Collector applying `rules` to `sources`, in order.
    pub fn new(
        rules: NamingRules,
        policy: CollisionPolicy,
        sources: Vec<Arc<dyn ArtifactSource>>,
    ) -> Self {
        Self {
            rules,
            policy,
            sources,
        }
    }

    /// Stages every discovered artifact under `staging_dir`.
    ///
    /// The directory must already exist; the collector does not clear it.
    pub async fn collect(&self, staging_dir: &Path) -> Result<Bundle> {
        let mut bundle = Bundle::new(staging_dir);

        for source in &self.sources {
            let files = discover_all(Arc::clone(source)).await?;
            log::debug!("{} files found in {}", files.len(), source.describe());

            for file in files {
                self.stage(&mut bundle, &file).await?;
            }
        }

        log::info!(
            "✓ Collected {} artifacts into {}",
            bundle.len(),
            staging_dir.display()
        );
        Ok(bundle)
    }

    async fn stage(&self, bundle: &mut Bundle, file: &ArtifactFile) -> Result<()> {
        let canonical_name =
            match self
                .rules
                .canonical_name(&file.file_name(), file.role(), file.extension())
            {
                Ok(name) => name,
                Err(e) => {
                    log::warn!("Skipping {}: {e}", file.source_path().display());
                    return Ok(());
                }
            };

        let entry = bundle.admit(file, canonical_name, self.policy)?;
        fs::copy_file(file.source_path(), entry.content_path()).await?;
        log::debug!(
            "{} -> {}",
            file.source_path().display(),
            entry.canonical_name()
        );

        if entry.needs_checksum() {
            write_checksum_files(entry.content_path()).await?;
        }
        Ok(())
    }
}

/// Lists a source on the blocking pool. Listing errors are logged and
/// dropped.
async fn discover_all(source: Arc<dyn ArtifactSource>) -> Result<Vec<ArtifactFile>> {
    tokio::task::spawn_blocking(move || {
        source
            .discover()
            .filter_map(|item| match item {
                Ok(file) => Some(file),
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {e}", source.describe());
                    None
                }
            })
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| crate::bundler::Error::GenericError(format!("Discovery task panicked: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{ArtifactRole, SignatureFallback};
    use crate::config::Coordinates;
    use std::path::PathBuf;

    struct FixedSource(Vec<ArtifactFile>);

    impl ArtifactSource for FixedSource {
        fn describe(&self) -> String {
            "fixed".into()
        }

        fn discover(&self) -> Box<dyn Iterator<Item = Result<ArtifactFile>> + Send + '_> {
            Box::new(self.0.iter().cloned().map(Ok))
        }
    }

    fn collector(policy: CollisionPolicy, files: Vec<ArtifactFile>) -> Collector {
        let coords = Coordinates::new("com.example", "foo", "1.0.0").unwrap();
        Collector::new(
            NamingRules::new(coords, "aar", SignatureFallback::Pom),
            policy,
            vec![Arc::new(FixedSource(files))],
        )
    }

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn stages_files_with_checksums_except_signatures() {
        let build = tempfile::tempdir().unwrap();
        let stage = tempfile::tempdir().unwrap();
        let aar = write(build.path(), "lib-release.aar", "aar");
        let sig = write(build.path(), "lib-release.aar.asc", "sig");

        let bundle = collector(
            CollisionPolicy::Fail,
            vec![
                ArtifactFile::new(aar, ArtifactRole::Main, "aar"),
                ArtifactFile::new(sig, ArtifactRole::Signature, "asc"),
            ],
        )
        .collect(stage.path())
        .await
        .unwrap();

        assert_eq!(bundle.len(), 2);
        let mut on_disk: Vec<String> = std::fs::read_dir(stage.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        on_disk.sort();
        assert_eq!(on_disk, bundle.file_names());
        assert_eq!(
            std::fs::read_to_string(stage.path().join("foo-1.0.0.aar")).unwrap(),
            "aar"
        );
    }

    #[tokio::test]
    async fn unnameable_files_are_skipped() {
        let build = tempfile::tempdir().unwrap();
        let stage = tempfile::tempdir().unwrap();
        let sig = write(build.path(), "lib.jar.asc", "sig");

        let bundle = collector(
            CollisionPolicy::Fail,
            vec![ArtifactFile::new(sig, ArtifactRole::Signature, "asc")],
        )
        .collect(stage.path())
        .await
        .unwrap();

        assert!(bundle.is_empty());
    }

    #[tokio::test]
    async fn two_poms_collide() {
        let build = tempfile::tempdir().unwrap();
        let stage = tempfile::tempdir().unwrap();
        let first = write(build.path(), "pom-default.xml", "<a/>");
        let second = write(build.path(), "foo.pom", "<b/>");

        let err = collector(
            CollisionPolicy::Fail,
            vec![
                ArtifactFile::new(first, ArtifactRole::Pom, "pom"),
                ArtifactFile::new(second, ArtifactRole::Pom, "pom"),
            ],
        )
        .collect(stage.path())
        .await
        .unwrap_err();

        assert!(err.is_collision());
    }

    #[tokio::test]
    async fn warn_policy_stages_the_later_file() {
        let build = tempfile::tempdir().unwrap();
        let stage = tempfile::tempdir().unwrap();
        let first = write(build.path(), "pom-default.xml", "<a/>");
        let second = write(build.path(), "foo.pom", "<b/>");

        collector(
            CollisionPolicy::Warn,
            vec![
                ArtifactFile::new(first, ArtifactRole::Pom, "pom"),
                ArtifactFile::new(second, ArtifactRole::Pom, "pom"),
            ],
        )
        .collect(stage.path())
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(stage.path().join("foo-1.0.0.pom")).unwrap(),
            "<b/>"
        );
        assert_eq!(
            std::fs::read_to_string(stage.path().join("foo-1.0.0.pom.md5")).unwrap(),
            format!("{:x}", md5::compute(b"<b/>"))
        );
    }

    #[tokio::test]
    async fn vanished_file_aborts() {
        let build = tempfile::tempdir().unwrap();
        let stage = tempfile::tempdir().unwrap();
        let gone = build.path().join("lib-release.aar");

        let result = collector(
            CollisionPolicy::Fail,
            vec![ArtifactFile::new(gone, ArtifactRole::Main, "aar")],
        )
        .collect(stage.path())
        .await;

        assert!(result.is_err());
    }
}
