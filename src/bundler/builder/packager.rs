//! Zip packaging of the staging directory.
//!
//! Every staged file becomes one entry under the repository layout prefix
//! `<group path>/<artifactId>/<version>/`. Entries are deflated, written in
//! file-name order, and no directory entries are emitted. The archive is
//! built next to its destination and renamed into place, so a failed run
//! never leaves a truncated archive behind.

use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::bundler::{Error, Result, error::ErrorExt};
use crate::config::Coordinates;

/// The written archive.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BundledArchive {
    /// Where the archive was written.
    pub path: PathBuf,
    /// Entry names, in archive order.
    pub entries: Vec<String>,
    /// Size in bytes.
    pub size: u64,
}

/// Writes staging directories into repository-layout zip archives.
#[derive(Debug, Clone)]
pub struct Packager {
    prefix: String,
}

impl Packager {
    /// Packager for `coordinates`.
    pub fn new(coordinates: &Coordinates) -> Self {
        Self {
            prefix: format!("{}/", coordinates.repository_path()),
        }
    }

    /// Entry prefix, ending in `/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Packages every file in `staging_dir` into `output`, replacing any
    /// existing archive.
    pub async fn package(&self, staging_dir: &Path, output: &Path) -> Result<BundledArchive> {
        let prefix = self.prefix.clone();
        let staging_dir = staging_dir.to_path_buf();
        let output = output.to_path_buf();

        let archive = tokio::task::spawn_blocking(move || write_archive(&prefix, &staging_dir, &output))
            .await
            .map_err(|e| Error::GenericError(format!("Packaging task panicked: {e}")))??;

        log::info!(
            "✓ Wrote {} ({} entries, {} bytes)",
            archive.path.display(),
            archive.entries.len(),
            archive.size
        );
        Ok(archive)
    }
}

fn write_archive(prefix: &str, staging_dir: &Path, output: &Path) -> Result<BundledArchive> {
    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;

    let file_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle.zip".to_string());
    let temp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

    let entries = write_entries(prefix, staging_dir, &temp_path)
        .and_then(|entries| {
            std::fs::rename(&temp_path, output).fs_context("renaming archive to", output)?;
            Ok(entries)
        })
        .inspect_err(|_| {
            let _ = std::fs::remove_file(&temp_path);
        })?;

    let size = std::fs::metadata(output)
        .fs_context("reading metadata of", output)?
        .len();
    Ok(BundledArchive {
        path: output.to_path_buf(),
        entries,
        size,
    })
}

fn write_entries(prefix: &str, staging_dir: &Path, temp_path: &Path) -> Result<Vec<String>> {
    let file = File::create(temp_path).fs_context("creating archive", temp_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::new();

    for entry in walkdir::WalkDir::new(staging_dir)
        .min_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(staging_dir)
            .map_err(|e| Error::GenericError(e.to_string()))?;
        let name = format!(
            "{prefix}{}",
            relative.to_string_lossy().replace('\\', "/")
        );

        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(entry.path()).fs_context("opening staged file", entry.path())?;
        io::copy(&mut source, &mut zip).fs_context("archiving", entry.path())?;
        entries.push(name);
    }

    let writer = zip.finish()?;
    let file = writer
        .into_inner()
        .map_err(|e| Error::IoError(e.into_error()))?;
    file.sync_all().fs_context("syncing archive", temp_path)?;
    Ok(entries)
}
