//! Artifact sources.
//!
//! A source knows one build output directory and which of its files belong in
//! the bundle. Directories are scanned flat and in file-name order, so two
//! runs over the same tree discover the same files in the same order. A
//! missing directory simply yields nothing.

use super::{ArtifactFile, ArtifactRole, Error, Result};
use std::path::{Path, PathBuf};

/// A lazily enumerated set of build outputs.
pub trait ArtifactSource: Send + Sync {
    /// Short description for log messages.
    fn describe(&self) -> String;

    /// Yields every matching file. I/O problems while listing surface as
    /// `Err` items; the caller decides whether to skip them.
    fn discover(&self) -> Box<dyn Iterator<Item = Result<ArtifactFile>> + Send + '_>;
}

/// Keeps the release variant of variant-specific outputs.
///
/// Names containing `-debug` are always dropped. Of the rest, only names
/// containing the marker are kept. A lenient filter keeps everything left
/// when no name contains the marker, since the output is then
/// single-variant; a strict filter keeps nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFilter {
    marker: String,
    strict: bool,
}

impl VariantFilter {
    /// Lenient filter for the variant identified by `marker` (e.g.
    /// `prod-release`).
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            strict: false,
        }
    }

    /// Filter that never falls back to unmarked outputs, for an explicitly
    /// named flavor.
    pub fn strict(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            strict: true,
        }
    }

    /// The variant marker.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Whether `file_name` belongs to the configured variant.
    pub fn accepts(&self, file_name: &str) -> bool {
        !is_debug(file_name) && file_name.contains(self.marker.as_str())
    }

    /// Applies the filter to a set of files discovered together.
    pub fn select<P: AsRef<Path>>(&self, files: Vec<P>) -> Vec<P> {
        let candidates: Vec<P> = files
            .into_iter()
            .filter(|f| !is_debug(&file_name_of(f.as_ref())))
            .collect();

        if candidates
            .iter()
            .any(|f| self.accepts(&file_name_of(f.as_ref())))
        {
            candidates
                .into_iter()
                .filter(|f| self.accepts(&file_name_of(f.as_ref())))
                .collect()
        } else if self.strict {
            if !candidates.is_empty() {
                log::warn!(
                    "No output contains the flavor '{}'; {} other file(s) skipped",
                    self.marker,
                    candidates.len()
                );
            }
            Vec::new()
        } else {
            candidates
        }
    }
}

fn is_debug(file_name: &str) -> bool {
    file_name.contains("-debug")
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Regular files directly inside `dir`, sorted by name.
fn scan(dir: &Path) -> Box<dyn Iterator<Item = Result<PathBuf>> + Send> {
    if !dir.is_dir() {
        log::debug!("{} does not exist, nothing to collect", dir.display());
        return Box::new(std::iter::empty());
    }

    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(Error::from(e))),
        });
    Box::new(walker)
}

/// Primary binaries (`<build>/outputs/aar`) and their signatures.
#[derive(Debug, Clone)]
pub struct BinaryOutputSource {
    dir: PathBuf,
    extension: String,
    filter: VariantFilter,
}

impl BinaryOutputSource {
    /// Source over `dir` for binaries with `extension`.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>, filter: VariantFilter) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            filter,
        }
    }

    fn classify(&self, path: PathBuf) -> Option<ArtifactFile> {
        let name = file_name_of(&path);
        let binary = format!(".{}", self.extension);
        if name.ends_with(&binary) {
            Some(ArtifactFile::new(path, ArtifactRole::Main, self.extension.as_str()))
        } else if name.ends_with(&format!("{binary}.asc")) {
            Some(ArtifactFile::new(path, ArtifactRole::Signature, "asc"))
        } else {
            log::debug!("ignoring {name}: not a .{} output", self.extension);
            None
        }
    }
}

impl ArtifactSource for BinaryOutputSource {
    fn describe(&self) -> String {
        format!("binary outputs in {}", self.dir.display())
    }

    fn discover(&self) -> Box<dyn Iterator<Item = Result<ArtifactFile>> + Send + '_> {
        let mut errors: Vec<Result<ArtifactFile>> = Vec::new();
        let mut paths = Vec::new();
        for item in scan(&self.dir) {
            match item {
                Ok(path) => paths.push(path),
                Err(e) => errors.push(Err(e)),
            }
        }

        let selected = self.filter.select(paths);
        Box::new(
            errors
                .into_iter()
                .chain(selected.into_iter().filter_map(|p| self.classify(p).map(Ok))),
        )
    }
}

/// Sources and documentation jars (`<build>/libs`) and their signatures.
#[derive(Debug, Clone)]
pub struct ClassifiedJarSource {
    dir: PathBuf,
}

impl ClassifiedJarSource {
    /// Source over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn classify_jar(path: PathBuf) -> Option<ArtifactFile> {
    let name = file_name_of(&path);
    let (jar, signed) = match name.strip_suffix(".asc") {
        Some(jar) => (jar, true),
        None => (name.as_str(), false),
    };
    if !jar.ends_with(".jar") {
        return None;
    }

    let role = if jar.contains("javadoc") {
        ArtifactRole::Javadoc
    } else if jar.contains("sources") {
        ArtifactRole::Sources
    } else {
        log::debug!("ignoring {name}: neither a sources nor a javadoc jar");
        return None;
    };

    Some(if signed {
        ArtifactFile::new(path, ArtifactRole::Signature, "asc")
    } else {
        ArtifactFile::new(path, role, "jar")
    })
}

impl ArtifactSource for ClassifiedJarSource {
    fn describe(&self) -> String {
        format!("classified jars in {}", self.dir.display())
    }

    fn discover(&self) -> Box<dyn Iterator<Item = Result<ArtifactFile>> + Send + '_> {
        Box::new(scan(&self.dir).filter_map(|item| match item {
            Ok(path) => classify_jar(path).map(Ok),
            Err(e) => Some(Err(e)),
        }))
    }
}

/// Metadata descriptors (`<build>/publications/<name>`) and their signatures.
#[derive(Debug, Clone)]
pub struct DescriptorSource {
    dir: PathBuf,
}

impl DescriptorSource {
    /// Source over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn classify_descriptor(path: PathBuf) -> Option<ArtifactFile> {
    let name = file_name_of(&path);
    if name.ends_with(".asc") {
        Some(ArtifactFile::new(path, ArtifactRole::Signature, "asc"))
    } else if name.ends_with(".pom") || name.ends_with(".xml") {
        Some(ArtifactFile::new(path, ArtifactRole::Pom, "pom"))
    } else if name.ends_with(".module") || name.ends_with("module.json") {
        Some(ArtifactFile::new(path, ArtifactRole::Module, "module"))
    } else {
        log::debug!("ignoring {name}: not a descriptor");
        None
    }
}

impl ArtifactSource for DescriptorSource {
    fn describe(&self) -> String {
        format!("descriptors in {}", self.dir.display())
    }

    fn discover(&self) -> Box<dyn Iterator<Item = Result<ArtifactFile>> + Send + '_> {
        Box::new(scan(&self.dir).filter_map(|item| match item {
            Ok(path) => classify_descriptor(path).map(Ok),
            Err(e) => Some(Err(e)),
        }))
    }
}
