//! Command line argument parsing and validation.
//!
//! Flags override the project file (`central-portal.toml`), which in turn
//! overrides the built-in defaults.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::ColorMode;
use crate::bundler::{CollisionPolicy, SignatureFallback};
use crate::config::{
    Credentials, DEFAULT_CREDENTIALS_FILE, DEFAULT_PROJECT_FILE, ProjectFile,
    Settings, SettingsBuilder,
};
use crate::error::Result;
use crate::upload::{PublishingType, RetryMode};

/// Bundles release artifacts for the Central Portal and uploads them
#[derive(Parser, Debug)]
#[command(
    name = "central_portal_bundler",
    version,
    about = "Bundles release artifacts for the Central Portal and uploads them",
    long_about = "Collects a library's release artifacts (binary, sources and javadoc jars, \
POM and module descriptors, detached signatures) from the build directory, stages them under \
canonical repository names with .md5/.sha1 checksums, zips them under \
<group>/<artifact>/<version>/ and uploads the archive to the Central Portal publisher API.

Usage:
  central_portal_bundler --group-id io.github.someone --artifact-id lib --artifact-version 1.0.0 bundle
  central_portal_bundler upload --publishing-type AUTOMATIC

Exit code 0 = archive written (and accepted by the portal for `upload`)."
)]
pub struct Args {
    /// Project file; defaults to ./central-portal.toml when present
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Build output root
    #[arg(long, global = true, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Group id, e.g. io.github.someone
    #[arg(long, global = true)]
    pub group_id: Option<String>,

    /// Artifact id
    #[arg(long, global = true)]
    pub artifact_id: Option<String>,

    /// Version to publish
    #[arg(long, global = true, value_name = "VERSION")]
    pub artifact_version: Option<String>,

    /// Build component whose outputs are bundled, e.g. prodRelease
    #[arg(long, global = true)]
    pub component_name: Option<String>,

    /// Flavor marker in binary output names, e.g. prod-release
    #[arg(long, global = true)]
    pub flavor_name: Option<String>,

    /// Extension of the primary binary
    #[arg(long, global = true, value_name = "EXT")]
    pub binary_extension: Option<String>,

    /// Publication whose descriptors are bundled
    #[arg(long, global = true)]
    pub publication_name: Option<String>,

    /// Staging directory (erased at the start of every run)
    #[arg(long, global = true, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Archive path
    #[arg(short = 'o', long, global = true, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Target assumed for a .asc file that names no known artifact: pom, module, main, reject
    #[arg(long, global = true, value_name = "TARGET")]
    pub signature_fallback: Option<SignatureFallback>,

    /// Reaction to two files with the same published name: fail, warn
    #[arg(long, global = true, value_name = "POLICY")]
    pub collision_policy: Option<CollisionPolicy>,

    /// Print a JSON summary on stdout instead of progress lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Print per-file details
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub verbose: bool,

    /// Color progress lines: auto, always, never
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the collected artifacts.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the bundle archive without uploading it
    Bundle,
    /// Write the bundle archive and upload it
    Upload(UploadArgs),
}

/// Upload options.
#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// USER_MANAGED (default) or AUTOMATIC
    #[arg(long, value_name = "TYPE")]
    pub publishing_type: Option<String>,

    /// Deployment title shown in the portal
    #[arg(long)]
    pub name: Option<String>,

    /// Portal user token name
    #[arg(long, env = "CENTRAL_PORTAL_USERNAME")]
    pub username: Option<String>,

    /// Portal user token secret
    #[arg(long, env = "CENTRAL_PORTAL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Bearer token, used when no username/password pair is given
    #[arg(long, env = "CENTRAL_PORTAL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Local, non-versioned credentials file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CREDENTIALS_FILE)]
    pub credentials: PathBuf,

    /// Upload endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Attempt budget
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Linear backoff unit in seconds
    #[arg(long, value_name = "SECS")]
    pub backoff_secs: Option<u64>,

    /// Retry every failure, including rejected credentials and bundles
    #[arg(long)]
    pub retry_all: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Command::Upload(upload) = &self.command {
            if upload.max_attempts == Some(0) {
                return Err("--max-attempts must be at least 1".to_string());
            }
            if upload.timeout_secs == Some(0) {
                return Err("--timeout-secs must be greater than zero".to_string());
            }
        }
        Ok(())
    }

    /// Loads the project file and applies the command line overrides.
    ///
    /// An explicitly named project file must exist; the default one is
    /// optional.
    pub fn settings(&self) -> Result<Settings> {
        let mut builder = self.project_file()?;

        if let Some(v) = &self.build_dir {
            builder = builder.build_dir(v);
        }
        if let Some(v) = &self.group_id {
            builder = builder.group_id(v);
        }
        if let Some(v) = &self.artifact_id {
            builder = builder.artifact_id(v);
        }
        if let Some(v) = &self.artifact_version {
            builder = builder.version(v);
        }
        if let Some(v) = &self.component_name {
            builder = builder.component_name(v);
        }
        if let Some(v) = &self.flavor_name {
            builder = builder.flavor_name(v);
        }
        if let Some(v) = &self.binary_extension {
            builder = builder.binary_extension(v);
        }
        if let Some(v) = &self.publication_name {
            builder = builder.publication_name(v);
        }
        if let Some(v) = &self.staging_dir {
            builder = builder.staging_dir(v);
        }
        if let Some(v) = &self.output {
            builder = builder.output_archive(v);
        }
        if let Some(v) = self.signature_fallback {
            builder = builder.signature_fallback(v);
        }
        if let Some(v) = self.collision_policy {
            builder = builder.collision_policy(v);
        }

        if let Command::Upload(upload) = &self.command {
            builder = upload.apply(builder);
        }

        Ok(builder.build()?)
    }

    fn project_file(&self) -> Result<SettingsBuilder> {
        let (path, required) = match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_PROJECT_FILE), false),
        };

        if !required && !path.is_file() {
            log::debug!("No {DEFAULT_PROJECT_FILE} found, using flags and defaults");
            return Ok(SettingsBuilder::new());
        }

        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        log::debug!("Loading project file {}", path.display());
        Ok(ProjectFile::load(&path)?.into_builder(&base_dir))
    }
}

impl UploadArgs {
    fn apply(&self, mut builder: SettingsBuilder) -> SettingsBuilder {
        if let Some(v) = &self.publishing_type {
            builder = builder.publishing_type(PublishingType::parse_from(Some(v.as_str())));
        }
        if let Some(v) = &self.name {
            builder = builder.title(v);
        }
        if let Some(v) = &self.endpoint {
            builder = builder.endpoint(v);
        }
        if let Some(v) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(v));
        }
        if let Some(v) = self.max_attempts {
            builder = builder.max_attempts(v);
        }
        if let Some(v) = self.backoff_secs {
            builder = builder.backoff_base(Duration::from_secs(v));
        }
        if self.retry_all {
            builder = builder.retry_mode(RetryMode::Uniform);
        }
        builder
    }

    /// Resolves credentials from flags, environment and the local file.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::resolve(
            self.username.clone(),
            self.password.clone(),
            self.token.clone(),
            &self.credentials,
        )?)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    json: bool,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.json, args.color),
            json: args.json,
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Whether a JSON summary is requested
    pub fn json(&self) -> bool {
        self.json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("central_portal_bundler").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_build_settings_without_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = parse(&[
            "--group-id",
            "com.example",
            "--artifact-id",
            "foo",
            "--artifact-version",
            "1.0.0",
            "--build-dir",
            dir.path().to_str().unwrap(),
            "bundle",
        ]);
        let settings = args.settings().unwrap();
        assert_eq!(settings.coordinates().base_name(), "foo-1.0.0");
        assert_eq!(settings.staging_dir(), dir.path().join("central-portal-bundle"));
    }

    #[test]
    fn explicit_project_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let args = parse(&[
            "--config",
            dir.path().join("absent.toml").to_str().unwrap(),
            "bundle",
        ]);
        assert!(args.settings().is_err());
    }

    #[test]
    fn flags_override_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("central-portal.toml");
        std::fs::write(
            &config,
            "group_id = \"com.example\"\nartifact_id = \"foo\"\nversion = \"1.0.0\"\n",
        )
        .unwrap();

        let args = parse(&[
            "--config",
            config.to_str().unwrap(),
            "upload",
            "--artifact-version",
            "2.0.0",
            "--publishing-type",
            "automatic",
            "--max-attempts",
            "2",
            "--retry-all",
        ]);
        let settings = args.settings().unwrap();

        assert_eq!(settings.coordinates().version(), "2.0.0");
        assert_eq!(settings.upload().publishing_type(), PublishingType::Automatic);
        assert_eq!(settings.upload().max_attempts(), 2);
        assert_eq!(settings.upload().retry_mode(), RetryMode::Uniform);
        assert_eq!(settings.staging_dir(), dir.path().join("build/central-portal-bundle"));
    }

    #[test]
    fn zero_attempts_are_rejected() {
        let args = parse(&["upload", "--max-attempts", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn policies_parse_from_flags() {
        let args = parse(&[
            "--signature-fallback",
            "reject",
            "--collision-policy",
            "warn",
            "bundle",
        ]);
        assert_eq!(args.signature_fallback, Some(SignatureFallback::Reject));
        assert_eq!(args.collision_policy, Some(CollisionPolicy::Warn));
    }
}
