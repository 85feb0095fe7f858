//! `bundle`: write the archive without uploading it.

use super::RunReport;
use crate::bundler::{BundledArchive, Bundler};
use crate::cli::RuntimeConfig;
use crate::config::Settings;
use crate::error::Result;

/// Assembles the archive and reports it.
pub async fn execute(settings: Settings, runtime: &RuntimeConfig) -> Result<i32> {
    let archive = assemble(settings, runtime).await?;

    if runtime.json() {
        RunReport {
            archive,
            upload: None,
        }
        .print()?;
    }
    Ok(0)
}

/// Runs the bundler and prints the progress lines shared by both commands.
pub(super) async fn assemble(settings: Settings, runtime: &RuntimeConfig) -> Result<BundledArchive> {
    let output = runtime.output();
    output.section(&format!("Bundling {}", settings.coordinates()))?;
    output.verbose(&format!(
        "   Reading {}, {} and {}",
        settings.binary_output_dir().display(),
        settings.classified_jar_dir().display(),
        settings.descriptor_dir().display()
    ))?;

    let archive = Bundler::new(settings).bundle().await?;

    output.success(&format!(
        "Archive written: {} ({} bytes)",
        archive.path.display(),
        archive.size
    ))?;
    for entry in &archive.entries {
        output.verbose(&format!("   {entry}"))?;
    }
    if archive.entries.is_empty() {
        output.warn("The archive is empty; check the build directory")?;
    }
    Ok(archive)
}
