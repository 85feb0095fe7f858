//! Command execution for the `bundle` and `upload` subcommands.

mod bundle;
mod upload;

pub use bundle::execute as bundle;
pub use upload::execute as upload;

use crate::bundler::BundledArchive;
use crate::upload::UploadOutcome;

/// Machine-readable summary printed with `--json`.
#[derive(Debug, serde::Serialize)]
pub struct RunReport {
    /// The written archive.
    pub archive: BundledArchive,
    /// Upload result, absent for `bundle`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadOutcome>,
}

impl RunReport {
    /// Prints the report as pretty JSON on stdout.
    pub fn print(&self) -> crate::error::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}
