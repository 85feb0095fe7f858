//! Command line interface for the Central Portal bundler.
//!
//! This module provides argument parsing, command execution and user
//! feedback for the `bundle` and `upload` subcommands.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig, UploadArgs};
pub use output::{ColorMode, OutputManager};

use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime = RuntimeConfig::from(&args);
    let settings = args.settings()?;
    log::debug!("Resolved settings: {settings:?}");

    match &args.command {
        Command::Bundle => commands::bundle(settings, &runtime).await,
        Command::Upload(upload) => commands::upload(settings, upload, &runtime).await,
    }
}
