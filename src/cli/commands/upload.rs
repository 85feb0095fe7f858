//! `upload`: write the archive, then send it to the publisher API.

use super::{RunReport, bundle::assemble};
use crate::cli::{RuntimeConfig, UploadArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::upload::UploadClient;

/// Resolves credentials, assembles the archive and uploads it.
///
/// Credentials are resolved first so a missing secret fails before anything
/// is written.
pub async fn execute(settings: Settings, args: &UploadArgs, runtime: &RuntimeConfig) -> Result<i32> {
    let credentials = args.credentials()?;
    let client = UploadClient::from_settings(settings.upload())?;
    let publishing_type = settings.upload().publishing_type();
    let title = settings.title();

    let archive = assemble(settings, runtime).await?;

    let output = runtime.output();
    output.progress(&format!(
        "Uploading \"{title}\" ({publishing_type}) to {}",
        client.endpoint()
    ))?;

    match client
        .upload(&archive.path, &credentials, publishing_type, &title)
        .await
    {
        Ok(outcome) => {
            output.success(&format!(
                "Upload accepted after {} attempt(s)",
                outcome.attempts
            ))?;
            if let Some(body) = outcome.body.as_deref().filter(|b| !b.is_empty()) {
                output.indent(&format!("Deployment: {body}"))?;
            }
            if runtime.json() {
                RunReport {
                    archive,
                    upload: Some(outcome),
                }
                .print()?;
            }
            Ok(0)
        }
        Err(e) => {
            if runtime.json() {
                RunReport {
                    archive,
                    upload: Some(e.outcome()),
                }
                .print()?;
            }
            Err(e.into())
        }
    }
}
