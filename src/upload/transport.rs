//! HTTP exchange for a single upload attempt.

use super::UploadFailure;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::io::ReaderStream;
use url::Url;

/// Everything needed to send the bundle once.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Endpoint including `publishingType` and `name` query parameters.
    pub url: Url,
    /// `Authorization` header value.
    pub authorization: String,
    /// Archive sent as the `bundle` form field.
    pub archive: PathBuf,
}

impl UploadRequest {
    /// File name advertised for the `bundle` part.
    pub fn file_name(&self) -> String {
        self.archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bundle.zip".to_string())
    }
}

/// Status and body of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one attempt of the upload.
///
/// Returns `Ok` for any received response, whatever its status; `Err` only
/// when no response arrived or the archive could not be read.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Performs one multipart POST.
    async fn send(&self, request: &UploadRequest) -> Result<TransportResponse, UploadFailure>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client })
    }

    async fn bundle_part(path: &Path, file_name: String) -> Result<Part, UploadFailure> {
        let archive_error = |e: std::io::Error| UploadFailure::Archive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let file = tokio::fs::File::open(path).await.map_err(archive_error)?;
        let length = file.metadata().await.map_err(archive_error)?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        Part::stream_with_length(body, length)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| UploadFailure::from_transport(&e))
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &UploadRequest) -> Result<TransportResponse, UploadFailure> {
        // Forms are consumed on send, so the archive is re-opened per attempt.
        let part = Self::bundle_part(&request.archive, request.file_name()).await?;
        let form = Form::new().part("bundle", part);

        let response = self
            .client
            .post(request.url.clone())
            .header(reqwest::header::AUTHORIZATION, &request.authorization)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadFailure::from_transport(&e))?;

        // The status alone decides the outcome.
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_else(|e| {
            log::warn!("HTTP {status} response body could not be read: {e}");
            String::new()
        });

        Ok(TransportResponse { status, body })
    }
}
