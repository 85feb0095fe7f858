//! Upload client: one bundle, bounded retries.

use super::{
    Backoff, LinearBackoff, PublishingType, ReqwestTransport, RetryMode, Transport,
    UploadError, UploadFailure, UploadOutcome, UploadRequest,
    retry::DEFAULT_MAX_ATTEMPTS,
};
use crate::config::{Credentials, UploadSettings};
use std::path::Path;
use url::Url;

/// Uploads a bundle archive, retrying transient failures.
///
/// Attempts run strictly one after another: a failed attempt is logged,
/// followed by the backoff delay, then the next attempt. The last failure
/// is returned as an [`UploadError`].
///
/// # Examples
///
/// ```no_run
/// use central_portal_bundler::config::{Credentials, UploadSettings};
/// use central_portal_bundler::upload::{PublishingType, UploadClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = UploadClient::from_settings(&UploadSettings::default())?;
/// let creds = Credentials::Bearer { token: "token".into() };
/// let outcome = client
///     .upload(
///         std::path::Path::new("build/central-portal-upload.zip"),
///         &creds,
///         PublishingType::UserManaged,
///         "foo 1.0.0",
///     )
///     .await?;
/// println!("accepted after {} attempt(s)", outcome.attempts);
/// # Ok(())
/// # }
/// ```
pub struct UploadClient<T = ReqwestTransport> {
    transport: T,
    endpoint: Url,
    backoff: Box<dyn Backoff>,
    max_attempts: u32,
    retry_mode: RetryMode,
}

impl<T> std::fmt::Debug for UploadClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("max_attempts", &self.max_attempts)
            .field("retry_mode", &self.retry_mode)
            .finish_non_exhaustive()
    }
}

impl UploadClient<ReqwestTransport> {
    /// Production client configured from [`UploadSettings`].
    pub fn from_settings(settings: &UploadSettings) -> reqwest::Result<Self> {
        let transport = ReqwestTransport::new(settings.timeout())?;
        Ok(Self::new(transport, settings.endpoint().clone())
            .with_backoff(LinearBackoff::new(settings.backoff_base()))
            .with_max_attempts(settings.max_attempts())
            .with_retry_mode(settings.retry_mode()))
    }
}

impl<T: Transport> UploadClient<T> {
    /// Client with the default attempt budget, linear backoff and classified
    /// retries.
    pub fn new(transport: T, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
            backoff: Box::new(LinearBackoff::default()),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_mode: RetryMode::default(),
        }
    }

    /// Replaces the delay strategy.
    pub fn with_backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Box::new(backoff);
        self
    }

    /// Sets the attempt budget; values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets which failures are retried.
    pub fn with_retry_mode(mut self, retry_mode: RetryMode) -> Self {
        self.retry_mode = retry_mode;
        self
    }

    /// Upload endpoint without query parameters.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Endpoint with the `publishingType` and `name` query parameters.
    pub fn upload_url(&self, publishing_type: PublishingType, title: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("publishingType", publishing_type.as_str())
            .append_pair("name", title);
        url
    }

    /// Uploads `archive`.
    ///
    /// # Errors
    ///
    /// [`UploadError`] with the last failure once the attempt budget is spent
    /// or a non-retryable failure occurs.
    pub async fn upload(
        &self,
        archive: &Path,
        credentials: &Credentials,
        publishing_type: PublishingType,
        title: &str,
    ) -> Result<UploadOutcome, UploadError> {
        let request = UploadRequest {
            url: self.upload_url(publishing_type, title),
            authorization: credentials.authorization_header(),
            archive: archive.to_path_buf(),
        };

        log::info!(
            "Uploading {} to {} ({publishing_type})",
            archive.display(),
            self.endpoint
        );

        let mut attempt = 0;
        loop {
            attempt += 1;

            let failure = match self.transport.send(&request).await {
                Ok(response) if response.is_success() => {
                    log::info!("✓ Upload accepted (HTTP {}): {}", response.status, response.body);
                    return Ok(UploadOutcome::success(
                        attempt,
                        response.status,
                        response.body,
                    ));
                }
                Ok(response) => UploadFailure::from_status(response.status, response.body),
                Err(failure) => failure,
            };

            log::warn!(
                "Upload failed (attempt {attempt}/{}): {failure}",
                self.max_attempts
            );

            if attempt >= self.max_attempts {
                return Err(UploadError { attempts: attempt, failure });
            }
            if !self.retry_mode.should_retry(&failure) {
                log::warn!("Not retrying: another attempt cannot change this result");
                return Err(UploadError { attempts: attempt, failure });
            }

            let delay = self.backoff.delay(attempt);
            log::debug!("Waiting {delay:?} before attempt {}", attempt + 1);
            tokio::time::sleep(delay).await;
        }
    }
}
