//! Upload settings.

use crate::upload::{
    DEFAULT_ENDPOINT, PublishingType, RetryMode,
    retry::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS},
};
use std::time::Duration;
use url::Url;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// How the bundle is sent to the publishing API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub(super) endpoint: Url,
    pub(super) publishing_type: PublishingType,
    pub(super) title: Option<String>,
    pub(super) timeout: Duration,
    pub(super) max_attempts: u32,
    pub(super) backoff_base: Duration,
    pub(super) retry_mode: RetryMode,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            publishing_type: PublishingType::default(),
            title: None,
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
            retry_mode: RetryMode::default(),
        }
    }
}

impl UploadSettings {
    /// Upload endpoint without query parameters.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Publishing mode sent as `publishingType`.
    pub fn publishing_type(&self) -> PublishingType {
        self.publishing_type
    }

    /// Explicit deployment title, if configured.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Linear backoff unit.
    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Which failures are retried.
    pub fn retry_mode(&self) -> RetryMode {
        self.retry_mode
    }
}
