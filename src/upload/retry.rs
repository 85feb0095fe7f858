//! Retry classification and backoff strategies.

use super::UploadFailure;
use std::time::Duration;

/// Default delay unit for [`LinearBackoff`].
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(2);

/// Default attempt budget.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Which failures are worth another attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryMode {
    /// Retry server, rate-limit and transport failures only. Authentication
    /// and validation failures end the run immediately.
    #[default]
    Classified,
    /// Retry every non-2xx response and transport failure alike.
    Uniform,
}

impl RetryMode {
    /// Whether `failure` should be followed by another attempt.
    pub fn should_retry(self, failure: &UploadFailure) -> bool {
        match self {
            Self::Classified => failure.is_retryable(),
            Self::Uniform => !matches!(failure, UploadFailure::Archive { .. }),
        }
    }
}

/// Delay to wait after a failed attempt.
///
/// Implemented for [`LinearBackoff`] and for any `Fn(u32) -> Duration`, so
/// tests can pass `|_| Duration::ZERO`.
pub trait Backoff: Send + Sync {
    /// Delay after failed attempt number `attempt` (1-based).
    fn delay(&self, attempt: u32) -> Duration;
}

impl<F> Backoff for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn delay(&self, attempt: u32) -> Duration {
        self(attempt)
    }
}

/// `base * attempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoff {
    base: Duration,
}

impl LinearBackoff {
    /// Backoff growing by `base` per attempt.
    pub fn new(base: Duration) -> Self {
        Self { base }
    }
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_BACKOFF_BASE)
    }
}

impl Backoff for LinearBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(attempt)
    }
}
