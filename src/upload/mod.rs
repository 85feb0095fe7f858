//! Bundle upload to the publishing API.
//!
//! The [`UploadClient`] sends the archive as a multipart form through a
//! [`Transport`], classifies each failed attempt as an [`UploadFailure`] and
//! retries the transient ones according to its [`RetryMode`] and
//! [`Backoff`].
//!
//! # Module Organization
//!
//! - [`client`] - Attempt loop and outcome reporting
//! - [`failure`] - Failure taxonomy, terminal error and outcome
//! - [`publishing`] - Publishing modes
//! - [`retry`] - Retry classification and backoff strategies
//! - [`transport`] - Single HTTP exchange (`reqwest` in production)

pub mod client;
pub mod failure;
pub mod publishing;
pub mod retry;
pub mod transport;

pub use client::UploadClient;
pub use failure::{UploadError, UploadFailure, UploadOutcome};
pub use publishing::PublishingType;
pub use retry::{Backoff, LinearBackoff, RetryMode};
pub use transport::{ReqwestTransport, Transport, TransportResponse, UploadRequest};

/// Default upload endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://central.sonatype.com/api/v1/publisher/upload";
