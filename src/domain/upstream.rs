//! Port to the third-party shortening provider.
//!
//! The trait is implemented by [`crate::infrastructure::upstream::TinyUrlProvider`]
//! and mocked in tests. Implementations report failures as [`UpstreamError`];
//! the shortener client decides what each failure means for the caller.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::FailureReason;

/// One create call sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLinkRequest {
    pub url: String,
    pub domain: String,
    /// `None` lets the provider auto-generate the alias.
    pub alias: Option<String>,
}

/// Link returned by a successful create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub short_url: String,
    pub alias: Option<String>,
}

/// Failure of a single provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The requested (or generated) alias is already taken.
    #[error("alias not available: {0}")]
    AliasConflict(String),

    #[error("provider rejected the request (code {code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("provider request timed out")]
    Timeout,

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// Maps the error onto the reason reported in degraded results.
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            UpstreamError::AliasConflict(_) => FailureReason::AliasConflict,
            UpstreamError::Rejected { .. } => FailureReason::UpstreamRejected,
            UpstreamError::Timeout => FailureReason::UpstreamTimeout,
            UpstreamError::Unavailable(_) => FailureReason::UpstreamUnavailable,
            UpstreamError::InvalidResponse(_) => FailureReason::InvalidResponse,
        }
    }
}

/// A shortening provider.
///
/// # Implementations
///
/// - [`crate::infrastructure::upstream::TinyUrlProvider`] - HTTP client for the TinyURL API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortenProvider: Send + Sync {
    /// Creates a short link.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::AliasConflict`] when the alias is taken, and the
    /// other variants for every other failure. Implementations should bound
    /// their own I/O, but callers must not rely on it.
    async fn create(&self, request: CreateLinkRequest) -> Result<CreatedLink, UpstreamError>;

    /// Short provider name for logs and health output.
    fn name(&self) -> &'static str;
}
