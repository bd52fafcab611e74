//! Fetch error taxonomy and retry classification.

use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

use crate::classify;

// ============================================================================
// Fetch Error
// ============================================================================

/// Error type for configuration fetches.
///
/// The variant, not the message, drives the retry decision; see
/// [`FetchError::kind`] and [`FetchError::should_retry`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a transient 5xx status (502, 503, 504).
    #[error("Service temporarily unavailable (status {0})")]
    Unavailable(StatusCode),

    /// The API bounced an authenticated call to its HTML settings page,
    /// a documented server-side race surfacing as 302 or 307.
    #[error("API call redirected to the settings page (status {0})")]
    Redirected(StatusCode),

    /// Any other non-200 status.
    #[error("Unexpected API status: {0}")]
    UnexpectedStatus(StatusCode),

    /// The 200 body did not decode as repository configuration.
    #[error("Invalid configuration body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// The transport failed before a response was received.
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The caller's deadline elapsed before a result was produced.
    #[error("Fetch cancelled before completion")]
    Cancelled,
}

impl FetchError {
    /// Classification tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable(_) | Self::Redirected(_) => ErrorKind::Temporary,
            Self::UnexpectedStatus(_) | Self::InvalidBody(_) => ErrorKind::Fatal,
            Self::Network(source) if source.is_timeout() => ErrorKind::Timeout,
            Self::Network(_) => ErrorKind::NetworkFailure,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether another attempt may succeed.
    ///
    /// Temporary statuses always retry; transport failures retry only when
    /// the transport itself reports a timeout or a transient condition.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::Redirected(_) => true,
            Self::Network(source) => classify::is_transient_transport(source),
            Self::UnexpectedStatus(_) | Self::InvalidBody(_) | Self::Cancelled => false,
        }
    }
}

// ============================================================================
// Error Kind
// ============================================================================

/// Retry-relevant classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transient server-side condition; always retryable.
    Temporary,
    /// The transport reported a timeout; retryable.
    Timeout,
    /// Permanent failure; never retried.
    Fatal,
    /// Transport-level failure without a response.
    NetworkFailure,
    /// The invocation was cancelled by the caller's deadline.
    Cancelled,
}

impl ErrorKind {
    /// Stable lowercase name, used in CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temporary => "temporary",
            Self::Timeout => "timeout",
            Self::Fatal => "fatal",
            Self::NetworkFailure => "network",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
