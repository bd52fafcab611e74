//! Core error types for covgate.

use thiserror::Error;

/// Configuration-level failures, detected before any network activity.
#[derive(Debug, Error)]
pub enum CoreError {
    /// API credentials are missing or empty.
    #[error("Missing API token: credentials must be a non-empty bearer token")]
    MissingToken,

    /// A required query field is empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
