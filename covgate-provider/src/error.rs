//! Error types for the provider layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving settings or reading a data source.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration-level failure from the core layer.
    #[error(transparent)]
    Core(#[from] covgate_core::CoreError),

    /// Classified failure from the fetch engine.
    #[error(transparent)]
    Fetch(#[from] covgate_fetch::FetchError),

    /// The endpoint base could not be parsed as a URL.
    #[error("Invalid endpoint base {url:?}: {source}")]
    InvalidEndpoint {
        /// The rejected value.
        url: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The API call interval is not a usable number of seconds.
    #[error("Invalid API interval {0}: must be a finite, non-negative number of seconds")]
    InvalidInterval(f64),

    /// The settings file could not be read or written.
    #[error("Could not access settings file {}: {source}", path.display())]
    SettingsIo {
        /// Settings file path.
        path: PathBuf,
        /// Underlying io failure.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("Invalid settings file {}: {source}", path.display())]
    SettingsFormat {
        /// Settings file path.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// No data source is registered under the requested name.
    #[error("Unknown data source: {0}")]
    UnknownSource(String),
}
