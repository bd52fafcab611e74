// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Covgate Fetch
//!
//! The resilient fetch engine for Codecov repository configuration.
//!
//! Given a [`RepoQuery`](covgate_core::RepoQuery) and an
//! [`ApiToken`](covgate_core::ApiToken), the engine issues
//! `GET {base}/api/v2/{service}/{owner}/repos/{repo}/config/` and drives
//! transient failures through doubling backoff:
//!
//! - [`error`] - the error taxonomy whose tags drive retry decisions
//! - [`client`] - redirect-surfacing HTTP client and single-attempt fetcher
//! - [`gate`] - optional shared request pacing across invocations
//! - [`options`] - per-invocation tuning (budget, backoff, deadline)
//! - [`retry`] - the orchestrator and its backoff policy
//!
//! ## Example
//!
//! ```ignore
//! use covgate_core::{ApiToken, RepoQuery};
//! use covgate_fetch::{fetch_repo_config, ApiClient, FetchOptions};
//!
//! let token = ApiToken::new(std::env::var("CODECOV_API_V2_TOKEN")?)?;
//! let client = ApiClient::new("https://codecov.io".parse()?, token)?;
//! let query = RepoQuery::new("github", "acme", "widget")?;
//!
//! let config = fetch_repo_config(&client, &query, &FetchOptions::new()).await?;
//! println!("{}", config.upload_token);
//! ```

// Core modules
pub mod client;
pub mod error;
pub mod gate;
pub mod options;
pub mod retry;

mod classify;

// Re-export key types at crate root
pub use client::ApiClient;
pub use error::{ErrorKind, FetchError};
// Status codes appear in the public error variants
pub use reqwest::StatusCode;
pub use gate::RateGate;
pub use options::{
    FetchOptions, DEFAULT_BASE_BACKOFF, DEFAULT_MAX_RETRIES, DEFAULT_REDIRECT_SETTLE,
};
pub use retry::{fetch_repo_config, RetryPolicy};
