//! Bounded retry with doubling backoff around the single-attempt fetcher.

use std::time::Duration;

use covgate_core::{RepoConfig, RepoQuery};
use tracing::{debug, instrument, warn};

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::options::FetchOptions;

// ============================================================================
// Retry Policy
// ============================================================================

/// Pure backoff arithmetic for the orchestrator.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Initial backoff; doubles after every failed attempt.
    pub base_backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(max_retries: u32, base_backoff: Duration) -> Self {
        Self {
            max_retries,
            base_backoff,
        }
    }

    /// Backoff to sleep after the given number of failed attempts.
    ///
    /// Strictly doubling with no jitter and no cap; saturating arithmetic
    /// keeps pathological budgets from overflowing.
    pub fn backoff_for(&self, failed_attempts: u32) -> Duration {
        let doublings = failed_attempts.saturating_sub(1);
        self.base_backoff
            .saturating_mul(2u32.saturating_pow(doublings))
    }

    /// Whether a further attempt is allowed after `failed_attempts`.
    pub fn allows_retry(&self, failed_attempts: u32) -> bool {
        failed_attempts <= self.max_retries
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Fetches repository configuration, retrying transient failures.
///
/// Drives the single-attempt fetcher under `options`: waits on the rate
/// gate before each attempt, classifies failures, sleeps the doubling
/// backoff between retryable attempts, and gives up after
/// `max_retries + 1` total attempts or on the first non-retryable error.
///
/// # Errors
///
/// The last classified error on abort or exhaustion, or
/// [`FetchError::Cancelled`] when the configured deadline elapses first.
#[instrument(skip(client, query, options), fields(repo = %query))]
pub async fn fetch_repo_config(
    client: &ApiClient,
    query: &RepoQuery,
    options: &FetchOptions,
) -> Result<RepoConfig, FetchError> {
    match options.deadline {
        Some(limit) => tokio::time::timeout(limit, run_attempts(client, query, options))
            .await
            .map_err(|_| FetchError::Cancelled)?,
        None => run_attempts(client, query, options).await,
    }
}

async fn run_attempts(
    client: &ApiClient,
    query: &RepoQuery,
    options: &FetchOptions,
) -> Result<RepoConfig, FetchError> {
    let policy = RetryPolicy::new(options.max_retries, options.base_backoff);
    let mut failed_attempts: u32 = 0;

    loop {
        if let Some(gate) = options.rate_gate.as_deref() {
            gate.acquire().await;
        }

        let attempt = failed_attempts + 1;
        debug!(attempt, "Attempting configuration fetch");

        let err = match client
            .fetch_config_once(query, options.redirect_settle)
            .await
        {
            Ok(config) => {
                debug!(attempt, "Configuration fetch succeeded");
                return Ok(config);
            }
            Err(err) => err,
        };

        failed_attempts = attempt;
        if !err.should_retry() {
            warn!(attempt, kind = %err.kind(), error = %err, "Aborting: error is not retryable");
            return Err(err);
        }
        if !policy.allows_retry(failed_attempts) {
            warn!(attempt, kind = %err.kind(), error = %err, "Retry budget exhausted");
            return Err(err);
        }

        let backoff = policy.backoff_for(failed_attempts);
        debug!(attempt, backoff = ?backoff, kind = %err.kind(), "Backing off before next attempt");
        tokio::time::sleep(backoff).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_from_base() {
        let policy = RetryPolicy::new(6, Duration::from_secs(1));
        assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(4));
        assert_eq!(policy.backoff_for(6), Duration::from_secs(32));
    }

    #[test]
    fn test_backoff_has_no_cap_and_saturates() {
        let policy = RetryPolicy::new(64, Duration::from_secs(1));
        assert_eq!(policy.backoff_for(11), Duration::from_secs(1024));
        // Far past any realistic budget the arithmetic saturates instead
        // of panicking.
        assert!(policy.backoff_for(64) > Duration::from_secs(1024));
    }

    #[test]
    fn test_retry_budget_boundary() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(3));
        assert!(!policy.allows_retry(4));
    }
}
