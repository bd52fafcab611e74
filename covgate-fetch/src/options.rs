//! Per-invocation tuning for a configuration fetch.

use std::sync::Arc;
use std::time::Duration;

use crate::gate::RateGate;

/// Default retry budget after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 6;

/// Default initial backoff; doubles after every failed attempt.
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Default settle delay applied after a redirect bounce.
pub const DEFAULT_REDIRECT_SETTLE: Duration = Duration::from_secs(1);

/// Tuning for one [`fetch_repo_config`](crate::fetch_repo_config) call.
///
/// Every invocation carries its own copy instead of reading process-wide
/// knobs, so concurrent fetches stay independently testable. The rate
/// gate is the only shared piece.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Retries allowed after the first attempt (total attempts = this + 1).
    pub max_retries: u32,
    /// Initial backoff; doubles after every failed attempt, uncapped.
    pub base_backoff: Duration,
    /// Extra settle delay after a redirect bounce, on top of backoff.
    pub redirect_settle: Duration,
    /// Shared request pacing; `None` proceeds immediately.
    pub rate_gate: Option<Arc<RateGate>>,
    /// Overall deadline; expiry aborts with
    /// [`FetchError::Cancelled`](crate::FetchError::Cancelled).
    pub deadline: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchOptions {
    /// Options with production defaults and no gate or deadline.
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: DEFAULT_BASE_BACKOFF,
            redirect_settle: DEFAULT_REDIRECT_SETTLE,
            rate_gate: None,
            deadline: None,
        }
    }

    /// Sets the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial backoff.
    pub fn with_base_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    /// Sets the settle delay applied after a redirect bounce.
    pub fn with_redirect_settle(mut self, redirect_settle: Duration) -> Self {
        self.redirect_settle = redirect_settle;
        self
    }

    /// Shares a rate gate with this invocation.
    pub fn with_rate_gate(mut self, gate: Arc<RateGate>) -> Self {
        self.rate_gate = Some(gate);
        self
    }

    /// Bounds the whole invocation, including gate waits and sleeps.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
