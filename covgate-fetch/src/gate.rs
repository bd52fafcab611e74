//! Client-side request pacing shared across concurrent fetches.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// A shared periodic permit for outbound API requests.
///
/// One permit becomes available per period; [`acquire`](Self::acquire)
/// suspends until the next one. The ticker sits behind an async mutex so
/// each tick is granted to exactly one caller, and missed ticks are
/// skipped rather than bursting. Wrap in an [`Arc`](std::sync::Arc) to
/// share one gate across concurrent fetch invocations.
#[derive(Debug)]
pub struct RateGate {
    ticker: Mutex<Interval>,
    period: Duration,
}

impl RateGate {
    /// Creates a gate releasing one permit per `period`, the first one a
    /// full period after creation.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "rate gate period must be non-zero");
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            ticker: Mutex::new(ticker),
            period,
        }
    }

    /// Waits for the next permit.
    pub async fn acquire(&self) {
        let mut ticker = self.ticker.lock().await;
        ticker.tick().await;
    }

    /// The configured pacing period.
    pub fn period(&self) -> Duration {
        self.period
    }
}
