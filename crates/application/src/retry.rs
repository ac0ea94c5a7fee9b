//! Bounded exponential-backoff retries for transient network failures.

use std::future::Future;
use std::time::Duration;

use hrms_core::{AppResult, NetworkErrorKind};
use tracing::warn;

/// Retry configuration for one class of outbound calls.
///
/// The delay before retry `n` (1-based) is `multiplier * 2^(n-1)` clamped to
/// `[min_delay, max_delay]`. Only network errors whose kind is listed in
/// `retry_on` are retried; any other error is returned immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    multiplier: Duration,
    min_delay: Duration,
    max_delay: Duration,
    retry_on: &'static [NetworkErrorKind],
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` counts the first call and is at least one.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        multiplier: Duration,
        min_delay: Duration,
        max_delay: Duration,
        retry_on: &'static [NetworkErrorKind],
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            multiplier,
            min_delay,
            max_delay: max_delay.max(min_delay),
            retry_on,
        }
    }

    /// Cache and socket calls: 3 attempts, 1s..5s, every network kind.
    #[must_use]
    pub fn network() -> Self {
        Self::new(
            3,
            Duration::from_secs(1),
            Duration::from_secs(1),
            Duration::from_secs(5),
            &NetworkErrorKind::ALL,
        )
    }

    /// Outbound email: 3 attempts, 2s..10s, SMTP failures only.
    #[must_use]
    pub fn email() -> Self {
        Self::new(
            3,
            Duration::from_secs(2),
            Duration::from_secs(2),
            Duration::from_secs(10),
            &[NetworkErrorKind::Email],
        )
    }

    /// Returns the total number of attempts.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay slept before retry number `retry` (1-based).
    #[must_use]
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        let factor = 1_u32
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.multiplier
            .saturating_mul(factor)
            .clamp(self.min_delay, self.max_delay)
    }

    fn should_retry(&self, kind: Option<NetworkErrorKind>) -> bool {
        kind.is_some_and(|kind| self.retry_on.contains(&kind))
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt budget is spent. The last error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_attempts || !self.should_retry(error.network_kind()) {
                        return Err(error);
                    }

                    let delay = self.delay_before_retry(attempt);
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
