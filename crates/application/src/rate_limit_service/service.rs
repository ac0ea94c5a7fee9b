use std::sync::Arc;

use hrms_core::{AppError, AppResult};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::retry::RetryPolicy;

use super::config::ThrottlePolicy;
use super::policy::ThrottleDecision;
use super::ports::ThrottleStore;

/// Application service for request throttling.
#[derive(Clone)]
pub struct RateLimitService {
    store: Arc<dyn ThrottleStore>,
    clock: Arc<dyn Clock>,
    retry_policy: RetryPolicy,
}

impl RateLimitService {
    /// Creates a throttling service using the wall clock and network retries.
    #[must_use]
    pub fn new(store: Arc<dyn ThrottleStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            retry_policy: RetryPolicy::network(),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the retry policy wrapped around store calls.
    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Checks and records one attempt for an identity.
    ///
    /// Without an identity key the request is allowed and nothing is stored.
    /// Store failures are retried, then surfaced; they never turn into an
    /// allow or a deny.
    pub async fn check(
        &self,
        policy: &ThrottlePolicy,
        identity_key: Option<&str>,
    ) -> AppResult<ThrottleDecision> {
        let Some(identity_key) = identity_key else {
            debug!(scope = policy.scope.as_str(), "no throttle identity, allowing");
            return Ok(ThrottleDecision::Allow);
        };

        let key = policy.cache_key(identity_key);
        let now = epoch_seconds(self.clock.as_ref());
        let decision = self
            .retry_policy
            .run("throttle_check", || {
                self.store.check_and_record(key.as_str(), now, policy)
            })
            .await?;

        if let ThrottleDecision::Deny { wait_seconds } = decision {
            warn!(
                scope = policy.scope.as_str(),
                identity = identity_key,
                wait_seconds,
                "request throttled"
            );
        }

        Ok(decision)
    }

    /// Like [`Self::check`], but turns a denial into `AppError::RateLimited`.
    pub async fn enforce(&self, policy: &ThrottlePolicy, identity_key: Option<&str>) -> AppResult<()> {
        match self.check(policy, identity_key).await? {
            ThrottleDecision::Allow => Ok(()),
            ThrottleDecision::Deny { wait_seconds } => Err(AppError::RateLimited { wait_seconds }),
        }
    }
}

fn epoch_seconds(clock: &dyn Clock) -> f64 {
    clock.now().timestamp_micros() as f64 / 1_000_000.0
}
