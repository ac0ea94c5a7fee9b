use async_trait::async_trait;

use hrms_core::AppResult;

use super::config::ThrottlePolicy;
use super::policy::ThrottleDecision;

/// Shared store of attempt records.
#[async_trait]
pub trait ThrottleStore: Send + Sync {
    /// Loads the record under `key`, evaluates one attempt at `now` (epoch
    /// seconds) and writes the result back with the policy TTL.
    ///
    /// Implementations must perform the whole read-modify-write atomically
    /// so concurrent requests for one identity cannot lose attempts.
    async fn check_and_record(
        &self,
        key: &str,
        now: f64,
        policy: &ThrottlePolicy,
    ) -> AppResult<ThrottleDecision>;
}
