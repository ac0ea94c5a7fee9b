use std::collections::HashMap;

use async_trait::async_trait;
use hrms_application::{
    AttemptRecord, ThrottleDecision, ThrottlePolicy, ThrottleStore, evaluate_attempt,
};
use hrms_core::AppResult;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct StoredRecord {
    record: AttemptRecord,
    expires_at: f64,
}

/// Single-process throttle store. One mutex covers the whole
/// read-modify-write, so concurrent checks for a key are serialized.
#[derive(Default)]
pub struct InMemoryThrottleStore {
    records: Mutex<HashMap<String, StoredRecord>>,
}

impl InMemoryThrottleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThrottleStore for InMemoryThrottleStore {
    async fn check_and_record(
        &self,
        key: &str,
        now: f64,
        policy: &ThrottlePolicy,
    ) -> AppResult<ThrottleDecision> {
        let mut records = self.records.lock().await;
        records.retain(|_, stored| stored.expires_at > now);

        let current = records
            .get(key)
            .map(|stored| stored.record.clone())
            .unwrap_or_default();
        let evaluation = evaluate_attempt(current, now, policy);

        if let Some(record) = evaluation.updated {
            records.insert(
                key.to_owned(),
                StoredRecord {
                    record,
                    expires_at: now + f64::from(policy.record_ttl_seconds),
                },
            );
        }

        Ok(evaluation.decision)
    }
}
