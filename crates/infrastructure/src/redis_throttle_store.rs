//! Redis-backed throttle store.

use async_trait::async_trait;
use hrms_application::{ThrottleDecision, ThrottlePolicy, ThrottleStore};
use hrms_core::{AppError, AppResult, NetworkErrorKind};
use redis::Script;

// Mirrors `evaluate_attempt`. Runs as one script so a read-modify-write
// cannot interleave with another request for the same key. Timestamps and
// durations are whole milliseconds: `cjson` keeps only 14 significant
// digits, which would round fractional epoch seconds.
const CHECK_AND_RECORD_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local max_attempts = tonumber(ARGV[3])
local lockout = tonumber(ARGV[4])
local ttl = tonumber(ARGV[5])

local attempts = {}
local locked_until = 0
local raw = redis.call('GET', key)
if raw then
  local record = cjson.decode(raw)
  attempts = record.attempts or {}
  locked_until = tonumber(record.locked_until) or 0
end

if now < locked_until then
  return {0, math.floor((locked_until - now) / 1000)}
end

local window_start = now - window
local recent = {}
for _, timestamp in ipairs(attempts) do
  if timestamp > window_start then
    table.insert(recent, timestamp)
  end
end

if #recent >= max_attempts then
  local record = cjson.encode({attempts = recent, locked_until = now + lockout})
  redis.call('SET', key, record, 'EX', ttl)
  return {0, math.floor(lockout / 1000)}
end

table.insert(recent, now)
redis.call('SET', key, cjson.encode({attempts = recent, locked_until = 0}), 'EX', ttl)
return {1, 0}
"#;

/// Redis implementation of the throttle store port.
#[derive(Clone)]
pub struct RedisThrottleStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisThrottleStore {
    /// Creates a store with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            return key.to_owned();
        }
        format!("{}:{key}", self.key_prefix)
    }
}

#[async_trait]
impl ThrottleStore for RedisThrottleStore {
    async fn check_and_record(
        &self,
        key: &str,
        now: f64,
        policy: &ThrottlePolicy,
    ) -> AppResult<ThrottleDecision> {
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| {
                AppError::network(
                    NetworkErrorKind::Cache,
                    format!("failed to connect to redis: {error}"),
                )
            })?;

        let (allowed, wait_seconds): (i64, i64) = Script::new(CHECK_AND_RECORD_SCRIPT)
            .key(self.key_for(key))
            .arg(epoch_millis(now))
            .arg(i64::from(policy.window_seconds) * 1_000)
            .arg(policy.max_attempts)
            .arg(i64::from(policy.lockout_seconds) * 1_000)
            .arg(policy.record_ttl_seconds.max(1))
            .invoke_async(&mut connection)
            .await
            .map_err(|error| {
                AppError::network(
                    NetworkErrorKind::Cache,
                    format!("failed to evaluate throttle script: {error}"),
                )
            })?;

        if allowed == 1 {
            return Ok(ThrottleDecision::Allow);
        }

        Ok(ThrottleDecision::Deny {
            wait_seconds: u64::try_from(wait_seconds).unwrap_or(0),
        })
    }
}

fn epoch_millis(seconds: f64) -> i64 {
    (seconds * 1_000.0).round() as i64
}
