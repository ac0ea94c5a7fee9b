use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use hrms_application::TokenCache;
use hrms_core::AppResult;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-memory token cache for development and tests.
#[derive(Default)]
pub struct InMemoryTokenCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryTokenCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn set(&self, key: &str, value: &str, ttl_seconds: u32) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(u64::from(ttl_seconds)))
            .unwrap_or(now);

        self.entries.write().await.insert(
            key.to_owned(),
            CacheEntry {
                value: value.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            entries.remove(key);
        }

        Ok(None)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_reads_and_deletes() -> AppResult<()> {
        let cache = InMemoryTokenCache::new();
        cache.set("otp:abc", "digest", 300).await?;
        assert_eq!(cache.get("otp:abc").await?.as_deref(), Some("digest"));

        cache.delete("otp:abc").await?;
        assert_eq!(cache.get("otp:abc").await?, None);
        cache.delete("otp:abc").await?;
        Ok(())
    }

    #[tokio::test]
    async fn zero_ttl_is_not_stored() -> AppResult<()> {
        let cache = InMemoryTokenCache::new();
        cache.set("otp_token:x", "user", 0).await?;
        assert_eq!(cache.get("otp_token:x").await?, None);
        Ok(())
    }
}
