//! Redis-backed token cache for login challenges.

use async_trait::async_trait;
use hrms_application::TokenCache;
use hrms_core::{AppError, AppResult, NetworkErrorKind};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

/// Redis implementation of the token cache port.
#[derive(Clone)]
pub struct RedisTokenCache {
    client: redis::Client,
}

impl RedisTokenCache {
    /// Creates a cache adapter with a configured Redis client.
    #[must_use]
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| cache_error("failed to connect to redis", error))
    }
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn set(&self, key: &str, value: &str, ttl_seconds: u32) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let mut connection = self.connection().await?;
        connection
            .set_ex::<_, _, ()>(key, value, u64::from(ttl_seconds))
            .await
            .map_err(|error| cache_error("failed to write cache entry", error))
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut connection = self.connection().await?;
        connection
            .get(key)
            .await
            .map_err(|error| cache_error("failed to read cache entry", error))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut connection = self.connection().await?;
        connection
            .del::<_, ()>(key)
            .await
            .map_err(|error| cache_error("failed to delete cache entry", error))
    }
}

fn cache_error(context: &str, error: redis::RedisError) -> AppError {
    AppError::network(NetworkErrorKind::Cache, format!("{context}: {error}"))
}
