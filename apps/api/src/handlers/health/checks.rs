use redis::AsyncCommands;

use crate::dto::HealthDependencyStatus;

use super::{failed, healthy};

pub(super) async fn check_postgres(pool: sqlx::PgPool) -> HealthDependencyStatus {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&pool).await {
        Ok(_) => healthy(),
        Err(error) => failed(format!("postgres check failed: {error}")),
    }
}

pub(super) async fn check_redis(redis_client: redis::Client) -> HealthDependencyStatus {
    let mut connection = match redis_client.get_multiplexed_async_connection().await {
        Ok(connection) => connection,
        Err(error) => return failed(format!("redis connection failed: {error}")),
    };

    match connection.ping::<String>().await {
        Ok(value) if value.eq_ignore_ascii_case("pong") => healthy(),
        Ok(value) => failed(format!("unexpected redis ping response: {value}")),
        Err(error) => failed(format!("redis ping failed: {error}")),
    }
}
