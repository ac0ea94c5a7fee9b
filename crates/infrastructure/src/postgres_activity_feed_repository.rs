//! PostgreSQL-backed activity feed repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use hrms_application::{ActivityFeedRepository, Page, PageRequest};
use hrms_core::{AppError, AppResult};
use hrms_domain::{ActivityFeedEntry, NewActivity};

/// PostgreSQL implementation of the activity feed repository port.
#[derive(Clone)]
pub struct PostgresActivityFeedRepository {
    pool: PgPool,
}

impl PostgresActivityFeedRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ActivityFeedRow {
    id: i64,
    creator: String,
    activity: String,
    created_at: DateTime<Utc>,
}

impl From<ActivityFeedRow> for ActivityFeedEntry {
    fn from(row: ActivityFeedRow) -> Self {
        Self {
            id: row.id,
            creator: row.creator,
            activity: row.activity,
            created_at: row.created_at,
        }
    }
}

fn page_bounds(page: PageRequest) -> AppResult<(i64, i64)> {
    let offset = i64::try_from(page.offset()).map_err(|error| {
        AppError::Validation(format!("invalid activity feed page offset: {error}"))
    })?;
    Ok((i64::from(page.page_size()), offset))
}

#[async_trait]
impl ActivityFeedRepository for PostgresActivityFeedRepository {
    async fn append(
        &self,
        activity: NewActivity,
        created_at: DateTime<Utc>,
    ) -> AppResult<ActivityFeedEntry> {
        sqlx::query_as::<_, ActivityFeedRow>(
            r#"
            INSERT INTO activity_feeds (creator, activity, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, creator, activity, created_at
            "#,
        )
        .bind(activity.creator())
        .bind(activity.activity())
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map(ActivityFeedEntry::from)
        .map_err(|error| AppError::Internal(format!("failed to append activity: {error}")))
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<ActivityFeedEntry>> {
        let (limit, offset) = page_bounds(page)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activity_feeds")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count activities: {error}")))?;

        let rows = sqlx::query_as::<_, ActivityFeedRow>(
            r#"
            SELECT id, creator, activity, created_at
            FROM activity_feeds
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list activities: {error}")))?;

        Ok(Page {
            items: rows.into_iter().map(ActivityFeedEntry::from).collect(),
            total: u64::try_from(total).unwrap_or(0),
            request: page,
        })
    }

    async fn search(&self, query: &str, page: PageRequest) -> AppResult<Page<ActivityFeedEntry>> {
        let (limit, offset) = page_bounds(page)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM activity_feeds
            WHERE search_vector @@ websearch_to_tsquery('english', $1)
            "#,
        )
        .bind(query)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count activity search results: {error}"))
        })?;

        let rows = sqlx::query_as::<_, ActivityFeedRow>(
            r#"
            SELECT id, creator, activity, created_at
            FROM activity_feeds
            WHERE search_vector @@ websearch_to_tsquery('english', $1)
            ORDER BY ts_rank(search_vector, websearch_to_tsquery('english', $1)) DESC,
                     created_at DESC,
                     id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to search activities: {error}")))?;

        Ok(Page {
            items: rows.into_iter().map(ActivityFeedEntry::from).collect(),
            total: u64::try_from(total).unwrap_or(0),
            request: page,
        })
    }
}
