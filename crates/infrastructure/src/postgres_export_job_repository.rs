//! PostgreSQL-backed export job queue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use hrms_application::ExportJobRepository;
use hrms_core::{AppError, AppResult};
use hrms_domain::{ExportJob, ExportStatus};

/// PostgreSQL implementation of the export job repository port.
#[derive(Clone)]
pub struct PostgresExportJobRepository {
    pool: PgPool,
}

impl PostgresExportJobRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn finish(
        &self,
        task_id: Uuid,
        status: ExportStatus,
        file_url: Option<&str>,
        error: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE export_jobs
            SET status = $2, file_url = $3, error = $4, updated_at = $5, lease_expires_at = NULL
            WHERE task_id = $1
              AND status = 'STARTED'
            "#,
        )
        .bind(task_id)
        .bind(status.as_str())
        .bind(file_url)
        .bind(error)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to mark export job '{task_id}' as {}: {error}",
                status.as_str()
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "export job '{task_id}' is not currently started"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExportJobRow {
    task_id: Uuid,
    status: String,
    filters: serde_json::Value,
    file_url: Option<String>,
    error: Option<String>,
    requested_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    lease_expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<ExportJobRow> for ExportJob {
    type Error = AppError;

    fn try_from(row: ExportJobRow) -> Result<Self, Self::Error> {
        let status = ExportStatus::parse_transport(&row.status).map_err(|error| {
            AppError::Internal(format!(
                "export job '{}' has an invalid status: {error}",
                row.task_id
            ))
        })?;

        Ok(Self {
            task_id: row.task_id,
            status,
            filters: row.filters,
            file_url: row.file_url,
            error: row.error,
            requested_by: row.requested_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            lease_expires_at: row.lease_expires_at,
        })
    }
}

#[async_trait]
impl ExportJobRepository for PostgresExportJobRepository {
    async fn insert(&self, job: &ExportJob) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO export_jobs (
                task_id,
                status,
                filters,
                file_url,
                error,
                requested_by,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.task_id)
        .bind(job.status.as_str())
        .bind(&job.filters)
        .bind(job.file_url.as_deref())
        .bind(job.error.as_deref())
        .bind(job.requested_by.as_str())
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to enqueue export job '{}': {error}",
                job.task_id
            ))
        })?;

        Ok(())
    }

    async fn find(&self, task_id: Uuid) -> AppResult<Option<ExportJob>> {
        let row = sqlx::query_as::<_, ExportJobRow>(
            r#"
            SELECT task_id, status, filters, file_url, error, requested_by, created_at, updated_at,
                   lease_expires_at
            FROM export_jobs
            WHERE task_id = $1
            "#,
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find export job '{task_id}': {error}"))
        })?;

        row.map(ExportJob::try_from).transpose()
    }

    async fn claim_next_pending(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
        lease_expires_at: DateTime<Utc>,
    ) -> AppResult<Option<ExportJob>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start export job claim transaction: {error}"
            ))
        })?;

        let row = sqlx::query_as::<_, ExportJobRow>(
            r#"
            WITH candidate AS (
                SELECT task_id
                FROM export_jobs
                WHERE status = 'PENDING'
                   OR (status = 'STARTED' AND (lease_expires_at IS NULL OR lease_expires_at < $2))
                ORDER BY created_at ASC
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            UPDATE export_jobs jobs
            SET status = 'STARTED', claimed_by = $1, updated_at = $2, lease_expires_at = $3
            FROM candidate
            WHERE jobs.task_id = candidate.task_id
            RETURNING jobs.task_id, jobs.status, jobs.filters, jobs.file_url, jobs.error,
                      jobs.requested_by, jobs.created_at, jobs.updated_at, jobs.lease_expires_at
            "#,
        )
        .bind(worker_id)
        .bind(now)
        .bind(lease_expires_at)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to claim export job for worker '{worker_id}': {error}"
            ))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit export job claim transaction: {error}"
            ))
        })?;

        row.map(ExportJob::try_from).transpose()
    }

    async fn mark_succeeded(
        &self,
        task_id: Uuid,
        file_url: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        self.finish(task_id, ExportStatus::Success, Some(file_url), None, now)
            .await
    }

    async fn mark_failed(&self, task_id: Uuid, error: &str, now: DateTime<Utc>) -> AppResult<()> {
        self.finish(task_id, ExportStatus::Failure, None, Some(error), now)
            .await
    }
}
