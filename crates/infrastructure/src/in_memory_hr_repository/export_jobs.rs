use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hrms_application::ExportJobRepository;
use hrms_core::{AppError, AppResult};
use hrms_domain::{ExportJob, ExportStatus};
use uuid::Uuid;

use super::InMemoryHrRepository;

impl InMemoryHrRepository {
    async fn finish_job(
        &self,
        task_id: Uuid,
        status: ExportStatus,
        file_url: Option<&str>,
        error: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut jobs = self.export_jobs.write().await;
        let Some(job) = jobs
            .get_mut(&task_id)
            .filter(|job| job.status == ExportStatus::Started)
        else {
            return Err(AppError::Conflict(format!(
                "export job '{task_id}' is not currently started"
            )));
        };

        job.status = status;
        job.file_url = file_url.map(str::to_owned);
        job.error = error.map(str::to_owned);
        job.updated_at = now;
        job.lease_expires_at = None;
        Ok(())
    }
}

#[async_trait]
impl ExportJobRepository for InMemoryHrRepository {
    async fn insert(&self, job: &ExportJob) -> AppResult<()> {
        let mut jobs = self.export_jobs.write().await;
        if jobs.contains_key(&job.task_id) {
            return Err(AppError::Conflict(format!(
                "export job '{}' already exists",
                job.task_id
            )));
        }

        jobs.insert(job.task_id, job.clone());
        Ok(())
    }

    async fn find(&self, task_id: Uuid) -> AppResult<Option<ExportJob>> {
        Ok(self
            .export_jobs
            .read()
            .await
            .get(&task_id)
            .cloned())
    }

    async fn claim_next_pending(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
        lease_expires_at: DateTime<Utc>,
    ) -> AppResult<Option<ExportJob>> {
        let mut jobs = self.export_jobs.write().await;
        let Some(job) = jobs
            .values_mut()
            .filter(|job| job.is_claimable(now))
            .min_by_key(|job| (job.created_at, job.task_id))
        else {
            return Ok(None);
        };

        job.status = ExportStatus::Started;
        job.updated_at = now;
        job.lease_expires_at = Some(lease_expires_at);
        tracing::debug!(task_id = %job.task_id, worker_id, "export job claimed");
        Ok(Some(job.clone()))
    }

    async fn mark_succeeded(
        &self,
        task_id: Uuid,
        file_url: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        self.finish_job(task_id, ExportStatus::Success, Some(file_url), None, now)
            .await
    }

    async fn mark_failed(&self, task_id: Uuid, error: &str, now: DateTime<Utc>) -> AppResult<()> {
        self.finish_job(task_id, ExportStatus::Failure, None, Some(error), now)
            .await
    }
}
