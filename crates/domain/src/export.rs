use chrono::{DateTime, Utc};
use hrms_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Lifecycle state of an export job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportStatus {
    /// Waiting for a worker.
    Pending,
    /// Claimed by a worker.
    Started,
    /// Report written; file URL available.
    Success,
    /// Generation failed.
    Failure,
}

impl ExportStatus {
    /// Returns the stored value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Started => "STARTED",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        }
    }

    /// Parses the stored value.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "STARTED" => Ok(Self::Started),
            "SUCCESS" => Ok(Self::Success),
            "FAILURE" => Ok(Self::Failure),
            _ => Err(AppError::Validation(format!(
                "unknown export status '{value}'"
            ))),
        }
    }

    /// Whether the job can no longer change state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// Asynchronous employee report request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    /// Task identifier handed to the client.
    pub task_id: Uuid,
    /// Current state.
    pub status: ExportStatus,
    /// Raw filter list as submitted, re-validated by the worker.
    pub filters: Value,
    /// Download URL once the report exists.
    pub file_url: Option<String>,
    /// Failure detail.
    pub error: Option<String>,
    /// Username of the requester.
    pub requested_by: String,
    /// Enqueue timestamp.
    pub created_at: DateTime<Utc>,
    /// Last state change.
    pub updated_at: DateTime<Utc>,
    /// End of the current worker's claim; a started job past it may be reclaimed.
    pub lease_expires_at: Option<DateTime<Utc>>,
}

impl ExportJob {
    /// Creates a pending job.
    #[must_use]
    pub fn pending(filters: Value, requested_by: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            status: ExportStatus::Pending,
            filters,
            file_url: None,
            error: None,
            requested_by: requested_by.into(),
            created_at: now,
            updated_at: now,
            lease_expires_at: None,
        }
    }

    /// Whether a worker may claim the job at `now`.
    ///
    /// Pending jobs are always claimable; started jobs only once their lease
    /// has lapsed, which covers a worker that died mid-report.
    #[must_use]
    pub fn is_claimable(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            ExportStatus::Pending => true,
            ExportStatus::Started => self
                .lease_expires_at
                .is_none_or(|expires_at| expires_at < now),
            ExportStatus::Success | ExportStatus::Failure => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    use super::{ExportJob, ExportStatus};

    #[test]
    fn status_values_match_task_queue_states() {
        for status in [
            ExportStatus::Pending,
            ExportStatus::Started,
            ExportStatus::Success,
            ExportStatus::Failure,
        ] {
            assert_eq!(ExportStatus::parse_transport(status.as_str()).ok(), Some(status));
        }
        assert!(ExportStatus::parse_transport("RETRY").is_err());
        assert!(ExportStatus::Failure.is_terminal());
        assert!(!ExportStatus::Started.is_terminal());
    }

    #[test]
    fn serializes_as_upper_case() {
        let json = serde_json::to_string(&ExportStatus::Success).ok();
        assert_eq!(json.as_deref(), Some("\"SUCCESS\""));
    }

    #[test]
    fn started_jobs_become_claimable_when_the_lease_lapses() {
        let now = Utc
            .with_ymd_and_hms(2025, 6, 30, 9, 0, 0)
            .single()
            .unwrap_or_default();
        let mut job = ExportJob::pending(json!([]), "ama", now);
        assert!(job.is_claimable(now));

        job.status = ExportStatus::Started;
        job.lease_expires_at = Some(now + Duration::minutes(10));
        assert!(!job.is_claimable(now + Duration::minutes(10)));
        assert!(job.is_claimable(now + Duration::minutes(11)));

        job.status = ExportStatus::Success;
        job.lease_expires_at = None;
        assert!(!job.is_claimable(now + Duration::days(1)));
    }
}
