//! Asynchronous employee report export.
//!
//! The API enqueues jobs; the worker claims them one at a time, pages
//! through every matching employee and hands the rows to a [`ReportWriter`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use hrms_core::{AppError, AppResult, UserIdentity};
use hrms_domain::{Employee, EmployeePredicate, ExportJob, ExportStatus};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::employee_service::EmployeeRepository;
use crate::pagination::PageRequest;
use crate::query_builder::{FilterSpec, build_predicate, decode_filter_specs};


/// Rows fetched per query while generating a report.
pub const EXPORT_PAGE_SIZE: u32 = 500;

/// How long a claimed job stays reserved for its worker.
pub const EXPORT_LEASE_SECONDS: i64 = 600;

/// Report column headers, in order.
pub const EXPORT_COLUMNS: [&str; 12] = [
    "Service ID",
    "Last Name",
    "Other Names",
    "Gender",
    "Age",
    "Date of Birth",
    "Grade",
    "Unit",
    "Structure",
    "Social Security",
    "Category",
    "Appointment Date",
];

/// Repository port for export jobs.
#[async_trait]
pub trait ExportJobRepository: Send + Sync {
    /// Persists a new job.
    async fn insert(&self, job: &ExportJob) -> AppResult<()>;

    /// Finds a job by task id.
    async fn find(&self, task_id: Uuid) -> AppResult<Option<ExportJob>>;

    /// Claims the oldest claimable job, marks it started and leases it to
    /// the worker until `lease_expires_at`.
    ///
    /// Claimable means pending, or started with a lease that ended before
    /// `now`. Concurrent workers must never hold the same job.
    async fn claim_next_pending(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
        lease_expires_at: DateTime<Utc>,
    ) -> AppResult<Option<ExportJob>>;

    /// Marks a started job successful.
    async fn mark_succeeded(
        &self,
        task_id: Uuid,
        file_url: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Marks a started job failed.
    async fn mark_failed(&self, task_id: Uuid, error: &str, now: DateTime<Utc>) -> AppResult<()>;
}

/// Rendered report handed to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeReport {
    /// Column headers.
    pub columns: Vec<String>,
    /// One row per employee, aligned with the columns.
    pub rows: Vec<Vec<String>>,
}

/// Output port that stores a report and returns its download URL.
#[async_trait]
pub trait ReportWriter: Send + Sync {
    /// Persists the report.
    async fn write_report(&self, report: &EmployeeReport) -> AppResult<String>;
}

/// Client-visible job state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStatusView {
    /// Current state.
    pub status: ExportStatus,
    /// Download URL, only on success.
    pub file_url: Option<String>,
}

/// Result of one worker iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRunOutcome {
    /// Processed job.
    pub task_id: Uuid,
    /// Terminal status reached.
    pub status: ExportStatus,
    /// Number of rows written; zero on failure.
    pub row_count: usize,
}

/// Application service for report exports.
#[derive(Clone)]
pub struct ExportService {
    jobs: Arc<dyn ExportJobRepository>,
    employees: Arc<dyn EmployeeRepository>,
    report_writer: Arc<dyn ReportWriter>,
    clock: Arc<dyn Clock>,
    lease: Duration,
}

impl ExportService {
    /// Creates an export service.
    #[must_use]
    pub fn new(
        jobs: Arc<dyn ExportJobRepository>,
        employees: Arc<dyn EmployeeRepository>,
        report_writer: Arc<dyn ReportWriter>,
    ) -> Self {
        Self {
            jobs,
            employees,
            report_writer,
            clock: Arc::new(SystemClock),
            lease: Duration::seconds(EXPORT_LEASE_SECONDS),
        }
    }

    /// Replaces the claim lease length.
    #[must_use]
    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates the filters and stores a pending job.
    pub async fn enqueue(&self, actor: &UserIdentity, filters: &[FilterSpec]) -> AppResult<Uuid> {
        actor.require_record_writer()?;
        build_predicate(filters)?;

        let stored_filters = serde_json::to_value(filters).map_err(|error| {
            AppError::Internal(format!("failed to encode export filters: {error}"))
        })?;
        let job = ExportJob::pending(stored_filters, actor.username(), self.clock.now());
        self.jobs.insert(&job).await?;

        info!(task_id = %job.task_id, requested_by = actor.username(), "export enqueued");
        Ok(job.task_id)
    }

    /// Reports the state of a job. Unknown ids are reported as pending.
    pub async fn status(&self, task_id: Uuid) -> AppResult<ExportStatusView> {
        let Some(job) = self.jobs.find(task_id).await? else {
            return Ok(ExportStatusView {
                status: ExportStatus::Pending,
                file_url: None,
            });
        };

        let file_url = match job.status {
            ExportStatus::Success => job.file_url,
            _ => None,
        };

        Ok(ExportStatusView {
            status: job.status,
            file_url,
        })
    }

    /// Claims and runs the next pending job, if any.
    ///
    /// Generation failures are recorded on the job and reported as a
    /// `Failure` outcome; only repository errors are returned as `Err`.
    pub async fn run_next_job(&self, worker_id: &str) -> AppResult<Option<ExportRunOutcome>> {
        let now = self.clock.now();
        let Some(job) = self
            .jobs
            .claim_next_pending(worker_id, now, now + self.lease)
            .await?
        else {
            return Ok(None);
        };

        info!(task_id = %job.task_id, worker_id, "export started");

        match self.generate(&job.filters).await {
            Ok((file_url, row_count)) => {
                self.jobs
                    .mark_succeeded(job.task_id, &file_url, self.clock.now())
                    .await?;
                info!(task_id = %job.task_id, row_count, file_url = %file_url, "export finished");
                Ok(Some(ExportRunOutcome {
                    task_id: job.task_id,
                    status: ExportStatus::Success,
                    row_count,
                }))
            }
            Err(error) => {
                let message = error.to_string();
                self.jobs
                    .mark_failed(job.task_id, &message, self.clock.now())
                    .await?;
                warn!(task_id = %job.task_id, error = %message, "export failed");
                Ok(Some(ExportRunOutcome {
                    task_id: job.task_id,
                    status: ExportStatus::Failure,
                    row_count: 0,
                }))
            }
        }
    }

    async fn generate(&self, filters: &Value) -> AppResult<(String, usize)> {
        let predicate = build_predicate(&decode_filter_specs(filters)?)?;
        let employees = self.collect_matching(&predicate).await?;

        let today = self.clock.now().date_naive();
        let report = EmployeeReport {
            columns: EXPORT_COLUMNS.iter().map(|column| (*column).to_owned()).collect(),
            rows: employees
                .iter()
                .map(|employee| report_row(employee, today))
                .collect(),
        };

        let file_url = self.report_writer.write_report(&report).await?;
        Ok((file_url, report.rows.len()))
    }

    /// Pages through every record matching the predicate.
    pub async fn collect_matching(&self, predicate: &EmployeePredicate) -> AppResult<Vec<Employee>> {
        let mut request = PageRequest::first(EXPORT_PAGE_SIZE);
        let mut employees = Vec::new();

        loop {
            let page = self.employees.search(predicate, request).await?;
            let has_next = page.has_next() && !page.items.is_empty();
            employees.extend(page.items);
            if !has_next {
                return Ok(employees);
            }
            request = request.next();
        }
    }
}

fn report_row(employee: &Employee, today: NaiveDate) -> Vec<String> {
    let data = employee.data();
    let iso = |date: NaiveDate| date.format("%Y-%m-%d").to_string();

    vec![
        data.service_id.clone(),
        data.last_name.clone(),
        data.other_names.clone(),
        data.gender.clone(),
        employee.age_on(today).to_string(),
        iso(data.dob),
        data.grade.clone(),
        data.unit.clone(),
        data.structure.clone(),
        data.social_security.clone().unwrap_or_default(),
        data.category.clone().unwrap_or_default(),
        iso(data.appointment_date),
    ]
}
