//! HRMS report export worker runtime.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use hrms_application::ExportService;
use hrms_core::{AppError, AppResult};
use hrms_domain::ExportStatus;
use hrms_infrastructure::{CsvReportWriter, PostgresEmployeeRepository, PostgresExportJobRepository};

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct WorkerConfig {
    database_url: String,
    media_root: String,
    media_url: String,
    worker_id: String,
    poll_interval_ms: u64,
}

/// Jobs handled by one drain of the queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DrainSummary {
    succeeded: u32,
    failed: u32,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let pool = connect_pool(config.database_url.as_str()).await?;
    let export_service = build_export_service(pool, &config);

    info!(
        worker_id = %config.worker_id,
        media_root = %config.media_root,
        poll_interval_ms = config.poll_interval_ms,
        "hrms-worker started"
    );

    loop {
        match drain_export_jobs(&export_service, config.worker_id.as_str()).await {
            Ok(summary) => {
                if summary != DrainSummary::default() {
                    info!(
                        worker_id = %config.worker_id,
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "export queue drained"
                    );
                }
            }
            Err(error) => {
                warn!(
                    worker_id = %config.worker_id,
                    error = %error,
                    "failed to process export jobs"
                );
            }
        }

        tokio::time::sleep(Duration::from_millis(config.poll_interval_ms)).await;
    }
}

/// Runs pending export jobs until the queue is empty.
async fn drain_export_jobs(
    export_service: &ExportService,
    worker_id: &str,
) -> AppResult<DrainSummary> {
    let mut summary = DrainSummary::default();

    while let Some(outcome) = export_service.run_next_job(worker_id).await? {
        match outcome.status {
            ExportStatus::Success => summary.succeeded = summary.succeeded.saturating_add(1),
            _ => {
                summary.failed = summary.failed.saturating_add(1);
                warn!(worker_id, task_id = %outcome.task_id, "export job failed");
            }
        }
    }

    Ok(summary)
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn build_export_service(pool: PgPool, config: &WorkerConfig) -> ExportService {
    ExportService::new(
        Arc::new(PostgresExportJobRepository::new(pool.clone())),
        Arc::new(PostgresEmployeeRepository::new(pool)),
        Arc::new(CsvReportWriter::new(
            config.media_root.as_str(),
            config.media_url.as_str(),
        )),
    )
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let database_url = required_env("DATABASE_URL")?;
        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_owned());
        let media_url = env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_owned());
        let worker_id = env::var("WORKER_ID")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| format!("worker-{}", std::process::id()));
        let poll_interval_ms = parse_env_u64("EXPORT_POLL_INTERVAL_MS", 2000)?;

        if poll_interval_ms == 0 {
            return Err(AppError::Validation(
                "EXPORT_POLL_INTERVAL_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            media_root,
            media_url,
            worker_id,
            poll_interval_ms,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
