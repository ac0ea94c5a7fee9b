//! CSV report writer storing files under the media root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hrms_application::{EmployeeReport, ReportWriter};
use hrms_core::{AppError, AppResult};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};
use uuid::Uuid;

const REPORTS_DIRECTORY: &str = "reports";

/// Writes employee reports as CSV files below `<media_root>/reports`.
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    media_root: PathBuf,
    media_url: String,
}

impl CsvReportWriter {
    /// Creates a writer. `media_url` is the public prefix of `media_root`.
    #[must_use]
    pub fn new(media_root: impl Into<PathBuf>, media_url: impl Into<String>) -> Self {
        let mut media_url = media_url.into();
        if !media_url.ends_with('/') {
            media_url.push('/');
        }

        Self {
            media_root: media_root.into(),
            media_url,
        }
    }
}

#[async_trait]
impl ReportWriter for CsvReportWriter {
    async fn write_report(&self, report: &EmployeeReport) -> AppResult<String> {
        let directory = self.media_root.join(REPORTS_DIRECTORY);
        tokio::fs::create_dir_all(&directory).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to create report directory '{}': {error}",
                directory.display()
            ))
        })?;

        let file_name = format!("employee_report_{}.csv", Uuid::new_v4());
        let path = directory.join(&file_name);
        let mut file = tokio::fs::File::create(&path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to create report '{}': {error}",
                path.display()
            ))
        })?;

        write_or_remove(&path, &mut file, render_csv(report).as_bytes()).await?;

        info!(file = %path.display(), rows = report.rows.len(), "employee report written");
        Ok(format!("{}{REPORTS_DIRECTORY}/{file_name}", self.media_url))
    }
}

/// Writes `contents` to the file at `path`; on failure the partial file is
/// deleted before the error is returned.
async fn write_or_remove<W>(path: &Path, file: &mut W, contents: &[u8]) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(contents).await {
        Ok(()) => file
            .flush()
            .await
            .map_err(|error| AppError::Internal(format!("failed to flush report: {error}"))),
        Err(error) => Err(AppError::Internal(format!("failed to write report: {error}"))),
    };

    if written.is_err() {
        if let Err(error) = tokio::fs::remove_file(path).await {
            warn!(file = %path.display(), error = %error, "failed to remove partial report");
        }
    }

    written
}

fn render_csv(report: &EmployeeReport) -> String {
    let mut output = String::new();
    push_record(&mut output, &report.columns);
    for row in &report.rows {
        push_record(&mut output, row);
    }
    output
}

fn push_record(output: &mut String, cells: &[String]) {
    for (index, cell) in cells.iter().enumerate() {
        if index > 0 {
            output.push(',');
        }
        push_cell(output, cell);
    }
    output.push_str("\r\n");
}

// RFC 4180 quoting.
fn push_cell(output: &mut String, cell: &str) {
    if !cell.contains([',', '"', '\r', '\n']) {
        output.push_str(cell);
        return;
    }

    output.push('"');
    output.push_str(&cell.replace('"', "\"\""));
    output.push('"');
}
