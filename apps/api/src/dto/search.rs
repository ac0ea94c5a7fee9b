use hrms_application::{ExportStatusView, FilterSpec};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One `(field, op, value)` filter.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/filter-spec-request.ts"
)]
pub struct FilterSpecRequest {
    pub field: String,
    pub op: String,
    #[serde(default)]
    #[ts(type = "string | number | boolean | null")]
    pub value: serde_json::Value,
}

impl From<FilterSpecRequest> for FilterSpec {
    fn from(request: FilterSpecRequest) -> Self {
        Self::new(request.field, request.op, request.value)
    }
}

/// Body of search and export requests. A missing list matches everything.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/employee-search-request.ts"
)]
pub struct EmployeeSearchRequest {
    #[serde(default)]
    pub filters: Option<Vec<FilterSpecRequest>>,
}

impl EmployeeSearchRequest {
    pub fn into_filter_specs(self) -> Vec<FilterSpec> {
        self.filters
            .unwrap_or_default()
            .into_iter()
            .map(FilterSpec::from)
            .collect()
    }
}

/// Export accepted for background processing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/export-started-response.ts"
)]
pub struct ExportStartedResponse {
    pub message: String,
    pub task_id: String,
}

/// Export job state; `file_url` only once the job succeeded.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/export-status-response.ts"
)]
pub struct ExportStatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub file_url: Option<String>,
}

impl From<ExportStatusView> for ExportStatusResponse {
    fn from(view: ExportStatusView) -> Self {
        Self {
            status: view.status.as_str().to_owned(),
            file_url: view.file_url,
        }
    }
}
