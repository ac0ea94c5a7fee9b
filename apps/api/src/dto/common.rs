use hrms_application::{Page, PageLimits, PageRequest};
use hrms_core::AppError;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
    pub redis: HealthDependencyStatus,
}

/// Status of one health dependency.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Single count wrapped as `{"results": n}`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/count-response.ts"
)]
pub struct CountResponse {
    pub results: u64,
}

/// List wrapped as `{"results": [...]}`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/results-response.ts"
)]
pub struct ResultsResponse<T> {
    pub results: Vec<T>,
}

/// One page of a listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/paginated-response.ts"
)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn from_page<S>(page: Page<S>, mapper: impl FnMut(S) -> T) -> Self {
        let request = page.request;
        let page = page.map(mapper);
        Self {
            count: page.total,
            page: request.page(),
            page_size: request.page_size(),
            results: page.items,
        }
    }
}

/// `?page=&page_size=` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn to_request(&self, limits: PageLimits) -> Result<PageRequest, AppError> {
        PageRequest::new(self.page, self.page_size, limits)
    }
}
