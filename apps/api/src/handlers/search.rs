use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use chrono::Utc;
use hrms_application::PageLimits;
use hrms_core::{AppError, UserIdentity};
use uuid::Uuid;

use crate::dto::{
    EmployeeResponse, EmployeeSearchRequest, ExportStartedResponse, ExportStatusResponse,
    PageQuery, PaginatedResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

const EXPORT_STARTED_MESSAGE: &str = "Export started successfully";

pub async fn search_employees_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<PageQuery>,
    Json(payload): Json<EmployeeSearchRequest>,
) -> ApiResult<Json<PaginatedResponse<EmployeeResponse>>> {
    let page = state
        .employee_service
        .search(
            &user,
            &payload.into_filter_specs(),
            query.to_request(PageLimits::LARGE)?,
        )
        .await?;

    let today = Utc::now().date_naive();
    Ok(Json(PaginatedResponse::from_page(page, |employee| {
        EmployeeResponse::new(employee, today)
    })))
}

pub async fn export_employees_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<EmployeeSearchRequest>,
) -> ApiResult<Json<ExportStartedResponse>> {
    let task_id = state
        .export_service
        .enqueue(&user, &payload.into_filter_specs())
        .await?;

    Ok(Json(ExportStartedResponse {
        message: EXPORT_STARTED_MESSAGE.to_owned(),
        task_id: task_id.to_string(),
    }))
}

pub async fn export_status_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<ExportStatusResponse>> {
    let task_id = Uuid::parse_str(task_id.as_str())
        .map_err(|error| AppError::Validation(format!("invalid task id '{task_id}': {error}")))?;

    let view = state.export_service.status(task_id).await?;
    Ok(Json(ExportStatusResponse::from(view)))
}
