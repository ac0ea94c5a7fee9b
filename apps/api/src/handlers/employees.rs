use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use hrms_application::{DEFAULT_FORECAST_YEARS, PageLimits};
use hrms_core::UserIdentity;
use serde::Deserialize;

use crate::dto::{
    CountResponse, EmployeePayload, EmployeeResponse, PageQuery, PaginatedResponse,
    ResultsResponse, RetirementForecastResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub years: Option<u32>,
}

pub async fn list_employees_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PaginatedResponse<EmployeeResponse>>> {
    let page = state
        .employee_service
        .list(&user, query.to_request(PageLimits::LARGE)?)
        .await?;

    let today = Utc::now().date_naive();
    Ok(Json(PaginatedResponse::from_page(page, |employee| {
        EmployeeResponse::new(employee, today)
    })))
}

pub async fn create_employee_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<EmployeePayload>,
) -> ApiResult<(StatusCode, Json<EmployeeResponse>)> {
    let employee = state
        .employee_service
        .create(&user, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EmployeeResponse::new(employee, Utc::now().date_naive())),
    ))
}

pub async fn get_employee_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(service_id): Path<String>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state
        .employee_service
        .get(&user, service_id.as_str())
        .await?;

    Ok(Json(EmployeeResponse::new(employee, Utc::now().date_naive())))
}

pub async fn update_employee_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(service_id): Path<String>,
    Json(payload): Json<EmployeePayload>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state
        .employee_service
        .update(&user, service_id.as_str(), payload.into())
        .await?;

    Ok(Json(EmployeeResponse::new(employee, Utc::now().date_naive())))
}

pub async fn delete_employee_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(service_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .employee_service
        .delete(&user, service_id.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn count_employees_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<CountResponse>> {
    let results = state.employee_service.count(&user).await?;
    Ok(Json(CountResponse { results }))
}

pub async fn forecasted_retirees_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Json<ResultsResponse<RetirementForecastResponse>>> {
    let results = state
        .employee_service
        .forecast_retirees(&user, query.years.unwrap_or(DEFAULT_FORECAST_YEARS))
        .await?
        .into_iter()
        .map(RetirementForecastResponse::from)
        .collect();

    Ok(Json(ResultsResponse { results }))
}
