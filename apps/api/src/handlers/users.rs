use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use hrms_application::{NewUserInput, PageLimits};
use hrms_core::{UserIdentity, UserRole};

use crate::dto::{CreateUserRequest, PageQuery, PaginatedResponse, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PaginatedResponse<UserResponse>>> {
    let page = state
        .user_service
        .list(&user, query.to_request(PageLimits::STANDARD)?)
        .await?;

    Ok(Json(PaginatedResponse::from_page(page, UserResponse::from)))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let created = state
        .user_service
        .create(
            &user,
            NewUserInput {
                full_name: payload.full_name,
                username: payload.username,
                email: payload.email,
                role: UserRole::parse_transport(payload.role.trim())?,
                password: payload.password,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}
