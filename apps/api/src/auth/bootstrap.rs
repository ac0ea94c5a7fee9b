use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use hrms_application::NewUserInput;
use hrms_core::UserRole;

use crate::dto::{BootstrapRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn bootstrap_handler(
    State(state): State<AppState>,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .bootstrap_administrator(
            payload.token.as_str(),
            state.bootstrap_token.as_str(),
            NewUserInput {
                full_name: payload.full_name,
                username: payload.username,
                email: payload.email,
                role: UserRole::Administrator,
                password: payload.password,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
