use axum::Json;
use axum::http::StatusCode;
use hrms_core::AppError;
use tower_sessions::Session;
use tracing::info;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;

use super::session_identity;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let identity = session_identity(&session).await?;

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(identity) = identity {
        info!(user_id = %identity.user_id(), "user logged out");
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(session: Session) -> ApiResult<Json<UserIdentityResponse>> {
    let identity = session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    Ok(Json(UserIdentityResponse::from(identity)))
}
