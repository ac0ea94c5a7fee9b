use axum::Json;
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use hrms_core::{AppError, NetworkErrorKind};
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
            AppError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, self.0.to_string()),
            AppError::Network { kind, message } => {
                error!(kind = kind.as_str(), detail = %message, "network collaborator failed");
                network_failure(*kind)
            }
            AppError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong on our side. Please try again later.".to_owned(),
                )
            }
        };

        let mut response = (status, Json(ErrorResponse { message })).into_response();
        if let AppError::RateLimited { wait_seconds } = self.0 {
            if let Ok(value) = HeaderValue::from_str(&wait_seconds.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }

        response
    }
}

fn network_failure(kind: NetworkErrorKind) -> (StatusCode, String) {
    let (status, message) = match kind {
        NetworkErrorKind::Dns => (
            StatusCode::SERVICE_UNAVAILABLE,
            "We couldn't reach the server. Please check your internet connection and try again.",
        ),
        NetworkErrorKind::Connection | NetworkErrorKind::Http => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Network issue detected. Please ensure you are connected to the internet and try again.",
        ),
        NetworkErrorKind::Tls => (
            StatusCode::BAD_GATEWAY,
            "Secure connection failed. Please try again later.",
        ),
        NetworkErrorKind::Email => (
            StatusCode::BAD_GATEWAY,
            "We couldn't send an email right now. Please try again later.",
        ),
        NetworkErrorKind::Cache => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Temporary server issue. Please try again shortly.",
        ),
    };

    (status, message.to_owned())
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
