use axum::Json;
use axum::extract::State;
use hrms_application::{LoginChallenge, OTP_SENT_MESSAGE};
use tower_sessions::Session;

use crate::dto::{LoginRequest, LoginResponse, UserIdentityResponse, VerifyOtpRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::establish_session;

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let challenge = state
        .login_service
        .login(payload.username.as_str(), payload.password.as_str())
        .await?;

    Ok(Json(challenge_response(challenge)))
}

pub async fn verify_otp_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<VerifyOtpRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let tokens = payload.tokens;
    let identity = state
        .login_service
        .verify_otp(
            tokens.temp_token.as_deref().unwrap_or_default(),
            tokens.otp_token.as_deref().unwrap_or_default(),
        )
        .await?;

    establish_session(&session, &identity).await?;
    Ok(Json(UserIdentityResponse::from(identity)))
}

pub async fn resend_otp_handler(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let challenge = state
        .login_service
        .resend_otp(payload.tokens.temp_token.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(challenge_response(challenge)))
}

fn challenge_response(challenge: LoginChallenge) -> LoginResponse {
    LoginResponse {
        detail: OTP_SENT_MESSAGE.to_owned(),
        temp_token: challenge.temp_token,
    }
}
