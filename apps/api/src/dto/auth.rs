use hrms_core::UserIdentity;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Credentials submitted to start a login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login started: a code was emailed.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub detail: String,
    pub temp_token: String,
}

/// Tokens submitted when verifying or resending a code.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/otp-tokens-request.ts"
)]
pub struct OtpTokensRequest {
    #[serde(default)]
    pub temp_token: Option<String>,
    #[serde(default)]
    pub otp_token: Option<String>,
}

/// Wrapper body of `verify-otp` and `resend-otp`.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/verify-otp-request.ts"
)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub tokens: OtpTokensRequest,
}

/// First administrator creation payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub token: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            user_id: identity.user_id().to_string(),
            username: identity.username().to_owned(),
            email: identity.email().to_owned(),
            role: identity.role().as_str().to_owned(),
        }
    }
}
