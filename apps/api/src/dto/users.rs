use hrms_domain::User;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Account creation payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub password: String,
}

/// API representation of an account. Never carries the password hash.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            full_name: user.full_name,
            username: user.username.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            role: user.role.as_str().to_owned(),
            is_active: user.is_active,
        }
    }
}
