use chrono::Utc;
use hrms_core::{AppError, UserIdentity};
use tower_sessions::Session;

mod bootstrap;
mod login;
mod session;

pub use bootstrap::bootstrap_handler;
pub use login::{login_handler, resend_otp_handler, verify_otp_handler};
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
/// Session creation time, kept for absolute timeout checks.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";

/// Reads the identity stored in the session, if any.
pub async fn session_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))
}

/// Rotates the session id and stores the authenticated identity.
async fn establish_session(session: &Session, identity: &UserIdentity) -> Result<(), AppError> {
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })
}
