use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, AppResult};

/// Role assigned to a back-office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Full access, including deletions and user management.
    #[serde(rename = "ADMINISTRATOR")]
    Administrator,
    /// May create and edit records and request exports.
    #[serde(rename = "STANDARD USER")]
    StandardUser,
    /// Read-only access.
    #[serde(rename = "VIEWER")]
    Viewer,
}

impl UserRole {
    /// Parses the stored role value.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        match value {
            "ADMINISTRATOR" => Ok(Self::Administrator),
            "STANDARD USER" => Ok(Self::StandardUser),
            "VIEWER" => Ok(Self::Viewer),
            _ => Err(AppError::Validation(format!("unknown user role '{value}'"))),
        }
    }

    /// Returns the stable stored value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "ADMINISTRATOR",
            Self::StandardUser => "STANDARD USER",
            Self::Viewer => "VIEWER",
        }
    }

    /// Whether the role may create or edit records.
    #[must_use]
    pub fn can_write_records(&self) -> bool {
        matches!(self, Self::Administrator | Self::StandardUser)
    }
}

/// User information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: Uuid,
    username: String,
    email: String,
    role: UserRole,
}

impl UserIdentity {
    /// Creates a user identity.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        username: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
            role,
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the login name, also used as the activity creator.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the assigned role.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Fails with `Forbidden` unless the role may create or edit records.
    pub fn require_record_writer(&self) -> AppResult<()> {
        if self.role.can_write_records() {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' with role '{}' may not modify records",
            self.username,
            self.role.as_str()
        )))
    }

    /// Fails with `Forbidden` unless the user is an administrator.
    pub fn require_administrator(&self) -> AppResult<()> {
        if self.role == UserRole::Administrator {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is not an administrator",
            self.username
        )))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{UserIdentity, UserRole};

    #[test]
    fn viewer_cannot_write_records() {
        let viewer = UserIdentity::new(Uuid::new_v4(), "ama", "ama@example.com", UserRole::Viewer);
        assert!(viewer.require_record_writer().is_err());
        assert!(viewer.require_administrator().is_err());
    }

    #[test]
    fn standard_user_writes_but_does_not_administer() {
        let user = UserIdentity::new(
            Uuid::new_v4(),
            "kofi",
            "kofi@example.com",
            UserRole::StandardUser,
        );
        assert!(user.require_record_writer().is_ok());
        assert!(user.require_administrator().is_err());
    }

    #[test]
    fn role_round_trips_through_transport_value() {
        for role in [
            UserRole::Administrator,
            UserRole::StandardUser,
            UserRole::Viewer,
        ] {
            assert_eq!(UserRole::parse_transport(role.as_str()).ok(), Some(role));
        }
        assert!(UserRole::parse_transport("ROOT").is_err());
    }
}
