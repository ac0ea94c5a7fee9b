//! Back-office user accounts and credential validation rules.

use hrms_core::{AppError, AppResult, UserIdentity, UserRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 50;

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 10;

/// Upper bound on password length, keeps Argon2 hashing cost bounded.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validated, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// The address must have a non-empty local part and a dotted domain.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let normalized = value.into().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        if normalized.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain '@'".to_owned(),
            ));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(AppError::Validation(
                "email address must have one non-empty local part".to_owned(),
            ));
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username: trimmed, non-empty, at most 50 characters
    /// without whitespace.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation("username is required".to_owned()));
        }

        if trimmed.chars().count() > USERNAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "username must not exceed {USERNAME_MAX_LENGTH} characters"
            )));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(
                "username must not contain whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err(AppError::Validation(
            "this password is too common".to_owned(),
        ));
    }

    Ok(())
}

static COMMON_PASSWORDS: &[&str] = &[
    "1234567890",
    "password123",
    "qwertyuiop",
    "password1234",
    "iloveyou123",
    "administrator",
    "welcome123",
    "letmein123",
    "0987654321",
    "1q2w3e4r5t",
];

/// Stored back-office user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub full_name: String,
    /// Unique login name.
    pub username: Username,
    /// Unique email address; OTPs are delivered here.
    pub email: EmailAddress,
    /// Assigned role.
    pub role: UserRole,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Inactive users cannot log in.
    pub is_active: bool,
}

impl User {
    /// Builds the session identity of this user.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.id,
            self.username.as_str(),
            self.email.as_str(),
            self.role,
        )
    }
}
