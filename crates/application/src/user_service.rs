//! User account ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use hrms_core::{AppError, AppResult, UserIdentity, UserRole};
use hrms_domain::{EmailAddress, User, Username, validate_password};
use tracing::info;
use uuid::Uuid;

use crate::pagination::{Page, PageRequest};


/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Finds a user by id.
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Inserts a user; a taken username or email is a `Conflict`.
    async fn insert(&self, user: &User) -> AppResult<()>;

    /// Lists users ordered by username.
    async fn list(&self, page: PageRequest) -> AppResult<Page<User>>;

    /// Counts all users.
    async fn count(&self) -> AppResult<u64>;
}

/// Port for password hashing. Keeps the application free of a direct
/// dependency on the hashing library.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUserInput {
    /// Display name.
    pub full_name: String,
    /// Login name.
    pub username: String,
    /// Email address receiving OTPs.
    pub email: String,
    /// Assigned role.
    pub role: UserRole,
    /// Plaintext password.
    pub password: String,
}

/// Application service for user accounts.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a user service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// Lists accounts. Administrators only.
    pub async fn list(&self, actor: &UserIdentity, page: PageRequest) -> AppResult<Page<User>> {
        actor.require_administrator()?;
        self.repository.list(page).await
    }

    /// Creates an account. Administrators only.
    pub async fn create(&self, actor: &UserIdentity, input: NewUserInput) -> AppResult<User> {
        actor.require_administrator()?;
        let user = self.create_unchecked(input).await?;
        info!(user_id = %user.id, created_by = actor.username(), "user created");
        Ok(user)
    }

    /// Creates the first administrator when no account exists yet.
    ///
    /// `provided_token` must match the configured bootstrap token.
    pub async fn bootstrap_administrator(
        &self,
        provided_token: &str,
        expected_token: &str,
        mut input: NewUserInput,
    ) -> AppResult<User> {
        if expected_token.is_empty() || provided_token != expected_token {
            return Err(AppError::Unauthorized(
                "invalid bootstrap token".to_owned(),
            ));
        }

        if self.repository.count().await? > 0 {
            return Err(AppError::Conflict(
                "bootstrap is only available before the first user exists".to_owned(),
            ));
        }

        input.role = UserRole::Administrator;
        let user = self.create_unchecked(input).await?;
        info!(user_id = %user.id, "bootstrap administrator created");
        Ok(user)
    }

    /// Returns the current identity of a stored user, if still active.
    pub async fn active_identity(&self, user_id: Uuid) -> AppResult<Option<UserIdentity>> {
        Ok(self
            .repository
            .find_by_id(user_id)
            .await?
            .filter(|user| user.is_active)
            .map(|user| user.identity()))
    }

    async fn create_unchecked(&self, input: NewUserInput) -> AppResult<User> {
        let full_name = input.full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(AppError::Validation("full_name is required".to_owned()));
        }

        let username = Username::new(input.username)?;
        let email = EmailAddress::new(input.email)?;
        validate_password(&input.password)?;

        if self
            .repository
            .find_by_username(username.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username.as_str()
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            full_name,
            username,
            email,
            role: input.role,
            password_hash: self.password_hasher.hash_password(&input.password)?,
            is_active: true,
        };
        self.repository.insert(&user).await?;
        Ok(user)
    }
}
