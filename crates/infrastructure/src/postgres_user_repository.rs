//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use hrms_application::{Page, PageRequest, UserRepository};
use hrms_core::{AppError, AppResult, UserRole};
use hrms_domain::{EmailAddress, User, Username};

use crate::postgres_error::conflict_or_internal;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    full_name: String,
    username: String,
    email: String,
    role: String,
    password_hash: String,
    is_active: bool,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let invalid = |error: AppError| {
            AppError::Internal(format!("stored user '{}' is invalid: {error}", row.id))
        };

        Ok(Self {
            id: row.id,
            full_name: row.full_name.clone(),
            username: Username::new(row.username.as_str()).map_err(invalid)?,
            email: EmailAddress::new(row.email.as_str()).map_err(invalid)?,
            role: UserRole::parse_transport(&row.role).map_err(invalid)?,
            password_hash: row.password_hash.clone(),
            is_active: row.is_active,
        })
    }
}

const USER_COLUMNS: &str = "id, full_name, username, email, role, password_hash, is_active";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by username: {error}")))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user '{user_id}': {error}")))?;

        row.map(User::try_from).transpose()
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, username, email, role, password_hash, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(user.full_name.as_str())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.role.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.is_active)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            conflict_or_internal(
                error,
                "an account with this username or email already exists".to_owned(),
                "insert user",
            )
        })?;

        Ok(())
    }

    async fn list(&self, page: PageRequest) -> AppResult<Page<User>> {
        let offset = i64::try_from(page.offset())
            .map_err(|error| AppError::Validation(format!("invalid user page offset: {error}")))?;

        let total = self.count().await?;
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.page_size()))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(User::try_from)
                .collect::<AppResult<Vec<_>>>()?,
            total,
            request: page,
        })
    }

    async fn count(&self) -> AppResult<u64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count users: {error}")))?;

        Ok(u64::try_from(total).unwrap_or(0))
    }
}
