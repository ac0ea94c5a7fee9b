//! Two-step login: password check, then a one-time code sent by email.
//!
//! A successful password check caches a SHA-256 of a fresh six digit code
//! under `otp:<user_id>` and a temporary token `otp_token:<uuid>` pointing
//! at the user. Both expire after five minutes. Verifying the code consumes
//! both entries and yields the session identity.

use std::sync::Arc;

use async_trait::async_trait;
use hrms_core::{AppError, AppResult, UserIdentity};
use hrms_domain::User;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::retry::RetryPolicy;
use crate::user_service::{PasswordHasher, UserRepository};

#[cfg(test)]
mod tests;

/// Lifetime of cached codes and temporary tokens, in seconds.
pub const OTP_TTL_SECONDS: u32 = 300;

/// Prefix of temporary login tokens.
pub const TEMP_TOKEN_PREFIX: &str = "otp_token:";

/// Response detail of a started login.
pub const OTP_SENT_MESSAGE: &str = "OTP sent to your email.";

const INVALID_CREDENTIALS: &str = "Invalid credentials.";
const INVALID_OTP: &str = "Invalid OTP. Please start the login process again.";
const TOKEN_EXPIRED: &str = "Token expired or invalid. Please start the login process again.";
const SESSION_EXPIRED: &str = "Your session has expired. Please start the login process again.";

/// Shared short-lived key/value cache.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Stores a value with an expiry.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u32) -> AppResult<()>;

    /// Reads a live value.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Removes a value; missing keys are not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Outbound email port.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends a plain-text email with an optional HTML alternative.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()>;
}

/// First login step result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginChallenge {
    /// Token the client echoes back with the emailed code.
    pub temp_token: String,
}

/// Application service for the OTP login flow.
#[derive(Clone)]
pub struct LoginService {
    users: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    cache: Arc<dyn TokenCache>,
    email_service: Arc<dyn EmailService>,
    cache_retry: RetryPolicy,
    email_retry: RetryPolicy,
}

impl LoginService {
    /// Creates a login service with the default retry policies.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        cache: Arc<dyn TokenCache>,
        email_service: Arc<dyn EmailService>,
    ) -> Self {
        Self {
            users,
            password_hasher,
            cache,
            email_service,
            cache_retry: RetryPolicy::network(),
            email_retry: RetryPolicy::email(),
        }
    }

    /// Replaces both retry policies.
    #[must_use]
    pub fn with_retry_policies(mut self, cache_retry: RetryPolicy, email_retry: RetryPolicy) -> Self {
        self.cache_retry = cache_retry;
        self.email_retry = email_retry;
        self
    }

    /// Verifies credentials and emails a one-time code.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginChallenge> {
        let user = self.users.find_by_username(username.trim()).await?;

        let Some(user) = user.filter(|user| user.is_active) else {
            let _ = self.password_hasher.hash_password(password);
            warn!("login rejected: unknown or inactive user");
            return Err(AppError::Validation(INVALID_CREDENTIALS.to_owned()));
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(AppError::Validation(INVALID_CREDENTIALS.to_owned()));
        }

        self.send_challenge(&user).await?;

        let temp_token = format!("{TEMP_TOKEN_PREFIX}{}", Uuid::new_v4());
        let user_id = user.id.to_string();
        self.cache_retry
            .run("cache_temp_token", || {
                self.cache
                    .set(temp_token.as_str(), user_id.as_str(), OTP_TTL_SECONDS)
            })
            .await?;

        info!(user_id = %user.id, "otp challenge issued");
        Ok(LoginChallenge { temp_token })
    }

    /// Checks the emailed code against the temporary token.
    pub async fn verify_otp(&self, temp_token: &str, otp: &str) -> AppResult<UserIdentity> {
        let temp_token = temp_token.trim();
        let otp = otp.trim();

        if temp_token.is_empty() || otp.is_empty() {
            if !temp_token.is_empty() {
                self.delete_cached(temp_token).await?;
            }
            return Err(AppError::Validation(INVALID_OTP.to_owned()));
        }

        let user = self
            .resolve_temp_token(temp_token)
            .await?
            .ok_or_else(|| AppError::Validation(TOKEN_EXPIRED.to_owned()))?;

        let otp_key = otp_cache_key(user.id);
        let stored_hash = self
            .cache_retry
            .run("get_otp", || self.cache.get(otp_key.as_str()))
            .await?;

        if stored_hash.as_deref() != Some(hash_otp(otp).as_str()) {
            warn!(user_id = %user.id, "otp verification failed");
            return Err(AppError::Validation(TOKEN_EXPIRED.to_owned()));
        }

        self.delete_cached(&otp_key).await?;
        self.delete_cached(temp_token).await?;

        info!(user_id = %user.id, "otp verified");
        Ok(user.identity())
    }

    /// Sends a fresh code for a still-valid temporary token.
    pub async fn resend_otp(&self, temp_token: &str) -> AppResult<LoginChallenge> {
        let temp_token = temp_token.trim();
        let user = if temp_token.is_empty() {
            None
        } else {
            self.resolve_temp_token(temp_token).await?
        };

        let Some(user) = user else {
            return Err(AppError::Validation(SESSION_EXPIRED.to_owned()));
        };

        self.send_challenge(&user).await?;
        Ok(LoginChallenge {
            temp_token: temp_token.to_owned(),
        })
    }

    async fn resolve_temp_token(&self, temp_token: &str) -> AppResult<Option<User>> {
        let cached = self
            .cache_retry
            .run("get_temp_token", || self.cache.get(temp_token))
            .await?;

        let Some(user_id) = cached.and_then(|value| Uuid::parse_str(&value).ok()) else {
            return Ok(None);
        };

        Ok(self
            .users
            .find_by_id(user_id)
            .await?
            .filter(|user| user.is_active))
    }

    async fn send_challenge(&self, user: &User) -> AppResult<()> {
        let otp = generate_otp()?;
        let otp_key = otp_cache_key(user.id);
        let otp_hash = hash_otp(&otp);

        self.cache_retry
            .run("cache_otp", || {
                self.cache
                    .set(otp_key.as_str(), otp_hash.as_str(), OTP_TTL_SECONDS)
            })
            .await?;

        let body = format!(
            "Hello {},\n\nYour verification code is {otp}. It expires in 5 minutes.\n",
            user.full_name
        );
        let result = self
            .email_retry
            .run("send_otp_email", || {
                self.email_service.send_email(
                    user.email.as_str(),
                    "Your login verification code",
                    body.as_str(),
                    None,
                )
            })
            .await;

        if let Err(error) = result {
            self.delete_cached(&otp_key).await?;
            return Err(error);
        }

        Ok(())
    }

    async fn delete_cached(&self, key: &str) -> AppResult<()> {
        self.cache_retry
            .run("delete_cached_token", || self.cache.delete(key))
            .await
    }
}

fn otp_cache_key(user_id: Uuid) -> String {
    format!("otp:{user_id}")
}

/// Generates a uniformly distributed six digit code.
fn generate_otp() -> AppResult<String> {
    const LIMIT: u32 = u32::MAX - (u32::MAX % 1_000_000);

    loop {
        let mut bytes = [0u8; 4];
        getrandom::fill(&mut bytes)
            .map_err(|error| AppError::Internal(format!("failed to generate otp: {error}")))?;
        let value = u32::from_le_bytes(bytes);
        if value < LIMIT {
            return Ok(format!("{:06}", value % 1_000_000));
        }
    }
}

fn hash_otp(otp: &str) -> String {
    use std::fmt::Write;

    Sha256::digest(otp.as_bytes())
        .iter()
        .fold(String::with_capacity(64), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
