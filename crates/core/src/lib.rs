//! Shared primitives for all Rust crates in the HRMS backend.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{UserIdentity, UserRole};

/// Result type used across HRMS crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Category of a transient network failure.
///
/// Retry policies select which kinds they retry; the API maps each kind to a
/// distinct status code and user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    /// Host name resolution failed.
    Dns,
    /// Socket level failure: refused, reset, aborted, timed out.
    Connection,
    /// TLS handshake or certificate failure.
    Tls,
    /// Outbound HTTP request failure.
    Http,
    /// SMTP delivery failure.
    Email,
    /// Shared cache (Redis) failure.
    Cache,
}

impl NetworkErrorKind {
    /// Every network error kind.
    pub const ALL: [Self; 6] = [
        Self::Dns,
        Self::Connection,
        Self::Tls,
        Self::Http,
        Self::Email,
        Self::Cache,
    ];

    /// Returns the stable log value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::Connection => "connection",
            Self::Tls => "tls",
            Self::Http => "http",
            Self::Email => "email",
            Self::Cache => "cache",
        }
    }
}

impl Display for NetworkErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated or not allowed to access a resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Caller exceeded an attempt quota and must wait.
    #[error("You have exceeded the maximum attempts. Try again in {wait_seconds} seconds.")]
    RateLimited {
        /// Seconds until the caller may try again.
        wait_seconds: u64,
    },

    /// Transient failure talking to a network collaborator.
    #[error("{kind} network error: {message}")]
    Network {
        /// Failure category.
        kind: NetworkErrorKind,
        /// Adapter-provided detail.
        message: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a network error of the given kind.
    #[must_use]
    pub fn network(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self::Network {
            kind,
            message: message.into(),
        }
    }

    /// Returns the network error kind when this error is transient.
    #[must_use]
    pub fn network_kind(&self) -> Option<NetworkErrorKind> {
        match self {
            Self::Network { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
