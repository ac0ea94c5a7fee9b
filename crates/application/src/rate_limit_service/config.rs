use std::net::IpAddr;

use hrms_core::UserIdentity;

/// Throttle scope attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrottleScope {
    /// Keys anonymous callers by client IP; authenticated callers are exempt.
    Anonymous,
    /// Keys authenticated callers by user id, anonymous callers by client IP.
    User,
}

impl ThrottleScope {
    /// Returns the stable scope name used in cache keys and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "custom_anon",
            Self::User => "custom_user",
        }
    }

    /// Derives the caller identity for this scope.
    ///
    /// `None` means the scope does not apply and the request is allowed.
    #[must_use]
    pub fn identity_key(
        &self,
        user: Option<&UserIdentity>,
        client_ip: Option<IpAddr>,
    ) -> Option<String> {
        match (self, user) {
            (Self::Anonymous, Some(_)) => None,
            (Self::User, Some(user)) => Some(format!("user:{}", user.user_id())),
            (_, None) => client_ip.map(|ip| format!("ip:{ip}")),
        }
    }
}

/// Quota and lockout parameters of one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Scope the policy applies to.
    pub scope: ThrottleScope,
    /// Sliding window length in seconds.
    pub window_seconds: u32,
    /// Attempts allowed inside one window.
    pub max_attempts: u32,
    /// Lockout length in seconds once the quota is exceeded.
    pub lockout_seconds: u32,
    /// Expiry of the stored attempt record in seconds.
    pub record_ttl_seconds: u32,
}

impl ThrottlePolicy {
    /// Default policy: 3 attempts per 60 seconds, then 180 seconds locked.
    #[must_use]
    pub fn for_scope(scope: ThrottleScope) -> Self {
        Self {
            scope,
            window_seconds: 60,
            max_attempts: 3,
            lockout_seconds: 180,
            record_ttl_seconds: 180,
        }
    }

    /// Returns the store key of an identity under this scope.
    #[must_use]
    pub fn cache_key(&self, identity_key: &str) -> String {
        format!("throttle_{}_{identity_key}", self.scope.as_str())
    }
}
