use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use hrms_core::{AppError, AppResult, NetworkErrorKind, UserRole};

use crate::retry::RetryPolicy;
use crate::test_support::{FakeUserRepository, PlainPasswordHasher};
use crate::user_service::{NewUserInput, UserService};

use super::{EmailService, LoginService, TEMP_TOKEN_PREFIX, TokenCache};

#[derive(Default)]
struct FakeTokenCache {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl TokenCache for FakeTokenCache {
    async fn set(&self, key: &str, value: &str, _ttl_seconds: u32) -> AppResult<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct CapturingEmailService {
    sent: Mutex<Vec<(String, String)>>,
    failures_before_success: AtomicU32,
}

impl CapturingEmailService {
    fn failing(times: u32) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures_before_success: AtomicU32::new(times),
        }
    }

    async fn last_code(&self) -> String {
        let sent = self.sent.lock().await;
        let body = sent.last().map(|(_, body)| body.clone()).unwrap_or_default();
        body.split_whitespace()
            .find_map(|word| {
                let digits = word.trim_end_matches('.');
                (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_digit()))
                    .then(|| digits.to_owned())
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmailService for CapturingEmailService {
    async fn send_email(
        &self,
        to: &str,
        _subject: &str,
        text_body: &str,
        _html_body: Option<&str>,
    ) -> AppResult<()> {
        let remaining = self.failures_before_success.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_before_success
                .store(remaining - 1, Ordering::SeqCst);
            return Err(AppError::network(
                NetworkErrorKind::Email,
                "smtp connection reset",
            ));
        }

        self.sent
            .lock()
            .await
            .push((to.to_owned(), text_body.to_owned()));
        Ok(())
    }
}

struct Harness {
    service: LoginService,
    cache: Arc<FakeTokenCache>,
    email: Arc<CapturingEmailService>,
}

fn instant_retry(retry_on: &'static [NetworkErrorKind]) -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO, Duration::ZERO, Duration::ZERO, retry_on)
}

async fn harness_with_email(email: CapturingEmailService) -> Harness {
    let users = Arc::new(FakeUserRepository::default());
    let hasher = Arc::new(PlainPasswordHasher);
    let user_service = UserService::new(users.clone(), hasher.clone());
    let created = user_service
        .bootstrap_administrator(
            "token",
            "token",
            NewUserInput {
                full_name: "Ama Serwaa".to_owned(),
                username: "ama".to_owned(),
                email: "ama@example.com".to_owned(),
                role: UserRole::Administrator,
                password: "correct-horse-battery".to_owned(),
            },
        )
        .await;
    assert!(created.is_ok());

    let cache = Arc::new(FakeTokenCache::default());
    let email = Arc::new(email);
    let service = LoginService::new(users, hasher, cache.clone(), email.clone())
        .with_retry_policies(
            instant_retry(&NetworkErrorKind::ALL),
            instant_retry(&[NetworkErrorKind::Email]),
        );

    Harness {
        service,
        cache,
        email,
    }
}

async fn harness() -> Harness {
    harness_with_email(CapturingEmailService::default()).await
}

#[tokio::test]
async fn login_emails_code_and_issues_temp_token() -> AppResult<()> {
    let harness = harness().await;

    let challenge = harness.service.login("ama", "correct-horse-battery").await?;
    assert!(challenge.temp_token.starts_with(TEMP_TOKEN_PREFIX));

    let sent = harness.email.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "ama@example.com");
    drop(sent);

    let code = harness.email.last_code().await;
    assert_eq!(code.len(), 6);

    let entries = harness.cache.entries.lock().await;
    assert!(entries.contains_key(&challenge.temp_token));
    assert!(!entries.values().any(|value| value == &code));
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let harness = harness().await;

    for (username, password) in [("ama", "wrong-password!"), ("nobody", "whatever-pass")] {
        let result = harness.service.login(username, password).await;
        assert!(matches!(
            result,
            Err(AppError::Validation(message)) if message == "Invalid credentials."
        ));
    }
    assert!(harness.email.sent.lock().await.is_empty());
}

#[tokio::test]
async fn correct_code_yields_identity_and_consumes_tokens() -> AppResult<()> {
    let harness = harness().await;
    let challenge = harness.service.login("ama", "correct-horse-battery").await?;
    let code = harness.email.last_code().await;

    let identity = harness
        .service
        .verify_otp(&challenge.temp_token, &code)
        .await?;
    assert_eq!(identity.username(), "ama");
    assert_eq!(identity.role(), UserRole::Administrator);
    assert!(harness.cache.entries.lock().await.is_empty());

    let replay = harness.service.verify_otp(&challenge.temp_token, &code).await;
    assert!(matches!(
        replay,
        Err(AppError::Validation(message)) if message.starts_with("Token expired or invalid")
    ));
    Ok(())
}

#[tokio::test]
async fn wrong_code_keeps_the_temp_token() -> AppResult<()> {
    let harness = harness().await;
    let challenge = harness.service.login("ama", "correct-horse-battery").await?;
    let code = harness.email.last_code().await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let result = harness.service.verify_otp(&challenge.temp_token, wrong).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(
        harness
            .cache
            .entries
            .lock()
            .await
            .contains_key(&challenge.temp_token)
    );
    Ok(())
}

#[tokio::test]
async fn missing_code_discards_the_temp_token() -> AppResult<()> {
    let harness = harness().await;
    let challenge = harness.service.login("ama", "correct-horse-battery").await?;

    let result = harness.service.verify_otp(&challenge.temp_token, " ").await;
    assert!(matches!(
        result,
        Err(AppError::Validation(message)) if message.starts_with("Invalid OTP")
    ));
    assert!(
        !harness
            .cache
            .entries
            .lock()
            .await
            .contains_key(&challenge.temp_token)
    );
    Ok(())
}

#[tokio::test]
async fn resend_replaces_the_code() -> AppResult<()> {
    let harness = harness().await;
    let challenge = harness.service.login("ama", "correct-horse-battery").await?;

    let resent = harness.service.resend_otp(&challenge.temp_token).await?;
    assert_eq!(resent.temp_token, challenge.temp_token);
    assert_eq!(harness.email.sent.lock().await.len(), 2);

    let code = harness.email.last_code().await;
    assert!(
        harness
            .service
            .verify_otp(&challenge.temp_token, &code)
            .await
            .is_ok()
    );
    Ok(())
}

#[tokio::test]
async fn resend_with_unknown_token_reports_expired_session() {
    let harness = harness().await;
    let result = harness.service.resend_otp("otp_token:unknown").await;
    assert!(matches!(
        result,
        Err(AppError::Validation(message)) if message.starts_with("Your session has expired")
    ));
}

#[tokio::test]
async fn transient_email_failure_is_retried() -> AppResult<()> {
    let harness = harness_with_email(CapturingEmailService::failing(2)).await;
    harness.service.login("ama", "correct-horse-battery").await?;
    assert_eq!(harness.email.sent.lock().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn exhausted_email_retries_surface_and_leave_no_code() {
    let harness = harness_with_email(CapturingEmailService::failing(5)).await;
    let result = harness.service.login("ama", "correct-horse-battery").await;

    assert_eq!(
        result.err().and_then(|error| error.network_kind()),
        Some(NetworkErrorKind::Email)
    );
    assert!(harness.cache.entries.lock().await.is_empty());
}
