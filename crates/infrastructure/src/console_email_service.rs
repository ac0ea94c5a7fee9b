//! Development email adapter that writes messages to the log.

use async_trait::async_trait;
use hrms_application::EmailService;
use hrms_core::AppResult;
use tracing::info;

/// Logs outgoing email instead of sending it. Login codes appear in the
/// API log, so this adapter is for local development only.
#[derive(Debug, Clone, Default)]
pub struct ConsoleEmailService;

impl ConsoleEmailService {
    /// Creates a console email service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailService for ConsoleEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        info!(
            to,
            subject,
            has_html = html_body.is_some(),
            "email (console)\n{text_body}"
        );

        Ok(())
    }
}
