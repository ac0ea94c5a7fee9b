//! SMTP email adapter using `lettre`.

use async_trait::async_trait;
use hrms_application::EmailService;
use hrms_core::{AppError, AppResult, NetworkErrorKind};
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpEmailConfig {
    /// Relay hostname.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Sender address, optionally with a display name.
    pub from_address: String,
}

/// Sends email through an authenticated SMTP relay.
#[derive(Clone)]
pub struct SmtpEmailService {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    /// Validates the sender and builds the relay transport.
    pub fn new(config: SmtpEmailConfig) -> AppResult<Self> {
        let from = config.from_address.parse::<Mailbox>().map_err(|error| {
            AppError::Validation(format!(
                "invalid SMTP from address '{}': {error}",
                config.from_address
            ))
        })?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|error| {
                AppError::network(
                    NetworkErrorKind::Tls,
                    format!("failed to configure SMTP relay '{}': {error}", config.host),
                )
            })?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self { from, mailer })
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        let recipient = to.parse::<Mailbox>().map_err(|error| {
            AppError::Validation(format!("invalid recipient address '{to}': {error}"))
        })?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject);
        let message = match html_body {
            Some(html_body) => builder.multipart(MultiPart::alternative_plain_html(
                text_body.to_owned(),
                html_body.to_owned(),
            )),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(text_body.to_owned()),
        }
        .map_err(|error| AppError::Internal(format!("failed to build email: {error}")))?;

        self.mailer.send(message).await.map_err(|error| {
            AppError::network(NetworkErrorKind::Email, format!("failed to send email: {error}"))
        })?;

        Ok(())
    }
}
