//! # Harvest Auth Mailer
//!
//! [`MailDispatcher`] implementations: an SMTP dispatcher over lettre for
//! deployments, a log-only dispatcher for development, and an in-memory
//! recording dispatcher for tests.

use async_trait::async_trait;
use harvest_auth_core::error::{RecoveryError, RecoveryResult};
use harvest_auth_core::traits::{MailDispatcher, MailMessage, MailReceipt};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Connection settings for the SMTP dispatcher.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay host.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Relay username.
    pub username: String,
    /// Relay password.
    pub password: String,
    /// Sender address, e.g. `"Harvest Market <no-reply@harvest.example>"`.
    pub from: String,
}

/// SMTP mail dispatcher backed by lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Creates a new SMTP dispatcher from the given settings.
    pub fn new(config: &SmtpConfig) -> RecoveryResult<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|_| RecoveryError::config(format!("invalid sender address: {}", config.from)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|err| RecoveryError::config(format!("invalid SMTP relay: {}", err)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailDispatcher for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> RecoveryResult<MailReceipt> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|_| RecoveryError::email(format!("invalid recipient: {}", message.to)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject)
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|err| RecoveryError::email(err.to_string()))?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|err| RecoveryError::email(err.to_string()))?;

        debug!(to = %message.to, "smtp send accepted");
        Ok(MailReceipt {
            queued: true,
            provider_confirmed: response.is_positive(),
        })
    }
}

/// A dispatcher that only logs, for development environments without an
/// SMTP relay. Reports the send as queued but unconfirmed.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    /// Creates a new log-only dispatcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailDispatcher for LogMailer {
    async fn send(&self, message: &MailMessage) -> RecoveryResult<MailReceipt> {
        info!(to = %message.to, subject = %message.subject, "mail send skipped (log-only dispatcher)");
        Ok(MailReceipt::unconfirmed())
    }
}

/// An in-memory dispatcher for tests: records every message and can be
/// switched into a failing mode.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<RwLock<Vec<MailMessage>>>,
    failing: Arc<RwLock<bool>>,
}

impl MemoryMailer {
    /// Creates a new recording dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail (or succeed again).
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    /// Returns copies of every message sent so far.
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.sent.read().await.clone()
    }

    /// Returns the most recently sent message.
    pub async fn last(&self) -> Option<MailMessage> {
        self.sent.read().await.last().cloned()
    }
}

#[async_trait]
impl MailDispatcher for MemoryMailer {
    async fn send(&self, message: &MailMessage) -> RecoveryResult<MailReceipt> {
        if *self.failing.read().await {
            return Err(RecoveryError::email("relay rejected the message"));
        }
        self.sent.write().await.push(message.clone());
        Ok(MailReceipt::confirmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> MailMessage {
        MailMessage::new(
            "alice@example.com",
            "Your verification code",
            "<p>042317</p>",
            "042317",
        )
    }

    #[tokio::test]
    async fn test_memory_mailer_records_sends() {
        let mailer = MemoryMailer::new();
        mailer.send(&sample_message()).await.unwrap();

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
    }

    #[tokio::test]
    async fn test_memory_mailer_failing_mode() {
        let mailer = MemoryMailer::new();
        mailer.set_failing(true).await;

        assert!(mailer.send(&sample_message()).await.is_err());
        assert!(mailer.sent().await.is_empty());

        mailer.set_failing(false).await;
        assert!(mailer.send(&sample_message()).await.is_ok());
    }

    #[tokio::test]
    async fn test_log_mailer_reports_unconfirmed() {
        let receipt = LogMailer::new().send(&sample_message()).await.unwrap();
        assert!(receipt.queued);
        assert!(!receipt.provider_confirmed);
    }

    #[test]
    fn test_smtp_mailer_rejects_bad_sender() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 465,
            username: "mailer".to_string(),
            password: "secret".to_string(),
            from: "not an address".to_string(),
        };
        assert!(SmtpMailer::new(&config).is_err());
    }
}
