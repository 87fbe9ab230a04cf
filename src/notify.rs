//! Notification gateway — outbound operator email via lettre SMTP.
//!
//! The transport is built once at startup and reused; sending is
//! synchronous from the pipeline's perspective because the response
//! message depends on the send result. Blocking SMTP I/O runs on the
//! tokio blocking pool.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::error::NotifyError;

/// Display name used on outgoing notification emails.
const FROM_DISPLAY_NAME: &str = "Portfolio Contact";

// ── Configuration ───────────────────────────────────────────────────

/// Mail configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// `true` → implicit TLS from the first byte; `false` → STARTTLS.
    pub secure: bool,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
    /// Operator inbox that receives submission notifications.
    pub notify_address: String,
}

impl MailConfig {
    /// Build config from environment variables.
    /// Returns `None` if `EMAIL_SMTP_HOST` is not set (notifications disabled).
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("EMAIL_SMTP_HOST").ok()?;

        let smtp_port: u16 = std::env::var("EMAIL_SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(587);

        let secure = std::env::var("EMAIL_SECURE").is_ok_and(|s| s == "true");

        let username = std::env::var("EMAIL_USERNAME").unwrap_or_default();
        let password =
            SecretString::from(std::env::var("EMAIL_PASSWORD").unwrap_or_default());
        let from_address = std::env::var("EMAIL_FROM_ADDRESS").unwrap_or_else(|_| username.clone());
        let notify_address =
            std::env::var("EMAIL_NOTIFY_ADDRESS").unwrap_or_else(|_| from_address.clone());

        Some(Self {
            smtp_host,
            smtp_port,
            secure,
            username,
            password,
            from_address,
            notify_address,
        })
    }
}

// ── Notifier ────────────────────────────────────────────────────────

/// Outbound notification sender.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one notification email to the operator address.
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// SMTP-backed notifier. Transport and addresses are resolved once.
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Build the SMTP transport and resolve both mailboxes.
    pub fn new(config: &MailConfig) -> Result<Self, NotifyError> {
        let builder = if config.secure {
            SmtpTransport::relay(&config.smtp_host)
        } else {
            SmtpTransport::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| NotifyError::Transport(format!("SMTP relay error: {e}")))?;

        let creds = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = builder
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        let from = format!("{FROM_DISPLAY_NAME} <{}>", config.from_address)
            .parse()
            .map_err(|e| NotifyError::InvalidAddress(format!("from: {e}")))?;
        let to = config
            .notify_address
            .parse()
            .map_err(|e| NotifyError::InvalidAddress(format!("to: {e}")))?;

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    /// Probe the SMTP connection. Called once at startup; the result is
    /// logged, never fatal.
    pub async fn verify(&self) -> Result<bool, NotifyError> {
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.test_connection())
            .await
            .map_err(|e| NotifyError::Transport(format!("verify task panicked: {e}")))?
            .map_err(|e| NotifyError::Transport(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| NotifyError::Transport(format!("send task panicked: {e}")))?
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        info!(to = %self.to, "Notification email sent");
        Ok(())
    }
}

/// Notifier used when SMTP is not configured.
///
/// Every send fails with `NotConfigured`, which the pipeline reports as a
/// partial success — the submission is saved either way.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}
