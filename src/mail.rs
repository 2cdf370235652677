//! Outgoing mail. The transport is installed after startup, so callers go
//! through a [`MailerSlot`] that reports [`MailError::NotReady`] until then.

use async_trait::async_trait;
use derive_more::Display;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Display, PartialEq)]
pub enum MailError {
    #[display(fmt = "mail transport is not ready")]
    NotReady,
    #[display(fmt = "mail delivery failed: {}", _0)]
    Delivery(String),
}

impl std::error::Error for MailError {}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &Mail) -> Result<(), MailError>;
}

/// Writes every message to the log instead of delivering it.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        info!(
            from = %self.from,
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.html,
            "[EMAIL] message logged"
        );
        Ok(())
    }
}

/// Lazily filled holder for the process-wide mail transport.
#[derive(Default)]
pub struct MailerSlot {
    inner: OnceCell<Arc<dyn Mailer>>,
}

impl MailerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the transport. Returns `false` if one was already installed.
    pub fn install(&self, mailer: Arc<dyn Mailer>) -> bool {
        self.inner.set(mailer).is_ok()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }

    pub async fn send(&self, mail: Mail) -> Result<(), MailError> {
        let mailer = self.inner.get().cloned().ok_or(MailError::NotReady)?;
        mailer.send(&mail).await
    }
}

/// Installs the logging transport; run once at startup.
pub async fn init_log_mailer(slot: &MailerSlot, from: String) {
    if slot.install(Arc::new(LogMailer::new(from))) {
        info!("Email system ready (log transport)");
    } else {
        warn!("Mail transport already installed, keeping the existing one");
    }
}

pub fn verification_mail(to: &str, link: &str) -> Mail {
    Mail {
        to: to.to_string(),
        subject: "Verify Your Account".to_string(),
        html: format!("<p>Welcome! Click here to verify: <a href=\"{link}\">{link}</a></p>"),
    }
}
