pub mod console;
pub mod outbox;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NotificationError;
use crate::settings::{EmailSettings, MailerBackend};
use crate::types::{EmailMessage, SendResult};

/// Outbound email transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one email
    async fn send(&self, message: &EmailMessage) -> Result<SendResult, NotificationError>;

    /// Check that the backend is reachable
    async fn test_connection(&self) -> Result<(), NotificationError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str;
}

pub type DynMailer = Arc<dyn Mailer>;

/// Builds the mailer selected by `settings.backend`.
pub fn build_mailer(settings: &EmailSettings) -> Result<DynMailer, NotificationError> {
    let mailer: DynMailer = match settings.backend {
        MailerBackend::Smtp => {
            let smtp = settings
                .smtp
                .as_ref()
                .ok_or_else(|| NotificationError::InvalidConfig("Missing [email.smtp]".into()))?;
            Arc::new(SmtpMailer::new(
                smtp,
                &settings.from,
                settings.reply_to.as_deref(),
            )?)
        }
        MailerBackend::Console => Arc::new(ConsoleMailer::new(settings.from.clone())),
        MailerBackend::Outbox => Arc::new(OutboxMailer::new()),
    };
    tracing::debug!(backend = mailer.backend_name(), "Mailer configured");
    Ok(mailer)
}

pub use console::ConsoleMailer;
pub use outbox::OutboxMailer;
pub use smtp::SmtpMailer;
