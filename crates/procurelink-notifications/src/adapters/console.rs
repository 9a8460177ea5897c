use async_trait::async_trait;
use tracing::info;

use super::Mailer;
use crate::error::NotificationError;
use crate::types::{EmailMessage, SendResult};

/// Writes emails to the log instead of sending them.
#[derive(Debug, Clone)]
pub struct ConsoleMailer {
    from: String,
}

impl ConsoleMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: &EmailMessage) -> Result<SendResult, NotificationError> {
        let to = message.recipient()?;
        info!(
            from = message.from.as_deref().unwrap_or(&self.from),
            to = %to,
            subject = %message.subject,
            attachments = message.attachments.len(),
            body = %message.body,
            "Email (console backend)"
        );
        Ok(SendResult {
            message_id: None,
            backend: self.backend_name(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "console"
    }
}
