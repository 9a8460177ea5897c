use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Mailer;
use crate::error::NotificationError;
use crate::types::{EmailMessage, SendResult};

/// Keeps sent emails in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct OutboxMailer {
    sent: RwLock<Vec<EmailMessage>>,
    /// Recipients whose sends fail
    rejected: HashSet<String>,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// An outbox that fails every send addressed to one of `recipients`.
    pub fn rejecting(recipients: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            sent: RwLock::default(),
            rejected: recipients.into_iter().map(Into::into).collect(),
        }
    }

    pub async fn messages(&self) -> Vec<EmailMessage> {
        self.sent.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.sent.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sent.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, message: &EmailMessage) -> Result<SendResult, NotificationError> {
        let to = message.recipient()?;
        if self.rejected.contains(to) {
            return Err(NotificationError::SendFailed(format!(
                "recipient {to} rejected"
            )));
        }

        let mut sent = self.sent.write().await;
        sent.push(message.clone());
        Ok(SendResult {
            message_id: Some(format!("outbox-{}", sent.len())),
            backend: self.backend_name(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "outbox"
    }
}
