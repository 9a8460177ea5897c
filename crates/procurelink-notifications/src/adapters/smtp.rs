use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use super::Mailer;
use crate::error::NotificationError;
use crate::settings::{SmtpSettings, SmtpTls};
use crate::types::{EmailMessage, SendResult};

/// Sends email through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    reply_to: Option<Mailbox>,
}

impl SmtpMailer {
    /// Builds the transport. No connection is opened until the first send.
    pub fn new(
        settings: &SmtpSettings,
        from: &str,
        reply_to: Option<&str>,
    ) -> Result<Self, NotificationError> {
        if settings.host.trim().is_empty() {
            return Err(NotificationError::InvalidConfig("Missing smtp host".into()));
        }

        let mut builder = match settings.tls {
            SmtpTls::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host),
            SmtpTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            }
            SmtpTls::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                &settings.host,
            )),
        }
        .map_err(|e| NotificationError::InvalidConfig(e.to_string()))?
        .port(settings.port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(from)?,
            reply_to: reply_to.map(parse_mailbox).transpose()?,
        })
    }

    /// Converts an [`EmailMessage`] into a MIME message.
    pub fn build_message(&self, message: &EmailMessage) -> Result<Message, NotificationError> {
        message.recipient()?;

        let from = match &message.from {
            Some(from) => parse_mailbox(from)?,
            None => self.from.clone(),
        };
        let mut builder = Message::builder().from(from).subject(message.subject.clone());
        for to in &message.to {
            builder = builder.to(parse_mailbox(to)?);
        }
        let reply_to = match &message.reply_to {
            Some(reply_to) => Some(parse_mailbox(reply_to)?),
            None => self.reply_to.clone(),
        };
        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(reply_to);
        }

        let content = match &message.html_body {
            Some(html) => MultiPart::alternative_plain_html(message.body.clone(), html.clone()),
            None => MultiPart::mixed().singlepart(SinglePart::plain(message.body.clone())),
        };
        let mut body = MultiPart::mixed().multipart(content);
        for attachment in &message.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| NotificationError::Internal(e.to_string()))?;
            body = body.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.data.clone(), content_type),
            );
        }

        builder
            .multipart(body)
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .trim()
        .parse()
        .map_err(|e| NotificationError::invalid_address(address, e))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<SendResult, NotificationError> {
        let email = self.build_message(message)?;
        debug!(to = ?message.to, subject = %message.subject, "Sending email via SMTP");

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        info!(to = ?message.to, attachments = message.attachments.len(), "Email sent");
        Ok(SendResult {
            message_id: Some(response.message().collect::<Vec<_>>().join(" ")),
            backend: self.backend_name(),
        })
    }

    async fn test_connection(&self) -> Result<(), NotificationError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(NotificationError::SendFailed(
                "SMTP server rejected the connection".into(),
            )),
            Err(e) => Err(NotificationError::SendFailed(e.to_string())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "smtp"
    }
}
