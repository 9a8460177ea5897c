use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Recipient not found")]
    RecipientNotFound,

    #[error("Attachment '{path}' could not be read: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotificationError {
    pub fn invalid_address(address: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            message: message.to_string(),
        }
    }

    /// Failures that a retry with the same input could fix.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SendFailed(_))
    }
}
