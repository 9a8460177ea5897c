use serde::{Deserialize, Serialize};

use crate::error::NotificationError;

fn default_from() -> String {
    "noreply@company.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

/// Which mailer implementation to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailerBackend {
    Smtp,
    #[default]
    Console,
    Outbox,
}

/// Transport security for SMTP connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Implicit TLS (usually port 465)
    Wrapper,
    #[default]
    StartTls,
    /// Plain text, for local relays only
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub tls: SmtpTls,
}

/// The `[email]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub backend: MailerBackend,
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub smtp: Option<SmtpSettings>,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            backend: MailerBackend::default(),
            from: default_from(),
            reply_to: None,
            smtp: None,
        }
    }
}

impl EmailSettings {
    pub fn validate(&self) -> Result<(), NotificationError> {
        if !self.from.contains('@') {
            return Err(NotificationError::invalid_address(
                &self.from,
                "sender must be an email address",
            ));
        }
        if self.backend == MailerBackend::Smtp {
            match &self.smtp {
                None => {
                    return Err(NotificationError::InvalidConfig(
                        "email.backend = \"smtp\" requires [email.smtp]".into(),
                    ))
                }
                Some(smtp) if smtp.host.trim().is_empty() => {
                    return Err(NotificationError::InvalidConfig(
                        "email.smtp.host must not be empty".into(),
                    ))
                }
                Some(smtp) if smtp.username.is_some() != smtp.password.is_some() => {
                    return Err(NotificationError::InvalidConfig(
                        "email.smtp.username and email.smtp.password must be set together".into(),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EmailSettings::default();
        assert_eq!(settings.backend, MailerBackend::Console);
        assert_eq!(settings.from, "noreply@company.com");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_smtp_requires_section() {
        let settings = EmailSettings {
            backend: MailerBackend::Smtp,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(NotificationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_smtp_credentials_paired() {
        let settings = EmailSettings {
            backend: MailerBackend::Smtp,
            smtp: Some(SmtpSettings {
                host: "smtp.company.com".into(),
                port: 587,
                username: Some("acquisti".into()),
                password: None,
                tls: SmtpTls::StartTls,
            }),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_deserialize_smtp_section() {
        let settings: EmailSettings = serde_json::from_value(serde_json::json!({
            "backend": "smtp",
            "smtp": { "host": "smtp.company.com", "tls": "wrapper" }
        }))
        .unwrap();
        let smtp = settings.smtp.unwrap();
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.tls, SmtpTls::Wrapper);
    }
}
