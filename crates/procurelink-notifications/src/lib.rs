//! Outbound email for procurement automation: mailer backends, `{{var}}`
//! templates and the RFQ message composer.

pub mod adapters;
pub mod error;
pub mod rfq;
pub mod settings;
pub mod templates;
pub mod types;

pub use adapters::{
    build_mailer, ConsoleMailer, DynMailer, Mailer, OutboxMailer, SmtpMailer,
};
pub use error::NotificationError;
pub use rfq::RfqComposer;
pub use settings::{EmailSettings, MailerBackend, SmtpSettings, SmtpTls};
pub use templates::{RenderedContent, Template, TemplateRenderer};
pub use types::*;
