//! Request-for-quotation emails sent to suppliers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use procurelink_core::model::{Rfq, Supplier, TargetRecord};
use procurelink_core::time::format_date_it;
use serde_json::json;
use tracing::warn;

use crate::error::NotificationError;
use crate::templates::{TemplateRenderer, RFQ_GENERIC, RFQ_PLANT, RFQ_VEHICLE};
use crate::types::{EmailAttachment, EmailMessage};

/// Builds the email asking one supplier to quote on an RFQ.
pub struct RfqComposer {
    renderer: TemplateRenderer,
    /// Base directory for relative document paths
    documents_root: Option<PathBuf>,
}

impl Default for RfqComposer {
    fn default() -> Self {
        Self::new(TemplateRenderer::default())
    }
}

impl RfqComposer {
    pub fn new(renderer: TemplateRenderer) -> Self {
        Self {
            renderer,
            documents_root: None,
        }
    }

    pub fn with_documents_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.documents_root = Some(root.into());
        self
    }

    /// Renders the message for `supplier`. Vehicle registration documents are
    /// attached when readable; unreadable ones are skipped with a warning.
    pub async fn compose(
        &self,
        rfq: &Rfq,
        supplier: &Supplier,
        target: Option<&TargetRecord>,
    ) -> Result<EmailMessage, NotificationError> {
        let to = supplier
            .contact_email()
            .ok_or(NotificationError::RecipientNotFound)?;

        let (template, asset_line) = match target {
            Some(TargetRecord::Vehicle(v)) => (
                RFQ_VEHICLE,
                format!("Automezzo: {} {} {}", v.plate, v.brand, v.model)
                    .trim_end()
                    .to_string(),
            ),
            Some(TargetRecord::Plant(p)) => (
                RFQ_PLANT,
                format!("Stabilimento: {} {}", p.name, p.address)
                    .trim_end()
                    .to_string(),
            ),
            None => (RFQ_GENERIC, String::new()),
        };

        let mut data = HashMap::new();
        data.insert("title".to_string(), json!(rfq.title));
        data.insert("number".to_string(), json!(rfq.number));
        data.insert("description".to_string(), json!(rfq.description));
        data.insert("supplier".to_string(), json!(supplier.name));
        data.insert(
            "asset".to_string(),
            json!(target.map(TargetRecord::label).unwrap_or_default()),
        );
        data.insert("asset_line".to_string(), json!(asset_line));
        data.insert(
            "deadline".to_string(),
            json!(rfq
                .deadline
                .map(format_date_it)
                .unwrap_or_else(|| "da concordare".to_string())),
        );

        let rendered = self.renderer.render(template, &data)?;
        let mut message = EmailMessage::new(to, rendered.subject, rendered.body);
        message.html_body = rendered.html_body;

        if let Some(TargetRecord::Vehicle(vehicle)) = target {
            for document in vehicle.registration_documents() {
                let path = self.resolve(document);
                match EmailAttachment::from_path(&path).await {
                    Ok(attachment) => message.attach(attachment),
                    Err(e) => warn!(
                        rfq = %rfq.number,
                        vehicle_id = vehicle.id,
                        path = %path.display(),
                        error = %e,
                        "Skipping registration document"
                    ),
                }
            }
        }

        Ok(message)
    }

    fn resolve(&self, document: &str) -> PathBuf {
        let path = Path::new(document);
        match &self.documents_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}
