use std::collections::HashMap;

use crate::error::NotificationError;

pub const RFQ_VEHICLE: &str = "rfq_vehicle";
pub const RFQ_PLANT: &str = "rfq_plant";
pub const RFQ_GENERIC: &str = "rfq_generic";

/// Email templates keyed by id, with `{{name}}` placeholders.
pub struct TemplateRenderer {
    templates: HashMap<String, Template>,
}

#[derive(Debug, Clone)]
pub struct Template {
    pub id: String,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
}

/// Output of [`TemplateRenderer::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// A renderer preloaded with the RFQ templates.
    pub fn with_builtin() -> Self {
        let mut renderer = Self::new();
        for template in builtin_templates() {
            renderer.register(template);
        }
        renderer
    }

    /// Adds or replaces a template.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, template_id: &str) -> Option<&Template> {
        self.templates.get(template_id)
    }

    /// Renders `template_id`. Values are HTML-escaped in the HTML body;
    /// placeholders without a value render as empty text.
    pub fn render(
        &self,
        template_id: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<RenderedContent, NotificationError> {
        let template = self
            .get(template_id)
            .ok_or_else(|| NotificationError::TemplateNotFound(template_id.to_string()))?;

        Ok(RenderedContent {
            subject: fill(&template.subject, data, false),
            body: fill(&template.body, data, false),
            html_body: template.html_body.as_deref().map(|html| fill(html, data, true)),
        })
    }
}

fn fill(template: &str, data: &HashMap<String, serde_json::Value>, html: bool) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let value = data.get(after[..close].trim()).map(plain).unwrap_or_default();
        if html {
            out.push_str(&escape_html(&value));
        } else {
            out.push_str(&value);
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

fn plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::with_builtin()
    }
}

const RFQ_BODY: &str = "Gentile {{supplier}},\n\n\
vi chiediamo un preventivo per: {{title}} (rif. {{number}}).\n\
{{asset_line}}\n\
{{description}}\n\n\
Scadenza per l'invio dell'offerta: {{deadline}}\n\n\
Cordiali saluti\nUfficio Acquisti";

const RFQ_HTML: &str = "<h2>Richiesta Preventivo</h2>\
<p><strong>Titolo:</strong> {{title}}</p>\
<p><strong>Numero:</strong> {{number}}</p>\
<p><strong>Fornitore:</strong> {{supplier}}</p>\
<p>{{asset_line}}</p>\
<p><strong>Descrizione:</strong> {{description}}</p>\
<p><strong>Scadenza:</strong> {{deadline}}</p>";

fn builtin_templates() -> Vec<Template> {
    vec![
        Template {
            id: RFQ_VEHICLE.to_string(),
            subject: "Richiesta Preventivo - {{title}} - Automezzo {{asset}}".to_string(),
            body: RFQ_BODY.to_string(),
            html_body: Some(RFQ_HTML.to_string()),
        },
        Template {
            id: RFQ_PLANT.to_string(),
            subject: "Richiesta Preventivo - {{title}} - Stabilimento {{asset}}".to_string(),
            body: RFQ_BODY.to_string(),
            html_body: Some(RFQ_HTML.to_string()),
        },
        Template {
            id: RFQ_GENERIC.to_string(),
            subject: "Richiesta Preventivo - {{title}}".to_string(),
            body: RFQ_BODY.to_string(),
            html_body: Some(RFQ_HTML.to_string()),
        },
    ]
}
