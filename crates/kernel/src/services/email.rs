//! Form submission mail: staff notification and visitor autoresponder.
//!
//! Messages are composed here and handed to any `lettre` transport; storing
//! the submission and configuring SMTP stay with the host.

use anyhow::{Context, Result};
use lettre::message::{Mailbox, MultiPart};
use lettre::{Address, Message, Transport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::content::rich_text::strip_tags;

/// Field name of the spam challenge; never included in mail.
const CAPTCHA_FIELD: &str = "wagtailcaptcha";

/// A submitted value: single text or a multi-select list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Display form; list values are comma-joined.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedField {
    /// Machine name of the form field.
    pub name: String,
    /// Label shown to the visitor.
    pub label: String,
    pub value: FieldValue,
}

/// One form submission, fields in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub fields: Vec<SubmittedField>,
}

impl FormSubmission {
    /// Display value of the named field, if it was submitted.
    pub fn value(&self, name: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.display())
    }
}

/// Autoresponder configuration of a form page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoresponderSettings {
    pub from_address: String,
    pub subject: String,
    /// HTML template; may use `salutation`, `first_name` and `last_name`.
    pub template: String,
    /// Field holding the visitor's email address.
    pub email_field: Option<String>,
    #[serde(default)]
    pub salutation_field: Option<String>,
    #[serde(default)]
    pub first_name_field: Option<String>,
    #[serde(default)]
    pub last_name_field: Option<String>,
}

/// Mail configuration of a form page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMailSettings {
    /// Comma separated recipients.
    pub to_address: String,
    pub from_address: String,
    pub subject: String,
    #[serde(default)]
    pub autoresponder: Option<AutoresponderSettings>,
}

/// A composed message, transport independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl OutgoingMail {
    /// Build a multipart/alternative message.
    pub fn to_message(&self) -> Result<Message> {
        let from: Mailbox = self
            .from
            .parse()
            .with_context(|| format!("invalid from email address '{}'", self.from))?;

        let mut builder = Message::builder().from(from).subject(&self.subject);
        for to in &self.to {
            let mailbox: Mailbox = to
                .parse()
                .with_context(|| format!("invalid recipient email address '{to}'"))?;
            builder = builder.to(mailbox);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                self.text_body.clone(),
                self.html_body.clone(),
            ))
            .context("failed to build email message")
    }
}

/// Staff notification listing every submitted field except the captcha.
pub fn compose_notification(settings: &FormMailSettings, submission: &FormSubmission) -> OutgoingMail {
    let (html_lines, text_lines): (Vec<String>, Vec<String>) = submission
        .fields
        .iter()
        .filter(|field| field.name != CAPTCHA_FIELD)
        .map(|field| {
            let value = field.value.display();
            (
                format!(
                    "<p><strong>{}:</strong> {}</p>",
                    tera::escape_html(&field.label),
                    tera::escape_html(&value)
                ),
                format!("{}: {value}", field.label),
            )
        })
        .unzip();

    OutgoingMail {
        from: settings.from_address.trim().to_string(),
        to: split_addresses(&settings.to_address),
        subject: settings.subject.clone(),
        text_body: text_lines.join("\n"),
        html_body: html_lines.join("\n"),
    }
}

/// Autoresponder to the visitor, when one is configured and the submitted
/// address is a valid mailbox.
///
/// Returns `Ok(None)` when there is nothing to send; errors only when the
/// configured template does not render.
pub fn compose_autoresponder(
    settings: &FormMailSettings,
    submission: &FormSubmission,
) -> Result<Option<OutgoingMail>> {
    let Some(auto) = &settings.autoresponder else {
        return Ok(None);
    };
    let from = auto.from_address.trim();
    let Some(email_field) = auto.email_field.as_deref() else {
        debug!("autoresponder has no email field");
        return Ok(None);
    };
    if from.is_empty() {
        debug!("autoresponder has no sender");
        return Ok(None);
    }

    let Some(to) = submission.value(email_field).filter(|to| is_valid_address(to)) else {
        debug!(field = %email_field, "no valid autoresponder address submitted");
        return Ok(None);
    };

    let lookup = |field: &Option<String>| -> String {
        field
            .as_deref()
            .and_then(|name| submission.value(name))
            .unwrap_or_default()
    };

    let mut context = tera::Context::new();
    context.insert("salutation", &lookup(&auto.salutation_field));
    context.insert("first_name", &lookup(&auto.first_name_field));
    context.insert("last_name", &lookup(&auto.last_name_field));

    let rendered = tera::Tera::one_off(&auto.template, &context, true)
        .context("failed to render autoresponder template")?;
    // The template is authored in the CMS; keep only safe markup.
    let html_body = ammonia::clean(&rendered);

    Ok(Some(OutgoingMail {
        from: from.to_string(),
        to: vec![to.trim().to_string()],
        subject: auto.subject.clone(),
        text_body: strip_tags(&html_body),
        html_body,
    }))
}

/// Build and send `mail` through `transport`.
pub fn deliver<T>(transport: &T, mail: &OutgoingMail) -> Result<()>
where
    T: Transport,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    let message = mail.to_message()?;
    transport.send(&message).context("failed to send email")?;
    info!(subject = %mail.subject, recipients = mail.to.len(), "form mail sent");
    Ok(())
}

fn split_addresses(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_valid_address(address: &str) -> bool {
    address.trim().parse::<Address>().is_ok()
}
