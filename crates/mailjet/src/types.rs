use relay_mail::{Attachment, MailMessage, Recipients};
use serde::{Deserialize, Serialize};

use crate::tracking::TrackingEvent;

/// JSON body for the Mailjet v3 Send API (`POST /v3/send`).
///
/// Optional sections are omitted entirely when empty, as the API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendRequest {
    #[serde(rename = "FromEmail", skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,

    #[serde(rename = "FromName", skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,

    #[serde(rename = "Subject")]
    pub subject: String,

    #[serde(rename = "Text-part")]
    pub text_part: String,

    #[serde(rename = "Html-part")]
    pub html_part: String,

    #[serde(rename = "To")]
    pub to: String,

    #[serde(rename = "Cc", skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,

    #[serde(rename = "Bcc", skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,

    #[serde(rename = "Attachments", skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentPayload>,

    #[serde(rename = "Inline_attachments", skip_serializing_if = "Vec::is_empty")]
    pub inline_attachments: Vec<AttachmentPayload>,

    #[serde(rename = "Headers", skip_serializing_if = "Option::is_none")]
    pub headers: Option<SendHeaders>,
}

/// Extra headers carried by a [`SendRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendHeaders {
    #[serde(rename = "Reply-to")]
    pub reply_to: String,
}

/// One attachment in the Send API's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentPayload {
    #[serde(rename = "Content-type")]
    pub content_type: String,

    #[serde(rename = "Filename")]
    pub filename: String,

    /// Base64-encoded file content.
    pub content: String,
}

impl From<&Attachment> for AttachmentPayload {
    fn from(attachment: &Attachment) -> Self {
        Self {
            content_type: attachment.content_type.clone(),
            filename: attachment.filename.clone(),
            content: attachment.content_base64.clone(),
        }
    }
}

impl SendRequest {
    /// Reshape a message into the Send API body.
    ///
    /// Sender fields come from the message's `from`; every explicit body key
    /// is distinct from them, so nothing is overwritten.
    pub fn from_message<M: MailMessage>(message: &M) -> Self {
        let (from_email, from_name) = match message.from() {
            Some(sender) => (Some(sender.email.clone()), sender.name.clone()),
            None => (None, None),
        };

        Self {
            from_email,
            from_name,
            subject: message.subject().to_owned(),
            text_part: message.text_body().to_owned(),
            html_part: message.html_body().to_owned(),
            to: format_recipients(message.to()),
            cc: non_empty(message.cc()),
            bcc: non_empty(message.bcc()),
            attachments: message.attachments().iter().map(Into::into).collect(),
            inline_attachments: message
                .inline_attachments()
                .iter()
                .map(Into::into)
                .collect(),
            headers: (!message.reply_to().is_empty()).then(|| SendHeaders {
                reply_to: message.reply_to().to_owned(),
            }),
        }
    }
}

/// Render one address as `"Name" <email>`, or `<email>` when the name is
/// empty.
pub fn format_address(email: &str, name: &str) -> String {
    if name.is_empty() {
        format!("<{email}>")
    } else {
        format!("\"{name}\" <{email}>")
    }
}

/// Render every recipient and join them with `", "`.
pub fn format_recipients(recipients: &Recipients) -> String {
    recipients
        .iter()
        .map(|(email, name)| format_address(email, name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn non_empty(recipients: &Recipients) -> Option<String> {
    (!recipients.is_empty()).then(|| format_recipients(recipients))
}

/// JSON body for creating an event callback (`POST /v3/REST/eventcallbackurl`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCallbackRequest {
    #[serde(rename = "EventType")]
    pub event_type: TrackingEvent,

    #[serde(rename = "Url")]
    pub url: String,
}

/// An event callback as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct EventCallback {
    #[serde(rename = "ID", default)]
    pub id: Option<u64>,

    #[serde(rename = "EventType", default)]
    pub event_type: Option<String>,

    #[serde(rename = "Url")]
    pub url: String,

    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

/// Envelope of REST API responses: `{"Count": .., "Data": [..], "Total": ..}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RestEnvelope<T> {
    #[serde(rename = "Count", default)]
    pub count: u64,

    #[serde(rename = "Data")]
    pub data: Vec<T>,

    #[serde(rename = "Total", default)]
    pub total: u64,
}
