use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::address::{Address, Recipients, Sender};
use crate::attachment::{Attachment, AttachmentOptions};
use crate::error::MailerError;

/// The capability contract every message type offers to a [`Mailer`](crate::Mailer).
///
/// Setters return `&mut Self` so calls can be chained. Address setters take
/// anything convertible into an [`Address`] or [`Recipients`]; a bare address
/// always ends up as a one-entry mapping with an empty display name.
///
/// [`Display`](fmt::Display) renders a short debug summary of the message
/// (recipients, subject, plain-text body). It is never used for transport.
pub trait MailMessage: fmt::Display + Send + Sync {
    fn charset(&self) -> &str;
    fn set_charset(&mut self, charset: impl Into<String>) -> &mut Self;

    fn from(&self) -> Option<&Sender>;
    /// Set the sender. A named address sets both email and name; a bare
    /// address sets the email only.
    fn set_from(&mut self, from: impl Into<Address>) -> &mut Self;

    fn to(&self) -> &Recipients;
    /// Replace the `To` recipients. Never merges with previous recipients.
    fn set_to(&mut self, to: impl Into<Recipients>) -> &mut Self;

    fn cc(&self) -> &Recipients;
    fn set_cc(&mut self, cc: impl Into<Recipients>) -> &mut Self;

    fn bcc(&self) -> &Recipients;
    fn set_bcc(&mut self, bcc: impl Into<Recipients>) -> &mut Self;

    /// The reply-to address; empty when unset.
    fn reply_to(&self) -> &str;
    fn set_reply_to(&mut self, reply_to: impl Into<String>) -> &mut Self;

    fn subject(&self) -> &str;
    fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self;

    fn text_body(&self) -> &str;
    fn set_text_body(&mut self, text: impl Into<String>) -> &mut Self;

    fn html_body(&self) -> &str;
    fn set_html_body(&mut self, html: impl Into<String>) -> &mut Self;

    /// Read a file and append it to the regular attachments.
    fn attach(
        &mut self,
        path: impl AsRef<Path>,
        options: AttachmentOptions,
    ) -> Result<&mut Self, MailerError>;

    /// Append raw content to the regular attachments.
    fn attach_content(&mut self, content: impl AsRef<[u8]>, options: AttachmentOptions)
    -> &mut Self;

    /// Read a file and append it to the inline attachments.
    ///
    /// Returns the resolved file name, which the HTML body can reference as
    /// `cid:<name>`.
    fn embed(
        &mut self,
        path: impl AsRef<Path>,
        options: AttachmentOptions,
    ) -> Result<String, MailerError>;

    /// Append raw content to the inline attachments and return its file name.
    fn embed_content(&mut self, content: impl AsRef<[u8]>, options: AttachmentOptions) -> String;

    fn attachments(&self) -> &[Attachment];
    fn inline_attachments(&self) -> &[Attachment];
}

/// A provider-independent outgoing email.
///
/// Serializing a `Message` yields a snapshot of all of its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    charset: String,
    from: Option<Sender>,
    to: Recipients,
    cc: Recipients,
    bcc: Recipients,
    reply_to: String,
    subject: String,
    text_body: String,
    html_body: String,
    attachments: Vec<Attachment>,
    inline_attachments: Vec<Attachment>,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            charset: "utf-8".to_owned(),
            from: None,
            to: Recipients::new(),
            cc: Recipients::new(),
            bcc: Recipients::new(),
            reply_to: String::new(),
            subject: String::new(),
            text_body: String::new(),
            html_body: String::new(),
            attachments: Vec::new(),
            inline_attachments: Vec::new(),
        }
    }
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MailMessage for Message {
    fn charset(&self) -> &str {
        &self.charset
    }

    fn set_charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = charset.into();
        self
    }

    fn from(&self) -> Option<&Sender> {
        self.from.as_ref()
    }

    fn set_from(&mut self, from: impl Into<Address>) -> &mut Self {
        self.from = Some(Sender::from(from.into()));
        self
    }

    fn to(&self) -> &Recipients {
        &self.to
    }

    fn set_to(&mut self, to: impl Into<Recipients>) -> &mut Self {
        self.to = to.into();
        self
    }

    fn cc(&self) -> &Recipients {
        &self.cc
    }

    fn set_cc(&mut self, cc: impl Into<Recipients>) -> &mut Self {
        self.cc = cc.into();
        self
    }

    fn bcc(&self) -> &Recipients {
        &self.bcc
    }

    fn set_bcc(&mut self, bcc: impl Into<Recipients>) -> &mut Self {
        self.bcc = bcc.into();
        self
    }

    fn reply_to(&self) -> &str {
        &self.reply_to
    }

    fn set_reply_to(&mut self, reply_to: impl Into<String>) -> &mut Self {
        self.reply_to = reply_to.into();
        self
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = subject.into();
        self
    }

    fn text_body(&self) -> &str {
        &self.text_body
    }

    fn set_text_body(&mut self, text: impl Into<String>) -> &mut Self {
        self.text_body = text.into();
        self
    }

    fn html_body(&self) -> &str {
        &self.html_body
    }

    fn set_html_body(&mut self, html: impl Into<String>) -> &mut Self {
        self.html_body = html.into();
        self
    }

    fn attach(
        &mut self,
        path: impl AsRef<Path>,
        options: AttachmentOptions,
    ) -> Result<&mut Self, MailerError> {
        self.attachments.push(Attachment::from_path(path, options)?);
        Ok(self)
    }

    fn attach_content(
        &mut self,
        content: impl AsRef<[u8]>,
        options: AttachmentOptions,
    ) -> &mut Self {
        self.attachments
            .push(Attachment::from_content(content, options));
        self
    }

    fn embed(
        &mut self,
        path: impl AsRef<Path>,
        options: AttachmentOptions,
    ) -> Result<String, MailerError> {
        let attachment = Attachment::from_path(path, options)?;
        let filename = attachment.filename.clone();
        self.inline_attachments.push(attachment);
        Ok(filename)
    }

    fn embed_content(&mut self, content: impl AsRef<[u8]>, options: AttachmentOptions) -> String {
        let attachment = Attachment::from_content(content, options);
        let filename = attachment.filename.clone();
        self.inline_attachments.push(attachment);
        filename
    }

    fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    fn inline_attachments(&self) -> &[Attachment] {
        &self.inline_attachments
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recipients: Vec<&str> = self.to.emails().collect();
        write!(
            f,
            "{}\n{}\n{}",
            recipients.join(","),
            self.subject,
            self.text_body
        )
    }
}
