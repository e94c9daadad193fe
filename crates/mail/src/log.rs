use std::marker::PhantomData;

use tracing::info;

use crate::error::MailerError;
use crate::mailer::Mailer;
use crate::message::{MailMessage, Message};

/// A mailer that logs each message and reports success without performing
/// any external I/O.
///
/// Useful for local development and tests where no delivery service is
/// available.
pub struct LogMailer<M = Message> {
    name: String,
    _message: PhantomData<fn() -> M>,
}

impl<M> LogMailer<M> {
    /// Create a new `LogMailer` with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _message: PhantomData,
        }
    }
}

impl<M: MailMessage + Default> Mailer for LogMailer<M> {
    type Message = M;

    fn name(&self) -> &str {
        &self.name
    }

    #[allow(clippy::unused_async)]
    async fn send(&self, message: &M) -> Result<bool, MailerError> {
        let to: Vec<&str> = message.to().emails().collect();
        info!(
            mailer = %self.name,
            from = message.from().map_or("", |f| f.email.as_str()),
            to = %to.join(", "),
            subject = %message.subject(),
            attachments = message.attachments().len(),
            inline_attachments = message.inline_attachments().len(),
            "log mailer accepted message"
        );
        Ok(true)
    }
}
