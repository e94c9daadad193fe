use crate::error::MailerError;
use crate::message::MailMessage;

/// Strongly-typed mailer trait with native `async fn`.
///
/// A mailer owns whatever credentials and client handles it needs and turns
/// a [`MailMessage`] into a delivery attempt. The associated
/// [`Message`](Mailer::Message) type is the concrete message class that
/// [`compose`](Mailer::compose) hands out.
///
/// Delivery failures reported by the remote side are not errors: `send`
/// returns `Ok(false)` and the mailer keeps whatever response it received for
/// inspection. `Err` is reserved for invalid input and local failures.
pub trait Mailer: Send + Sync {
    /// The message type this mailer sends.
    type Message: MailMessage + Default;

    /// Returns the name of this mailer (e.g. `"mailjet"`).
    fn name(&self) -> &str;

    /// Create a new, empty message of this mailer's message type.
    fn compose(&self) -> Self::Message {
        Self::Message::default()
    }

    /// Send one message. Returns whether the delivery service accepted it.
    fn send(
        &self,
        message: &Self::Message,
    ) -> impl std::future::Future<Output = Result<bool, MailerError>> + Send;
}
