use relay_mail::MailerError;
use thiserror::Error;

/// Errors specific to the Mailjet integration.
///
/// These are internal errors that get converted into [`MailerError`] at the
/// public API boundary.
#[derive(Debug, Error)]
pub enum MailjetError {
    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured API base URL could not be parsed.
    #[error("invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// The Mailjet API rejected a request.
    #[error("Mailjet API error: {0}")]
    Api(String),

    /// The Mailjet API returned a body of unexpected shape.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<MailjetError> for MailerError {
    fn from(err: MailjetError) -> Self {
        match err {
            MailjetError::Http(e) => MailerError::Connection(e.to_string()),
            MailjetError::BaseUrl(e) => MailerError::Configuration(e.to_string()),
            MailjetError::Api(msg) => MailerError::Provider(msg),
            MailjetError::InvalidResponse(msg) => MailerError::Serialization(msg),
        }
    }
}
