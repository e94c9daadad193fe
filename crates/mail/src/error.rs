use thiserror::Error;

/// Message returned to callers when a mailer cannot be constructed.
///
/// The underlying cause is logged where it happens and never carried in the
/// error itself, so credentials or transport details cannot leak upstream.
pub const INITIALIZATION_FAILED: &str =
    "an error occurred with your mailer, please check the application logs";

/// Errors that can occur while building messages or operating a mailer.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Missing or invalid configuration: credentials, tracking map entries,
    /// unsupported event names, malformed URLs.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The provider client could not be constructed. Carries no detail.
    #[error("an error occurred with your mailer, please check the application logs")]
    Initialization,

    /// A user-actionable conflict with state already held by the provider.
    #[error("{0}")]
    Conflict(String),

    /// A file could not be read while attaching or embedding it.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The delivery service rejected a request that has no soft-failure path.
    #[error("provider error: {0}")]
    Provider(String),

    /// A network or transport-level error occurred.
    #[error("connection error: {0}")]
    Connection(String),

    /// The provider returned a body that could not be interpreted.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MailerError {
    /// Returns `true` if the error is transient and the operation may succeed
    /// on retry. Nothing in this crate retries; the flag is for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
