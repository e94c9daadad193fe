use std::collections::BTreeMap;
use std::time::Duration;

use relay_mail::MailerError;
use serde::Deserialize;

/// Default base URL of the Mailjet API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mailjet.com";

/// Configuration for the Mailjet mailer.
///
/// Deserializable so it can be embedded in a host application's config file:
///
/// ```toml
/// [mailjet]
/// api_key = "..."
/// api_secret = "..."
///
/// [mailjet.tracking]
/// open = "https://example.com/hooks/open"
/// bounce = "https://example.com/hooks/bounce"
/// ```
#[derive(Clone, Deserialize)]
pub struct MailjetConfig {
    /// Mailjet public API key.
    #[serde(default)]
    pub api_key: String,

    /// Mailjet private API key, used as the HTTP Basic password.
    #[serde(default)]
    pub api_secret: String,

    /// Event name to callback URL. Validated when the mailer is built.
    #[serde(default)]
    pub tracking: BTreeMap<String, String>,

    /// Base URL for the Mailjet API. Override this for testing against a
    /// mock server.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_owned()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl std::fmt::Debug for MailjetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailjetConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("tracking", &self.tracking)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for MailjetConfig {
    /// Empty credentials; fails validation until both are set.
    fn default() -> Self {
        Self::new("", "")
    }
}

impl MailjetConfig {
    /// Create a new configuration with the given API key and secret.
    ///
    /// Uses the default Mailjet API base URL and no tracking.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            tracking: BTreeMap::new(),
            api_base_url: default_api_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Add a tracking callback URL for an event.
    #[must_use]
    pub fn with_tracking(mut self, event: impl Into<String>, url: impl Into<String>) -> Self {
        self.tracking.insert(event.into(), url.into());
        self
    }

    /// Override the API base URL (useful for testing).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Trimmed `(api_key, api_secret)`; fails if either is empty after
    /// trimming.
    pub fn credentials(&self) -> Result<(String, String), MailerError> {
        Ok((
            required("api_key", &self.api_key)?,
            required("api_secret", &self.api_secret)?,
        ))
    }
}

fn required(field: &str, value: &str) -> Result<String, MailerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MailerError::Configuration(format!(
            "MailjetMailer::{field} cannot be empty"
        )));
    }
    Ok(trimmed.to_owned())
}
