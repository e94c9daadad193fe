use std::path::Path;

use relay_mailjet::MailjetConfig;
use serde::Deserialize;

/// Top-level configuration for the Relay CLI, loaded from a TOML file.
///
/// ```toml
/// [sender]
/// email = "noreply@example.com"
/// name = "Example"
///
/// [mailjet]
/// api_key = "..."
/// api_secret = "..."
///
/// [mailjet.tracking]
/// bounce = "https://example.com/hooks/bounce"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RelayConfig {
    /// Default sender used when `--from` is not given.
    #[serde(default)]
    pub sender: SenderConfig,
    /// Mailjet credentials and tracking callbacks.
    #[serde(default)]
    pub mailjet: MailjetConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct SenderConfig {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl RelayConfig {
    /// Load configuration from `path`, or use defaults if the file does not
    /// exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(toml::from_str("")?)
        }
    }

    /// Apply credentials given on the command line or through the
    /// environment; they win over the file.
    #[must_use]
    pub fn with_overrides(mut self, api_key: Option<String>, api_secret: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.mailjet.api_key = key;
        }
        if let Some(secret) = api_secret {
            self.mailjet.api_secret = secret;
        }
        self
    }
}
