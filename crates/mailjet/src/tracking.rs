use std::fmt;
use std::str::FromStr;

use relay_mail::MailerError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Delivery events Mailjet can post to a callback URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingEvent {
    Sent,
    Open,
    Click,
    Bounce,
    Spam,
    Blocked,
    Unsub,
}

impl TrackingEvent {
    /// Every supported event, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Sent,
        Self::Open,
        Self::Click,
        Self::Bounce,
        Self::Spam,
        Self::Blocked,
        Self::Unsub,
    ];

    /// The event name as used by the Mailjet API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Open => "open",
            Self::Click => "click",
            Self::Bounce => "bounce",
            Self::Spam => "spam",
            Self::Blocked => "blocked",
            Self::Unsub => "unsub",
        }
    }
}

impl fmt::Display for TrackingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TrackingEvent {
    type Err = MailerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| MailerError::Configuration(format!("the {s} event is not supported")))
    }
}

/// Check that `url` is an absolute `http` or `https` URL with a host.
pub fn validate_url(event: TrackingEvent, url: &str) -> Result<(), MailerError> {
    let valid = Url::parse(url)
        .is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host());
    if valid {
        Ok(())
    } else {
        Err(MailerError::Configuration(format!(
            "tracking url for the {event} event should be a url, {url:?} given"
        )))
    }
}
