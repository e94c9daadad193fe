use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::MailjetError;
use crate::tracking::TrackingEvent;
use crate::types::RestEnvelope;

/// A Mailjet API resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// The v3 Send API.
    Send,
    /// Event callback URLs, optionally narrowed to one event type.
    EventCallbackUrl(Option<TrackingEvent>),
}

impl Resource {
    /// Path of this resource relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            Self::Send => "/v3/send".to_owned(),
            Self::EventCallbackUrl(None) => "/v3/REST/eventcallbackurl".to_owned(),
            Self::EventCallbackUrl(Some(event)) => format!("/v3/REST/eventcallbackurl/{event}"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A response from the Mailjet API, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailjetResponse {
    /// HTTP status code; `0` when the request never got a response.
    pub status: u16,
    /// Parsed JSON body. Non-JSON bodies are kept as a string.
    pub body: serde_json::Value,
}

impl MailjetResponse {
    /// Whether the API reported success (any 2xx status).
    pub fn success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Stand-in response for a request that failed before the API answered.
    pub(crate) fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            body: serde_json::json!({ "ErrorMessage": message.into() }),
        }
    }

    /// The `Data` array of a REST API response.
    pub fn data<T: DeserializeOwned>(&self) -> Result<Vec<T>, MailjetError> {
        serde_json::from_value::<RestEnvelope<T>>(self.body.clone())
            .map(|envelope| envelope.data)
            .map_err(|e| MailjetError::InvalidResponse(e.to_string()))
    }
}

/// HTTP client for the Mailjet API.
///
/// Authenticates every request with HTTP Basic auth using the API key and
/// secret. Non-2xx answers are returned as [`MailjetResponse`]s; only
/// transport failures are errors.
pub struct MailjetClient {
    http: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl fmt::Debug for MailjetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailjetClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl MailjetClient {
    /// Build a client for the API at `base_url`.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, MailjetError> {
        Url::parse(base_url)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        })
    }

    fn url(&self, resource: Resource) -> String {
        format!("{}{}", self.base_url, resource.path())
    }

    /// `POST` a JSON body to a resource.
    #[instrument(skip_all, fields(resource = %resource))]
    pub async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        resource: Resource,
        body: &B,
    ) -> Result<MailjetResponse, MailjetError> {
        self.dispatch(self.http.post(self.url(resource)).json(body))
            .await
    }

    /// `GET` a resource.
    #[instrument(skip_all, fields(resource = %resource))]
    pub async fn get(&self, resource: Resource) -> Result<MailjetResponse, MailjetError> {
        self.dispatch(self.http.get(self.url(resource))).await
    }

    /// `DELETE` a resource.
    #[instrument(skip_all, fields(resource = %resource))]
    pub async fn delete(&self, resource: Resource) -> Result<MailjetResponse, MailjetError> {
        self.dispatch(self.http.delete(self.url(resource))).await
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<MailjetResponse, MailjetError> {
        let response = request
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        if status.is_success() {
            debug!(status = status.as_u16(), "Mailjet API request succeeded");
        } else {
            warn!(status = status.as_u16(), "Mailjet API rejected request");
        }

        Ok(MailjetResponse {
            status: status.as_u16(),
            body,
        })
    }
}
