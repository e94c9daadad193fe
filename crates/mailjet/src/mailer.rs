use std::collections::BTreeMap;

use parking_lot::Mutex;
use relay_mail::{MailMessage, Mailer, MailerError, Message};
use tracing::{debug, error, info, instrument, warn};

use crate::client::{MailjetClient, MailjetResponse, Resource};
use crate::config::MailjetConfig;
use crate::tracking::{TrackingEvent, validate_url};
use crate::types::{EventCallback, EventCallbackRequest, SendRequest};

/// Mailer that delivers through the Mailjet Send API and manages Mailjet
/// event callbacks for delivery tracking.
///
/// Construct it once per application; the HTTP client is created up front and
/// held for the mailer's lifetime.
///
/// [`last_response`](Self::last_response) is shared by every caller of one
/// mailer and always holds the response of whichever `send` finished last.
pub struct MailjetMailer {
    client: MailjetClient,
    tracking: BTreeMap<TrackingEvent, String>,
    last_response: Mutex<Option<MailjetResponse>>,
}

impl std::fmt::Debug for MailjetMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailjetMailer")
            .field("client", &self.client)
            .field("tracking", &self.tracking)
            .finish_non_exhaustive()
    }
}

impl MailjetMailer {
    /// Validate the configuration and create the Mailjet client.
    ///
    /// Missing or blank credentials and invalid tracking entries fail with
    /// [`MailerError::Configuration`] before any client exists. If the client
    /// itself cannot be built, the cause is logged here and the caller only
    /// gets [`MailerError::Initialization`], which carries no detail.
    pub fn new(config: &MailjetConfig) -> Result<Self, MailerError> {
        let (api_key, api_secret) = config.credentials()?;

        let client =
            MailjetClient::new(api_key, api_secret, &config.api_base_url, config.timeout())
                .map_err(|e| {
                    error!(error = %e, "failed to create Mailjet client");
                    MailerError::Initialization
                })?;

        let mut mailer = Self {
            client,
            tracking: BTreeMap::new(),
            last_response: Mutex::new(None),
        };
        mailer.set_tracking(&config.tracking)?;
        Ok(mailer)
    }

    /// The response to the most recent [`send`](Mailer::send), if any.
    pub fn last_response(&self) -> Option<MailjetResponse> {
        self.last_response.lock().clone()
    }

    /// The configured event callback URLs.
    pub fn tracking(&self) -> &BTreeMap<TrackingEvent, String> {
        &self.tracking
    }

    /// Set callback URLs for the given events.
    ///
    /// Every entry is validated before anything is applied: an unsupported
    /// event name or a malformed URL rejects the whole call and leaves the
    /// current map untouched. On success only the supplied events are
    /// replaced.
    pub fn set_tracking<I, K, V>(&mut self, tracking: I) -> Result<(), MailerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut validated = Vec::new();
        for (event, url) in tracking {
            let event: TrackingEvent = event.as_ref().parse()?;
            validate_url(event, url.as_ref())?;
            validated.push((event, url.as_ref().to_owned()));
        }
        self.tracking.extend(validated);
        Ok(())
    }

    /// Register `url` as the callback for `event` with Mailjet.
    ///
    /// When Mailjet refuses to create the callback, the callback it already
    /// holds for the event is fetched: the same URL counts as success, a
    /// different one is a [`MailerError::Conflict`] telling the caller to
    /// clear the old tracking first.
    #[instrument(skip(self), fields(provider = "mailjet"))]
    pub async fn activate_tracking(&self, event: &str, url: &str) -> Result<bool, MailerError> {
        let event: TrackingEvent = event.parse()?;
        validate_url(event, url)?;

        let request = EventCallbackRequest {
            event_type: event,
            url: url.to_owned(),
        };
        let created = self
            .client
            .post(Resource::EventCallbackUrl(None), &request)
            .await?;

        if created.success() {
            info!(%event, "tracking activated");
            return Ok(true);
        }

        debug!(%event, status = created.status, "callback exists, comparing urls");
        let existing = self
            .client
            .get(Resource::EventCallbackUrl(Some(event)))
            .await?;
        if !existing.success() {
            return Err(crate::MailjetError::Api(format!(
                "failed to create or look up the {event} callback: HTTP {}",
                existing.status
            ))
            .into());
        }

        let callbacks: Vec<EventCallback> = existing.data()?;
        match callbacks.first() {
            Some(callback) if callback.url == url => {
                debug!(%event, "tracking already active with the same url");
                Ok(true)
            }
            _ => Err(MailerError::Conflict(format!(
                "you must clear your old tracking urls first: call clear_all_trackings() or \
                 clear_tracking(\"{event}\")"
            ))),
        }
    }

    /// Activate every configured tracking event, one after another.
    ///
    /// Stops at the first failure; events activated before it stay active.
    pub async fn activate_all_trackings(&self) -> Result<bool, MailerError> {
        for (event, url) in &self.tracking {
            self.activate_tracking(event.as_str(), url).await?;
        }
        Ok(true)
    }

    /// Delete the Mailjet callback for `event`.
    ///
    /// Only an unsupported event name is an error. Whatever happens with the
    /// delete request itself is logged and otherwise ignored.
    #[instrument(skip(self), fields(provider = "mailjet"))]
    pub async fn clear_tracking(&self, event: &str) -> Result<(), MailerError> {
        let event: TrackingEvent = event.parse()?;

        match self
            .client
            .delete(Resource::EventCallbackUrl(Some(event)))
            .await
        {
            Ok(response) if response.success() => info!(%event, "tracking cleared"),
            Ok(response) => {
                warn!(%event, status = response.status, "Mailjet did not clear tracking");
            }
            Err(e) => warn!(%event, error = %e, "failed to reach Mailjet to clear tracking"),
        }
        Ok(())
    }

    /// Clear every configured tracking event, one after another.
    pub async fn clear_all_trackings(&self) -> Result<(), MailerError> {
        for event in self.tracking.keys() {
            self.clear_tracking(event.as_str()).await?;
        }
        Ok(())
    }
}

impl Mailer for MailjetMailer {
    type Message = Message;

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mailjet"
    }

    #[instrument(skip(self, message), fields(provider = "mailjet"))]
    async fn send(&self, message: &Message) -> Result<bool, MailerError> {
        let request = SendRequest::from_message(message);

        debug!(
            to = %request.to,
            subject = %request.subject,
            attachments = request.attachments.len(),
            inline_attachments = request.inline_attachments.len(),
            "sending email via Mailjet"
        );

        let response = match self.client.post(Resource::Send, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Mailjet send request failed");
                MailjetResponse::transport_failure(e.to_string())
            }
        };

        let success = response.success();
        if success {
            info!(to = %request.to, "email accepted by Mailjet");
        } else {
            warn!(status = response.status, "email rejected by Mailjet");
        }

        *self.last_response.lock() = Some(response);
        Ok(success)
    }
}

#[cfg(test)]
mod tests {
    use relay_mail::{Address, AttachmentOptions};

    use super::*;
    use crate::mock_server::MockMailjetServer;

    fn mailer_for(server: &MockMailjetServer) -> MailjetMailer {
        let config = MailjetConfig::new("key", "secret").with_api_base_url(&server.base_url);
        MailjetMailer::new(&config).unwrap()
    }

    fn hello_message(mailer: &MailjetMailer) -> Message {
        let mut message = mailer.compose();
        message
            .set_from(("noreply@x.com", "Relay"))
            .set_to(Address::named("a@x.com", "Alice"))
            .set_subject("Hi")
            .set_text_body("hello");
        message
    }

    #[test]
    fn mailer_name() {
        let mailer = MailjetMailer::new(&MailjetConfig::new("key", "secret")).unwrap();
        assert_eq!(mailer.name(), "mailjet");
        assert!(mailer.last_response().is_none());
    }

    #[test]
    fn blank_secret_is_a_configuration_error() {
        for secret in ["", "   "] {
            let err = MailjetMailer::new(&MailjetConfig::new("key", secret)).unwrap_err();
            assert!(matches!(err, MailerError::Configuration(_)));
        }
    }

    #[test]
    fn blank_key_is_a_configuration_error() {
        let err = MailjetMailer::new(&MailjetConfig::new(" ", "secret")).unwrap_err();
        assert!(matches!(err, MailerError::Configuration(_)));
    }

    #[test]
    fn client_failure_is_masked() {
        let config = MailjetConfig::new("key", "secret").with_api_base_url("::not a url::");
        let err = MailjetMailer::new(&config).unwrap_err();
        assert!(matches!(err, MailerError::Initialization));
        assert!(!err.to_string().contains("not a url"));
    }

    #[test]
    fn configured_tracking_is_validated() {
        let config = MailjetConfig::new("key", "secret").with_tracking("open", "not-a-url");
        let err = MailjetMailer::new(&config).unwrap_err();
        assert!(matches!(err, MailerError::Configuration(_)));

        let config = MailjetConfig::new("key", "secret")
            .with_tracking("open", "https://x.com/open")
            .with_tracking("bounce", "https://x.com/bounce");
        let mailer = MailjetMailer::new(&config).unwrap();
        assert_eq!(mailer.tracking().len(), 2);
        assert_eq!(mailer.tracking()[&TrackingEvent::Open], "https://x.com/open");
    }

    #[test]
    fn set_tracking_rejects_invalid_url_without_changes() {
        let mut mailer = MailjetMailer::new(&MailjetConfig::new("key", "secret")).unwrap();
        mailer
            .set_tracking([("click", "https://x.com/click")])
            .unwrap();

        let err = mailer
            .set_tracking([("bounce", "https://x.com/bounce"), ("open", "not-a-url")])
            .unwrap_err();
        assert!(matches!(err, MailerError::Configuration(_)));
        assert_eq!(mailer.tracking().len(), 1);
        assert!(!mailer.tracking().contains_key(&TrackingEvent::Bounce));
    }

    #[test]
    fn set_tracking_rejects_unsupported_event() {
        let mut mailer = MailjetMailer::new(&MailjetConfig::new("key", "secret")).unwrap();
        let err = mailer
            .set_tracking([("carrierpigeon", "https://x.com")])
            .unwrap_err();
        assert!(matches!(err, MailerError::Configuration(_)));
        assert!(err.to_string().contains("carrierpigeon"));
        assert!(mailer.tracking().is_empty());
    }

    #[test]
    fn set_tracking_replaces_only_supplied_events() {
        let mut mailer = MailjetMailer::new(&MailjetConfig::new("key", "secret")).unwrap();
        mailer
            .set_tracking([("open", "https://x.com/a"), ("click", "https://x.com/b")])
            .unwrap();
        mailer.set_tracking([("open", "https://x.com/c")]).unwrap();
        assert_eq!(mailer.tracking()[&TrackingEvent::Open], "https://x.com/c");
        assert_eq!(mailer.tracking()[&TrackingEvent::Click], "https://x.com/b");
    }

    #[tokio::test]
    async fn send_success_builds_body_and_stores_response() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);
        let message = hello_message(&mailer);

        let handle = server.serve(vec![(200, r#"{"Sent":[{"Email":"a@x.com","MessageID":1}]}"#)]);
        let sent = mailer.send(&message).await.unwrap();
        let requests = handle.await.unwrap();

        assert!(sent);
        let body = requests[0].json();
        assert_eq!(requests[0].path, "/v3/send");
        assert_eq!(body["To"], r#""Alice" <a@x.com>"#);
        assert_eq!(body["FromEmail"], "noreply@x.com");
        assert_eq!(body["FromName"], "Relay");
        assert!(body.get("Cc").is_none());
        assert!(body.get("Bcc").is_none());
        assert!(body.get("Headers").is_none());

        let response = mailer.last_response().unwrap();
        assert!(response.success());
        assert_eq!(response.body["Sent"][0]["MessageID"], 1);
    }

    #[tokio::test]
    async fn send_full_message() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);
        let mut message = hello_message(&mailer);
        message
            .set_cc("b@x.com")
            .set_bcc(vec![Address::named("c@x.com", "Carol"), Address::from("d@x.com")])
            .set_reply_to("support@x.com")
            .set_html_body("<img src=\"cid:logo.png\">")
            .attach_content("report", AttachmentOptions::default().with_file_name("r.txt"));
        message.embed_content(
            "png",
            AttachmentOptions::default()
                .with_content_type("image/png")
                .with_file_name("logo.png"),
        );

        let handle = server.serve(vec![(200, r#"{"Sent":[]}"#)]);
        assert!(mailer.send(&message).await.unwrap());
        let body = handle.await.unwrap()[0].json();

        assert_eq!(body["Cc"], "<b@x.com>");
        assert_eq!(body["Bcc"], r#""Carol" <c@x.com>, <d@x.com>"#);
        assert_eq!(body["Headers"]["Reply-to"], "support@x.com");
        assert_eq!(body["Attachments"][0]["Filename"], "r.txt");
        assert_eq!(body["Inline_attachments"][0]["Content-type"], "image/png");
    }

    #[tokio::test]
    async fn send_rejection_returns_false_and_keeps_response() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);
        let message = hello_message(&mailer);

        let handle = server.serve(vec![(400, r#"{"ErrorMessage":"Invalid sender"}"#)]);
        let sent = mailer.send(&message).await.unwrap();
        handle.await.unwrap();

        assert!(!sent);
        let response = mailer.last_response().unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(response.body["ErrorMessage"], "Invalid sender");
    }

    #[tokio::test]
    async fn send_transport_failure_is_soft() {
        let config = MailjetConfig::new("key", "secret")
            .with_api_base_url("http://127.0.0.1:1")
            .with_timeout_seconds(2);
        let mailer = MailjetMailer::new(&config).unwrap();
        let message = hello_message(&mailer);

        assert!(!mailer.send(&message).await.unwrap());
        let response = mailer.last_response().unwrap();
        assert_eq!(response.status, 0);
        assert!(response.body["ErrorMessage"].is_string());
    }

    #[tokio::test]
    async fn last_response_is_overwritten_by_each_send() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);
        let message = hello_message(&mailer);

        let handle = server.serve(vec![(500, r#"{"ErrorMessage":"down"}"#), (200, r#"{"Sent":[]}"#)]);
        assert!(!mailer.send(&message).await.unwrap());
        assert!(mailer.send(&message).await.unwrap());
        handle.await.unwrap();

        assert_eq!(mailer.last_response().unwrap().status, 200);
    }

    #[tokio::test]
    async fn activate_tracking_creates_callback() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);

        let handle = server.serve(vec![(201, r#"{"Count":1,"Data":[{"ID":1,"EventType":"open","Url":"https://x.com/open"}],"Total":1}"#)]);
        assert!(mailer.activate_tracking("open", "https://x.com/open").await.unwrap());
        let requests = handle.await.unwrap();

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/v3/REST/eventcallbackurl");
        assert_eq!(
            requests[0].json(),
            serde_json::json!({"EventType": "open", "Url": "https://x.com/open"})
        );
    }

    #[tokio::test]
    async fn activate_tracking_with_same_existing_url_succeeds() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);

        let handle = server.serve(vec![
            (400, r#"{"ErrorMessage":"A callback already exists for this event"}"#),
            (200, r#"{"Count":1,"Data":[{"ID":1,"EventType":"open","Url":"https://x.com/open"}],"Total":1}"#),
        ]);
        assert!(mailer.activate_tracking("open", "https://x.com/open").await.unwrap());
        let requests = handle.await.unwrap();

        assert_eq!(requests[1].method, "GET");
        assert_eq!(requests[1].path, "/v3/REST/eventcallbackurl/open");
    }

    #[tokio::test]
    async fn activate_tracking_with_different_existing_url_conflicts() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);

        let handle = server.serve(vec![
            (400, r#"{"ErrorMessage":"A callback already exists for this event"}"#),
            (200, r#"{"Count":1,"Data":[{"ID":1,"EventType":"open","Url":"https://old.x.com/open"}],"Total":1}"#),
        ]);
        let err = mailer
            .activate_tracking("open", "https://x.com/open")
            .await
            .unwrap_err();
        handle.await.unwrap();

        assert!(matches!(err, MailerError::Conflict(_)));
        let message = err.to_string();
        assert!(message.contains("clear_all_trackings()"));
        assert!(message.contains("clear_tracking(\"open\")"));
    }

    #[tokio::test]
    async fn activate_tracking_rejects_unsupported_event_without_request() {
        let config = MailjetConfig::new("key", "secret").with_api_base_url("http://127.0.0.1:1");
        let mailer = MailjetMailer::new(&config).unwrap();
        let err = mailer
            .activate_tracking("carrierpigeon", "https://x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, MailerError::Configuration(_)));
    }

    #[tokio::test]
    async fn activate_all_trackings_runs_each_event() {
        let server = MockMailjetServer::start().await;
        let config = MailjetConfig::new("key", "secret")
            .with_api_base_url(&server.base_url)
            .with_tracking("open", "https://x.com/open")
            .with_tracking("bounce", "https://x.com/bounce");
        let mailer = MailjetMailer::new(&config).unwrap();

        let handle = server.serve(vec![(201, r#"{"Data":[]}"#), (201, r#"{"Data":[]}"#)]);
        assert!(mailer.activate_all_trackings().await.unwrap());
        let requests = handle.await.unwrap();

        let events: Vec<_> = requests
            .iter()
            .map(|r| r.json()["EventType"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(events, ["open", "bounce"]);
    }

    #[tokio::test]
    async fn activate_all_trackings_stops_at_first_conflict() {
        let server = MockMailjetServer::start().await;
        let config = MailjetConfig::new("key", "secret")
            .with_api_base_url(&server.base_url)
            .with_tracking("open", "https://x.com/open")
            .with_tracking("click", "https://x.com/click");
        let mailer = MailjetMailer::new(&config).unwrap();

        let handle = server.serve(vec![
            (201, r#"{"Data":[]}"#),
            (400, r#"{"ErrorMessage":"exists"}"#),
            (200, r#"{"Data":[{"Url":"https://other.x.com/click"}]}"#),
        ]);
        let err = mailer.activate_all_trackings().await.unwrap_err();
        let requests = handle.await.unwrap();

        assert!(matches!(err, MailerError::Conflict(_)));
        assert_eq!(requests.len(), 3);
    }

    #[tokio::test]
    async fn clear_tracking_deletes_callback() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);

        let handle = server.serve(vec![(204, "")]);
        mailer.clear_tracking("spam").await.unwrap();
        let requests = handle.await.unwrap();

        assert_eq!(requests[0].method, "DELETE");
        assert_eq!(requests[0].path, "/v3/REST/eventcallbackurl/spam");
    }

    #[tokio::test]
    async fn clear_tracking_ignores_provider_failure() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);

        let handle = server.serve(vec![(404, r#"{"ErrorMessage":"Object not found"}"#)]);
        assert!(mailer.clear_tracking("open").await.is_ok());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn clear_tracking_ignores_transport_failure() {
        let config = MailjetConfig::new("key", "secret")
            .with_api_base_url("http://127.0.0.1:1")
            .with_timeout_seconds(2);
        let mailer = MailjetMailer::new(&config).unwrap();
        assert!(mailer.clear_tracking("open").await.is_ok());
    }

    #[tokio::test]
    async fn clear_tracking_rejects_unsupported_event() {
        let server = MockMailjetServer::start().await;
        let mailer = mailer_for(&server);
        let err = mailer.clear_tracking("carrierpigeon").await.unwrap_err();
        assert!(matches!(err, MailerError::Configuration(_)));
    }

    #[tokio::test]
    async fn clear_all_trackings_deletes_each_event() {
        let server = MockMailjetServer::start().await;
        let config = MailjetConfig::new("key", "secret")
            .with_api_base_url(&server.base_url)
            .with_tracking("sent", "https://x.com/sent")
            .with_tracking("unsub", "https://x.com/unsub");
        let mailer = MailjetMailer::new(&config).unwrap();

        let handle = server.serve(vec![(204, ""), (404, "")]);
        mailer.clear_all_trackings().await.unwrap();
        let requests = handle.await.unwrap();

        let paths: Vec<_> = requests.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            ["/v3/REST/eventcallbackurl/sent", "/v3/REST/eventcallbackurl/unsub"]
        );
    }
}
