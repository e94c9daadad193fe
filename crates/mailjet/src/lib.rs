//! Mailjet mailer for Relay.
//!
//! This crate implements the [`Mailer`](relay_mail::Mailer) contract on top of
//! the [Mailjet Send API](https://dev.mailjet.com/email/guides/send-api-V3/)
//! and manages Mailjet event callbacks used for delivery tracking (sent, open,
//! click, bounce, spam, blocked, unsub).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use relay_mail::{Address, MailMessage, Mailer};
//! use relay_mailjet::{MailjetConfig, MailjetMailer};
//!
//! # async fn run() -> Result<(), relay_mail::MailerError> {
//! let config = MailjetConfig::new("api-key", "api-secret")
//!     .with_tracking("bounce", "https://example.com/hooks/bounce");
//! let mailer = MailjetMailer::new(&config)?;
//!
//! let mut message = mailer.compose();
//! message
//!     .set_from(Address::named("noreply@example.com", "Example"))
//!     .set_to("user@example.com")
//!     .set_subject("Welcome")
//!     .set_text_body("Hello!");
//!
//! if !mailer.send(&message).await? {
//!     eprintln!("rejected: {:?}", mailer.last_response());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mailer;
pub mod tracking;
pub mod types;

#[cfg(test)]
mod mock_server;

pub use client::{MailjetClient, MailjetResponse, Resource};
pub use config::MailjetConfig;
pub use error::MailjetError;
pub use mailer::MailjetMailer;
pub use tracking::TrackingEvent;
pub use types::SendRequest;
