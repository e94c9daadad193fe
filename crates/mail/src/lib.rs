//! Mailer and message contract for Relay.
//!
//! Delivery integrations implement [`Mailer`] and hand out messages that
//! implement [`MailMessage`]. [`Message`] is the provider-independent message
//! type every integration in this workspace uses, and [`LogMailer`] is a
//! no-I/O mailer for development.
//!
//! ```
//! use relay_mail::{Address, LogMailer, MailMessage, Mailer};
//!
//! let mailer: LogMailer = LogMailer::new("dev");
//! let mut message = mailer.compose();
//! message
//!     .set_from(Address::named("noreply@example.com", "Example"))
//!     .set_to("user@example.com")
//!     .set_subject("Welcome");
//! assert_eq!(message.to().get("user@example.com"), Some(""));
//! ```

pub mod address;
pub mod attachment;
pub mod error;
pub mod log;
pub mod mailer;
pub mod message;

pub use address::{Address, Recipients, Sender};
pub use attachment::{Attachment, AttachmentOptions};
pub use error::MailerError;
pub use log::LogMailer;
pub use mailer::Mailer;
pub use message::{MailMessage, Message};
