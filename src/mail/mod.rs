//! Outgoing mail.
//!
//! The relay only needs one capability from a mail backend: send a single
//! plain-text message. [`MailTransport`] captures that, and [`SmtpMailer`]
//! implements it over [lettre](https://lettre.rs).

mod smtp;

pub use smtp::SmtpMailer;

use async_trait::async_trait;

use crate::Result;

/// A fully addressed plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Sender mailbox.
    pub from: String,
    /// Recipient mailbox.
    pub to: String,
    /// Address replies should go to.
    pub reply_to: String,
    /// Subject header.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
}

/// Async mail sending capability.
///
/// Implementations should not retry; a failed send is reported to the caller
/// as an error.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Send one message.
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}
