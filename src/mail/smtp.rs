//! SMTP implementation of [`MailTransport`] using lettre.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailTransport, OutgoingMail};
use crate::config::SmtpConfig;
use crate::{RelayError, Result};

/// SMTP-based mailer.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    /// Create a mailer from explicit configuration.
    ///
    /// `secure` selects implicit TLS (usually port 465). Otherwise the
    /// connection starts in plain text and upgrades with STARTTLS when the
    /// server offers it.
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            let tls = TlsParameters::new(config.host.clone())?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .tls(Tls::Opportunistic(tls))
        };

        let transport = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        tracing::debug!(
            host = %config.host,
            port = config.port,
            secure = config.secure,
            "SMTP transport configured"
        );

        Ok(Self {
            transport: Arc::new(transport),
        })
    }
}

fn parse_mailbox(value: &str) -> Result<Mailbox> {
    value
        .parse()
        .map_err(|_| RelayError::InvalidAddress(value.to_string()))
}

/// Build a lettre message from an [`OutgoingMail`].
///
/// A reply-to that is not a valid mailbox is left off; the address is still
/// in the body.
fn build_message(mail: &OutgoingMail) -> Result<Message> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&mail.from)?)
        .to(parse_mailbox(&mail.to)?);

    match mail.reply_to.parse::<Mailbox>() {
        Ok(reply_to) => builder = builder.reply_to(reply_to),
        Err(e) => tracing::warn!(error = %e, "Reply-to is not a valid mailbox, sending without it"),
    }

    let message = builder
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.text.clone())?;

    Ok(message)
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = build_message(mail)?;
        self.transport.send(message).await?;
        Ok(())
    }
}
