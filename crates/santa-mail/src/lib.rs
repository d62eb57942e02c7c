//! SMTP delivery of assignment notices.
//!
//! One STARTTLS transport is built from `MailConfig` and reused for every
//! recipient in a batch.

pub mod template;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, SmtpTransport, Transport};
use tracing::debug;

use santa_core::{MailConfig, Notice, Notifier, NotifyError};

pub struct SmtpNotifier {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpNotifier {
    /// Fails with `NotConfigured` when sender address or credential is missing.
    pub fn new(config: &MailConfig) -> Result<Self, NotifyError> {
        if !config.is_configured() {
            return Err(NotifyError::NotConfigured);
        }

        let from = Mailbox::new(None, parse_address(&config.sender_email)?);
        let transport = SmtpTransport::starttls_relay(&config.smtp_server)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.sender_email.clone(),
                config.sender_password.clone(),
            ))
            .build();

        debug!(server = %config.smtp_server, port = config.smtp_port, "SMTP transport ready");
        Ok(Self { from, transport })
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
        let message = compose(&self.from, notice)?;
        self.transport
            .send(&message)
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(())
    }
}

fn parse_address(raw: &str) -> Result<Address, NotifyError> {
    raw.parse::<Address>().map_err(|e| NotifyError::InvalidAddress {
        address: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Build the notice email addressed to the recipient.
pub fn compose(from: &Mailbox, notice: &Notice<'_>) -> Result<Message, NotifyError> {
    let to = Mailbox::new(
        Some(notice.recipient_name.to_string()),
        parse_address(notice.recipient_email)?,
    );

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(template::SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(template::render_body(notice))
        .map_err(|e| NotifyError::Compose(e.to_string()))
}
