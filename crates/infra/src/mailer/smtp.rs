//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use promostore_content::ContactMessage;

use super::{MailError, Mailer};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Address contact-form mail is delivered to.
    pub to: String,
    /// Envelope sender. Replies go to the visitor via Reply-To.
    pub from: String,
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    to: Mailbox,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailError::Transport(format!("relay {}: {e}", config.host)))?
            .credentials(Credentials::new(config.username, config.password))
            .build();
        let to = config
            .to
            .parse()
            .map_err(|e| MailError::Compose(format!("to address: {e}")))?;
        let from = config
            .from
            .parse()
            .map_err(|e| MailError::Compose(format!("from address: {e}")))?;
        Ok(Self {
            transport,
            to,
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError> {
        let reply_to: Mailbox = format!("{} <{}>", message.from_name, message.from_email)
            .parse()
            .map_err(|e| MailError::Compose(format!("reply-to address: {e}")))?;
        let email = Message::builder()
            .from(self.from.clone())
            .reply_to(reply_to)
            .to(self.to.clone())
            .subject(&message.subject)
            .body(format!(
                "From: {} <{}>\n\n{}",
                message.from_name, message.from_email, message.body
            ))
            .map_err(|e| MailError::Compose(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        tracing::info!(from = %message.from_email, "contact message delivered");
        Ok(())
    }
}
