//! Outbound mail.
//!
//! The contact form is the only mail producer. [`SmtpMailer`] delivers over
//! SMTP; [`RecordingMailer`] captures messages for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use promostore_content::ContactMessage;

mod smtp;

pub use smtp::{SmtpConfig, SmtpMailer};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("failed to compose message: {0}")]
    Compose(String),

    #[error("mail transport failure: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// Test double that records every message instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<ContactMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(message.clone());
        Ok(())
    }
}
