//! Contact-form messages, relayed over SMTP and never persisted.

use serde::{Deserialize, Serialize};

use promostore_core::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub body: String,
}

impl ContactMessage {
    pub fn validate(&self) -> DomainResult<()> {
        if self.from_name.trim().is_empty() {
            return Err(DomainError::validation("sender name cannot be empty"));
        }
        if self.from_email.trim().is_empty() {
            return Err(DomainError::validation("sender email cannot be empty"));
        }
        if self.body.trim().is_empty() {
            return Err(DomainError::validation("message body cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_rejected() {
        let msg = ContactMessage {
            from_name: "Dana".into(),
            from_email: "dana@example.com".into(),
            subject: "Bulk order".into(),
            body: "".into(),
        };
        assert!(msg.validate().is_err());
    }
}
