//! Social links, keyed by platform name with upsert semantics: writing to an
//! existing platform overwrites its url and label.

use serde::{Deserialize, Serialize};

use promostore_core::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Unique platform key, e.g. "instagram".
    pub platform: String,
    pub url: String,
    pub label: String,
}

impl SocialLink {
    pub fn validate(&self) -> DomainResult<()> {
        if self.platform.trim().is_empty() {
            return Err(DomainError::validation("platform cannot be empty"));
        }
        if self.url.trim().is_empty() {
            return Err(DomainError::validation("url cannot be empty"));
        }
        Ok(())
    }
}
