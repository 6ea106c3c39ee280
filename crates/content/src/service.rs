//! Landing-page service blurbs, keyed by a unique category string.

use serde::{Deserialize, Serialize};

use promostore_core::{DomainError, DomainResult, ServiceId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    /// Unique key, e.g. "embroidery" or "corporate-gifts".
    pub category: String,
    pub title: String,
    pub body: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewService {
    pub category: String,
    pub title: String,
    pub body: String,
    pub image_url: String,
}

impl NewService {
    pub fn validate(&self) -> DomainResult<()> {
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("service category cannot be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("service title cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
}

impl ServiceUpdate {
    pub fn apply(&self, service: &mut Service) {
        if let Some(title) = &self.title {
            service.title = title.clone();
        }
        if let Some(body) = &self.body {
            service.body = body.clone();
        }
        if let Some(image_url) = &self.image_url {
            service.image_url = image_url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_category_is_rejected() {
        let s = NewService {
            category: " ".into(),
            title: "Embroidery".into(),
            body: "In-house embroidery".into(),
            image_url: String::new(),
        };
        assert!(s.validate().is_err());
    }
}
