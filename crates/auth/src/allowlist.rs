//! Dashboard allow-list rules.
//!
//! The identity provider authenticates; the allow-list authorizes. Membership
//! lookup is an exact, case-sensitive string match (original behavior kept;
//! see DESIGN.md for the open question on case folding).

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use promostore_core::{DomainError, DomainResult};

/// An email permitted to use the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistEntry {
    pub email: String,
    pub added_at: DateTime<Utc>,
}

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    // Standard email-shape check; deliverability is the relay's problem.
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// Validate the shape of an email before it enters the allow-list.
pub fn validate_email(email: &str) -> DomainResult<()> {
    if !EMAIL_SHAPE.is_match(email) {
        return Err(DomainError::validation(format!(
            "{email:?} is not a valid email address"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_addresses_pass() {
        assert!(validate_email("admin@promostore.example").is_ok());
        assert!(validate_email("a.b+tag@sub.domain.co").is_ok());
    }

    #[test]
    fn malformed_addresses_fail() {
        for bad in ["", "plain", "no@dot", "@missing.local", "two@@ats.com", "sp ace@x.com"] {
            assert!(validate_email(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
