//! `promostore-auth` — pure authentication boundary.
//!
//! Admin identity is delegated to a token-issuing identity provider; this
//! crate models only what the backend needs from it: verified claims carrying
//! the admin's email, deterministic claims validation, and the allow-list
//! rules that gate dashboard access. Intentionally decoupled from HTTP and
//! storage.

pub mod allowlist;
pub mod claims;

pub use allowlist::{validate_email, AllowlistEntry};
pub use claims::{validate_claims, AdminClaims, TokenValidationError};
