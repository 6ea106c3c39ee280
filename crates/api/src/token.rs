//! Bearer-token verification for the admin dashboard.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use promostore_auth::{validate_claims, AdminClaims};

/// Verifies a raw bearer token and returns its claims.
///
/// A trait so the middleware never cares which signature scheme is in use.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AdminClaims, ()>;
}

/// HS256-signed JWT whose payload is [`AdminClaims`].
pub struct Hs256TokenVerifier {
    key: DecodingKey,
}

impl Hs256TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
        }
    }
}

impl TokenVerifier for Hs256TokenVerifier {
    fn verify(&self, token: &str) -> Result<AdminClaims, ()> {
        // Claims carry RFC 3339 timestamps, not numeric `exp`/`iat`, so the
        // time window is checked by `validate_claims` instead of the decoder.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data =
            jsonwebtoken::decode::<AdminClaims>(token, &self.key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "token signature rejected");
            })?;
        validate_claims(&data.claims, Utc::now()).map_err(|e| {
            tracing::debug!(error = %e, "token claims rejected");
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    use super::*;

    fn mint(secret: &str, claims: &AdminClaims) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn fresh_claims() -> AdminClaims {
        let now = Utc::now();
        AdminClaims {
            email: "admin@promostore.example".into(),
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn accepts_a_valid_token() {
        let verifier = Hs256TokenVerifier::new(b"secret");
        let token = mint("secret", &fresh_claims());
        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.email, "admin@promostore.example");
    }

    #[test]
    fn rejects_wrong_secret_and_expired_claims() {
        let verifier = Hs256TokenVerifier::new(b"secret");

        let token = mint("other-secret", &fresh_claims());
        assert!(verifier.verify(&token).is_err());

        let mut expired = fresh_claims();
        expired.issued_at = Utc::now() - Duration::hours(2);
        expired.expires_at = Utc::now() - Duration::hours(1);
        let token = mint("secret", &expired);
        assert!(verifier.verify(&token).is_err());
    }
}
