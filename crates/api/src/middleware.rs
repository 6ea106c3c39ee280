use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use promostore_infra::AllowlistStore;

use crate::context::AdminContext;
use crate::token::TokenVerifier;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub allowlist: Arc<dyn AllowlistStore>,
}

/// Admin gate: verified token (401 otherwise), then an exact allow-list
/// match on the token's email (403 otherwise).
pub async fn admin_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .verifier
        .verify(token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let allowed = state
        .allowlist
        .contains(&claims.email)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if !allowed {
        tracing::warn!(email = %claims.email, "admin access denied: not on allow-list");
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(AdminContext::new(claims.email));
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
