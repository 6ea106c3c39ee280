//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: backing services (stores, media, mailer) behind one struct
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs that don't map 1:1 onto domain inputs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;
use crate::token::Hs256TokenVerifier;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>, jwt_secret: &str) -> Router {
    let auth_state = middleware::AuthState {
        verifier: Arc::new(Hs256TokenVerifier::new(jwt_secret.as_bytes())),
        allowlist: services.allowlist.clone(),
    };

    let admin = routes::admin_router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::admin_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router().layer(Extension(services)))
        .nest("/admin", admin)
        .layer(ServiceBuilder::new())
}
