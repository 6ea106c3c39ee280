//! Admin allow-list management.
//!
//! Any allow-listed admin may edit the list, including removing themselves;
//! their current token keeps working only until the next request re-checks
//! the list.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/allowlist", post(add).get(list))
        .route("/allowlist/:email", axum::routing::delete(remove))
}

async fn add(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AllowlistAddRequest>,
) -> axum::response::Response {
    match services.allowlist.add(&body.email).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn list(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.allowlist.list().await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(email): Path<String>,
) -> axum::response::Response {
    match services.allowlist.remove(&email).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
