//! Admin media uploads to the WebDAV share.
//!
//! The upload is awaited and its status checked before answering, so a
//! failed write can never leave a product pointing at a URL that was never
//! stored.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/media", post(upload))
        .route("/media/*path", axum::routing::delete(delete))
}

async fn upload(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::UploadParams>,
    body: Bytes,
) -> axum::response::Response {
    let Some(media) = services.media.as_ref() else {
        return errors::not_configured("media storage");
    };
    if body.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "empty upload");
    }
    match media.put(&params.path, body.to_vec()).await {
        Ok(url) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "url": url })),
        )
            .into_response(),
        Err(e) => errors::media_error_to_response(e),
    }
}

async fn delete(
    Extension(services): Extension<Arc<AppServices>>,
    Path(path): Path<String>,
) -> axum::response::Response {
    let Some(media) = services.media.as_ref() else {
        return errors::not_configured("media storage");
    };
    match media.delete(&path).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::media_error_to_response(e),
    }
}
