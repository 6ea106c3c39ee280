use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::AdminContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(admin): Extension<AdminContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "email": admin.email(),
    }))
}
