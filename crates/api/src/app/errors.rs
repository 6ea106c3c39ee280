use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use promostore_core::DomainError;
use promostore_infra::{MailError, MediaError, StoreError};

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::Backend(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        err @ DomainError::InsufficientStock { .. } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_stock",
            err.to_string(),
        ),
    }
}

pub fn media_error_to_response(err: MediaError) -> axum::response::Response {
    match err {
        MediaError::InvalidPath(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_path", msg),
        MediaError::Upstream(msg) => json_error(StatusCode::BAD_GATEWAY, "media_upstream", msg),
    }
}

pub fn mail_error_to_response(err: MailError) -> axum::response::Response {
    match err {
        MailError::Compose(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        MailError::Transport(msg) => json_error(StatusCode::BAD_GATEWAY, "mail_upstream", msg),
    }
}

/// 503 for endpoints whose upstream (WebDAV, SMTP) is not configured.
pub fn not_configured(what: &str) -> axum::response::Response {
    json_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "not_configured",
        format!("{what} is not configured"),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
