//! Admin management of landing-page services and social links.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use promostore_content::{NewService, ServiceUpdate, SocialLink};
use promostore_core::ServiceId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/services", post(create_service).get(list_services))
        .route(
            "/services/:id",
            put(update_service).delete(delete_service),
        )
        .route("/social", get(list_social))
        .route(
            "/social/:platform",
            put(upsert_social).delete(delete_social),
        )
}

async fn create_service(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewService>,
) -> axum::response::Response {
    match services.content.create_service(body).await {
        Ok(service) => (StatusCode::CREATED, Json(service)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn list_services(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.content.list_services().await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn update_service(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ServiceUpdate>,
) -> axum::response::Response {
    let id: ServiceId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.content.update_service(id, body).await {
        Ok(service) => (StatusCode::OK, Json(service)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn delete_service(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ServiceId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.content.delete_service(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Creates the link for a new platform, replaces it for a known one.
async fn upsert_social(
    Extension(services): Extension<Arc<AppServices>>,
    Path(platform): Path<String>,
    Json(body): Json<dto::UpsertSocialRequest>,
) -> axum::response::Response {
    let link = SocialLink {
        platform,
        url: body.url,
        label: body.label,
    };
    match services.content.upsert_social_link(link).await {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn list_social(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.content.list_social_links().await {
        Ok(links) => (StatusCode::OK, Json(links)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn delete_social(
    Extension(services): Extension<Arc<AppServices>>,
    Path(platform): Path<String>,
) -> axum::response::Response {
    match services.content.delete_social_link(&platform).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
