use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};

use promostore_core::HeroImageId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/hero", post(add_image).get(list_images))
        .route("/hero/order", put(reorder))
        .route("/hero/:id", axum::routing::delete(delete_image))
}

async fn add_image(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AddHeroImageRequest>,
) -> axum::response::Response {
    match services.content.add_hero_image(body.url).await {
        Ok(image) => (StatusCode::CREATED, Json(image)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn list_images(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.content.list_hero_images().await {
        Ok(images) => (
            StatusCode::OK,
            Json(promostore_content::hero::sorted_for_display(images)),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Full rewrite of the display order; the request must list every image.
async fn reorder(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ReorderHeroRequest>,
) -> axum::response::Response {
    match services.content.reorder_hero_images(body.order).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn delete_image(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: HeroImageId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.content.delete_hero_image(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
