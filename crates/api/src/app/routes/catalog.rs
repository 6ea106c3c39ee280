//! Public, read-only storefront endpoints.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use promostore_catalog::category;
use promostore_content::hero;
use promostore_core::ProductCode;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ListProductsParams>,
) -> axum::response::Response {
    match services.catalog.list_products(params.category).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let code: ProductCode = match code.parse() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.catalog.get_product(&code).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn category_tree(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_categories().await {
        Ok(categories) => (StatusCode::OK, Json(category::build_tree(categories))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_hero(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.content.list_hero_images().await {
        Ok(images) => (StatusCode::OK, Json(hero::sorted_for_display(images))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_services(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.content.list_services().await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_social(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.content.list_social_links().await {
        Ok(links) => (StatusCode::OK, Json(links)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
