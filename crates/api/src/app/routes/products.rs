//! Admin product management: creation with generated codes, variant
//! add/remove, and the stock-decrementing sell operation.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use promostore_catalog::{NewProduct, NewVariant, ProductUpdate};
use promostore_core::{ProductCode, VariantCode};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/:code",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:code/variants", post(add_variant))
        .route("/products/:code/variants/:variant", axum::routing::delete(delete_variant))
        .route("/products/:code/sell", post(sell))
}

async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewProduct>,
) -> axum::response::Response {
    match services.catalog.create_product(body).await {
        Ok(detail) => (StatusCode::CREATED, Json(detail)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_products(None).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn get_product(
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

async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
    Json(body): Json<ProductUpdate>,
) -> axum::response::Response {
    let code: ProductCode = match code.parse() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.catalog.update_product(&code, body).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let code: ProductCode = match code.parse() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.catalog.delete_product(&code).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn add_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
    Json(body): Json<NewVariant>,
) -> axum::response::Response {
    let code: ProductCode = match code.parse() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.catalog.add_variant(&code, body).await {
        Ok(variant) => (StatusCode::CREATED, Json(variant)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn delete_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Path((code, variant)): Path<(String, String)>,
) -> axum::response::Response {
    let code: ProductCode = match code.parse() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let variant: VariantCode = match variant.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.catalog.delete_variant(&code, &variant).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn sell(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
    Json(body): Json<dto::SellRequest>,
) -> axum::response::Response {
    let code: ProductCode = match code.parse() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let variant: VariantCode = match body.variant.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.catalog.sell(&code, &variant, body.quantity).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "variant": variant,
                "variant_available": outcome.variant_available,
                "total_available": outcome.total_available,
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
