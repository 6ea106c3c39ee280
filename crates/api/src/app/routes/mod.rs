use axum::{routing::get, Router};

pub mod allowlist;
pub mod catalog;
pub mod categories;
pub mod contact;
pub mod content;
pub mod hero;
pub mod media;
pub mod products;
pub mod system;

/// Routes readable by the storefront without authentication.
pub fn public_router() -> Router {
    Router::new()
        .route("/catalog/products", get(catalog::list_products))
        .route("/catalog/products/:code", get(catalog::get_product))
        .route("/catalog/categories", get(catalog::category_tree))
        .route("/content/hero", get(catalog::list_hero))
        .route("/content/services", get(catalog::list_services))
        .route("/content/social", get(catalog::list_social))
        .route("/contact", axum::routing::post(contact::submit))
}

/// Routes behind the admin gate; nested under `/admin`.
pub fn admin_router() -> Router {
    Router::new()
        .merge(products::router())
        .merge(categories::router())
        .merge(hero::router())
        .merge(content::router())
        .merge(allowlist::router())
        .merge(media::router())
        .route("/whoami", get(system::whoami))
}
