use serde::Deserialize;

use promostore_core::{CategoryId, HeroImageId};

// Domain input types (NewProduct, ProductUpdate, NewCategory, ...) already
// deserialize into the request shape and are used directly by the handlers.
// Only requests with no 1:1 domain counterpart live here.

#[derive(Debug, Deserialize)]
pub struct ListProductsParams {
    pub category: Option<CategoryId>,
}

#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub variant: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddHeroImageRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderHeroRequest {
    /// Complete desired order, first image shown first.
    pub order: Vec<HeroImageId>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertSocialRequest {
    pub url: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct AllowlistAddRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Relative destination path on the media share, e.g. `products/mug.png`.
    pub path: String,
}
