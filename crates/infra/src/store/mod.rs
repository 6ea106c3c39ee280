//! Storage traits and their two implementations.
//!
//! Every trait method is one logical transaction: either the whole operation
//! is visible afterwards or none of it is. The in-memory implementation backs
//! tests and store-less dev runs; the Postgres implementation is the real one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use promostore_auth::AllowlistEntry;
use promostore_catalog::{
    Category, CategoryUpdate, ColorVariant, NewCategory, NewProduct, NewVariant, Product,
    ProductDetail, ProductUpdate,
};
use promostore_content::{HeroImage, NewService, Service, ServiceUpdate, SocialLink};
use promostore_core::{CategoryId, DomainError, HeroImageId, ProductCode, ServiceId, VariantCode};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage-layer error: either a domain rule fired, or the backend failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Database/driver failure. Logged at the call site; callers see a
    /// generic failure and may resubmit.
    #[error("storage failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(operation: &str, err: impl core::fmt::Display) -> Self {
        tracing::error!(operation, error = %err, "storage operation failed");
        Self::Backend(format!("{operation}: {err}"))
    }
}

/// Result of a successful sale, after the transactional recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOutcome {
    pub variant_available: i64,
    pub total_available: i64,
}

/// Products, variants, printing options, categories.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError>;
    async fn update_category(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, StoreError>;
    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError>;
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn create_product(&self, new: NewProduct) -> Result<ProductDetail, StoreError>;
    async fn get_product(&self, code: &ProductCode) -> Result<ProductDetail, StoreError>;
    async fn list_products(&self, category: Option<CategoryId>) -> Result<Vec<Product>, StoreError>;
    async fn update_product(
        &self,
        code: &ProductCode,
        update: ProductUpdate,
    ) -> Result<Product, StoreError>;
    async fn delete_product(&self, code: &ProductCode) -> Result<(), StoreError>;

    async fn add_variant(
        &self,
        code: &ProductCode,
        new: NewVariant,
    ) -> Result<ColorVariant, StoreError>;
    async fn delete_variant(
        &self,
        code: &ProductCode,
        variant: &VariantCode,
    ) -> Result<(), StoreError>;
    async fn sell(
        &self,
        code: &ProductCode,
        variant: &VariantCode,
        quantity: i64,
    ) -> Result<SellOutcome, StoreError>;
}

/// Hero images, services, social links.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn add_hero_image(&self, url: String) -> Result<HeroImage, StoreError>;
    async fn list_hero_images(&self) -> Result<Vec<HeroImage>, StoreError>;
    async fn delete_hero_image(&self, id: HeroImageId) -> Result<(), StoreError>;
    async fn reorder_hero_images(&self, ids: Vec<HeroImageId>) -> Result<(), StoreError>;

    async fn create_service(&self, new: NewService) -> Result<Service, StoreError>;
    async fn list_services(&self) -> Result<Vec<Service>, StoreError>;
    async fn update_service(
        &self,
        id: ServiceId,
        update: ServiceUpdate,
    ) -> Result<Service, StoreError>;
    async fn delete_service(&self, id: ServiceId) -> Result<(), StoreError>;

    async fn upsert_social_link(&self, link: SocialLink) -> Result<SocialLink, StoreError>;
    async fn list_social_links(&self) -> Result<Vec<SocialLink>, StoreError>;
    async fn delete_social_link(&self, platform: &str) -> Result<(), StoreError>;
}

/// Admin allow-list.
#[async_trait]
pub trait AllowlistStore: Send + Sync {
    async fn add(&self, email: &str) -> Result<AllowlistEntry, StoreError>;
    async fn remove(&self, email: &str) -> Result<(), StoreError>;
    async fn list(&self) -> Result<Vec<AllowlistEntry>, StoreError>;
    async fn contains(&self, email: &str) -> Result<bool, StoreError>;
}
