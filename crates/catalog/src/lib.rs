//! `promostore-catalog` — product catalog domain.
//!
//! Categories, products, color variants, printing options, code generation,
//! and the inventory-consistency rules. Pure domain logic only; persistence
//! lives in `promostore-infra`.

pub mod category;
pub mod code;
pub mod product;
pub mod variant;

pub use category::{Category, CategoryNode, CategoryUpdate, NewCategory};
pub use code::{candidate_code, code_prefix, MAX_CODE_ATTEMPTS};
pub use product::{NewProduct, PrintingOption, Product, ProductDetail, ProductUpdate};
pub use variant::{ColorVariant, NewVariant, MAX_VARIANTS_PER_PRODUCT};
