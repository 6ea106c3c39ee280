//! Products and their owned printing options.
//!
//! `total_available` is a derived value, never an independent source of
//! truth: it must always equal the sum of the product's variants' `available`
//! counters. The store recomputes it inside the same transaction as any
//! variant mutation; [`total_of`] is the single definition of that sum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use promostore_core::{CategoryId, DomainError, DomainResult, PrintingOptionId, ProductCode};

use crate::variant::{ColorVariant, NewVariant};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub code: ProductCode,
    pub name: String,
    pub description: String,
    pub category_id: CategoryId,
    /// Derived: always `sum(variant.available)` for this product's variants.
    pub total_available: i64,
    /// True iff the product was created with more than one variant.
    pub multi_images: bool,
    pub materials: String,
    pub item_size: String,
    pub item_weight: String,
    pub created_at: DateTime<Utc>,
}

/// A printing option offered for a product (screen print, embroidery, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintingOption {
    pub id: PrintingOptionId,
    pub product_code: ProductCode,
    pub name: String,
}

/// A product together with its owned rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub variants: Vec<ColorVariant>,
    pub printing_options: Vec<PrintingOption>,
}

/// Input for creating a product and all of its initial variants at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category_id: CategoryId,
    pub materials: String,
    pub item_size: String,
    pub item_weight: String,
    pub variants: Vec<NewVariant>,
    pub printing_options: Vec<String>,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if self.variants.is_empty() {
            return Err(DomainError::validation(
                "a product needs at least one color variant",
            ));
        }
        for variant in &self.variants {
            variant.validate()?;
        }
        for option in &self.printing_options {
            if option.trim().is_empty() {
                return Err(DomainError::validation("printing option cannot be empty"));
            }
        }
        Ok(())
    }

    /// Seed value for `total_available` at creation time.
    pub fn initial_total(&self) -> i64 {
        self.variants.iter().map(|v| v.available).sum()
    }

    /// `multi_images` is decided once, at creation.
    pub fn multi_images(&self) -> bool {
        self.variants.len() > 1
    }
}

/// Field updates for an existing product. `None` leaves the field untouched.
/// Changing the category does not regenerate the product code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub materials: Option<String>,
    pub item_size: Option<String>,
    pub item_weight: Option<String>,
}

impl ProductUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("product name cannot be empty"));
            }
        }
        Ok(())
    }

    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if let Some(materials) = &self.materials {
            product.materials = materials.clone();
        }
        if let Some(item_size) = &self.item_size {
            product.item_size = item_size.clone();
        }
        if let Some(item_weight) = &self.item_weight {
            product.item_weight = item_weight.clone();
        }
    }
}

/// The materialized-view definition of `total_available`.
pub fn total_of(variants: &[ColorVariant]) -> i64 {
    variants.iter().map(|v| v.available).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use promostore_core::CategoryId;

    fn new_product(variants: Vec<NewVariant>) -> NewProduct {
        NewProduct {
            name: "Classic Mug".into(),
            description: "11oz ceramic mug".into(),
            category_id: CategoryId::new(),
            materials: "ceramic".into(),
            item_size: "11oz".into(),
            item_weight: "300g".into(),
            variants,
            printing_options: vec!["screen print".into()],
        }
    }

    fn variant(name: &str, available: i64) -> NewVariant {
        NewVariant {
            name: name.into(),
            image_url: format!("https://files.example/{name}.png"),
            available,
        }
    }

    #[test]
    fn initial_total_is_the_sum_of_variant_stock() {
        let p = new_product(vec![variant("red", 4), variant("blue", 6)]);
        assert_eq!(p.initial_total(), 10);
    }

    #[test]
    fn multi_images_iff_more_than_one_variant() {
        assert!(!new_product(vec![variant("red", 1)]).multi_images());
        assert!(new_product(vec![variant("red", 1), variant("blue", 0)]).multi_images());
    }

    #[test]
    fn product_without_variants_is_rejected() {
        let err = new_product(vec![]).validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_variant_stock_fails_the_whole_creation() {
        let p = new_product(vec![variant("red", 4), variant("blue", -2)]);
        assert!(p.validate().is_err());
    }

    #[test]
    fn update_renaming_to_empty_is_rejected() {
        let update = ProductUpdate {
            name: Some("   ".into()),
            ..ProductUpdate::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn update_applies_only_provided_fields() {
        let new = new_product(vec![variant("red", 4)]);
        let mut product = Product {
            code: "MUG00001".parse().unwrap(),
            name: new.name.clone(),
            description: new.description.clone(),
            category_id: new.category_id,
            total_available: new.initial_total(),
            multi_images: new.multi_images(),
            materials: new.materials.clone(),
            item_size: new.item_size.clone(),
            item_weight: new.item_weight.clone(),
            created_at: Utc::now(),
        };

        let update = ProductUpdate {
            description: Some("15oz ceramic mug".into()),
            ..ProductUpdate::default()
        };
        update.apply(&mut product);

        assert_eq!(product.name, "Classic Mug");
        assert_eq!(product.description, "15oz ceramic mug");
    }
}
