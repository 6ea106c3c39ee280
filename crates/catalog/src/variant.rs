//! Color variants: per-product stock-keeping units.
//!
//! Variant codes are deterministic, not random: `{product}C{01, 02, ...}` in
//! creation order. Collisions are impossible within a product, but the scheme
//! caps a product at [`MAX_VARIANTS_PER_PRODUCT`] variants.

use serde::{Deserialize, Serialize};

use promostore_core::{DomainError, DomainResult, ProductCode, VariantCode};

/// Most variants a single product can carry (two-digit sequence suffix).
pub const MAX_VARIANTS_PER_PRODUCT: u32 = 99;

/// A stock-keeping color variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorVariant {
    pub code: VariantCode,
    pub product_code: ProductCode,
    pub name: String,
    pub image_url: String,
    pub available: i64,
    /// Creation-order sequence the code suffix was derived from (1-based).
    pub seq: u32,
}

/// Input for creating a variant (standalone or as part of product creation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVariant {
    pub name: String,
    pub image_url: String,
    pub available: i64,
}

impl NewVariant {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("variant name cannot be empty"));
        }
        if self.available < 0 {
            return Err(DomainError::validation(format!(
                "variant {:?}: available cannot be negative",
                self.name
            )));
        }
        Ok(())
    }

    /// Materialize this input as the `seq`-th variant (1-based) of a product.
    pub fn into_variant(self, product_code: &ProductCode, seq: u32) -> DomainResult<ColorVariant> {
        self.validate()?;
        let code = variant_code(product_code, seq)?;
        Ok(ColorVariant {
            code,
            product_code: product_code.clone(),
            name: self.name,
            image_url: self.image_url,
            available: self.available,
            seq,
        })
    }
}

/// Build the deterministic code for the `seq`-th variant (1-based).
pub fn variant_code(product_code: &ProductCode, seq: u32) -> DomainResult<VariantCode> {
    if seq == 0 {
        return Err(DomainError::invariant("variant sequence starts at 1"));
    }
    if seq > MAX_VARIANTS_PER_PRODUCT {
        return Err(DomainError::validation(format!(
            "product {product_code} already has {MAX_VARIANTS_PER_PRODUCT} variants"
        )));
    }
    Ok(VariantCode::from_generated(format!("{product_code}C{seq:02}")))
}

/// Check a sale of `quantity` units against a variant's stock.
///
/// Rejects non-positive quantities outright; a quantity above `available` is
/// the "insufficient stock" condition and must cause no state change.
pub fn ensure_in_stock(available: i64, quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("sale quantity must be positive"));
    }
    if quantity > available {
        return Err(DomainError::InsufficientStock {
            requested: quantity,
            available,
        });
    }
    Ok(())
}

/// A product must keep at least one variant; deleting the last one is rejected.
pub fn ensure_not_last(remaining: usize) -> DomainResult<()> {
    if remaining <= 1 {
        return Err(DomainError::invariant(
            "cannot delete the last variant of a product",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ProductCode {
        "MUG48213".parse().unwrap()
    }

    #[test]
    fn codes_are_zero_padded_and_sequential() {
        assert_eq!(variant_code(&product(), 1).unwrap().as_str(), "MUG48213C01");
        assert_eq!(variant_code(&product(), 12).unwrap().as_str(), "MUG48213C12");
        assert_eq!(variant_code(&product(), 99).unwrap().as_str(), "MUG48213C99");
    }

    #[test]
    fn hundredth_variant_is_rejected() {
        let err = variant_code(&product(), 100).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn selling_exactly_available_is_permitted() {
        assert!(ensure_in_stock(5, 5).is_ok());
    }

    #[test]
    fn selling_one_over_available_is_insufficient_stock() {
        let err = ensure_in_stock(5, 6).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                requested: 6,
                available: 5
            }
        );
    }

    #[test]
    fn zero_and_negative_quantities_fail_validation() {
        assert!(matches!(ensure_in_stock(5, 0), Err(DomainError::Validation(_))));
        assert!(matches!(ensure_in_stock(5, -1), Err(DomainError::Validation(_))));
    }

    #[test]
    fn last_variant_cannot_be_deleted() {
        assert!(ensure_not_last(1).is_err());
        assert!(ensure_not_last(2).is_ok());
    }

    #[test]
    fn negative_initial_stock_fails_validation() {
        let v = NewVariant {
            name: "Red".into(),
            image_url: "https://files.example/red.png".into(),
            available: -1,
        };
        assert!(v.validate().is_err());
    }
}
