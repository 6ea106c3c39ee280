//! In-memory store used by tests and store-less dev runs.
//!
//! Each operation takes the relevant mutex for its whole duration, which
//! gives the same all-or-nothing visibility the Postgres implementation gets
//! from transactions.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use promostore_auth::{validate_email, AllowlistEntry};
use promostore_catalog::{
    category, code, product, variant, Category, CategoryUpdate, ColorVariant, NewCategory,
    NewProduct, NewVariant, Product, ProductDetail, ProductUpdate,
};
use promostore_catalog::product::PrintingOption;
use promostore_content::{hero, HeroImage, NewService, Service, ServiceUpdate, SocialLink};
use promostore_core::{
    CategoryId, DomainError, HeroImageId, PrintingOptionId, ProductCode, ServiceId, VariantCode,
};

use super::{AllowlistStore, CatalogStore, ContentStore, SellOutcome, StoreError};

#[derive(Debug)]
struct ProductRecord {
    product: Product,
    variants: Vec<ColorVariant>,
    printing_options: Vec<PrintingOption>,
    /// Sequence for the next variant code; never reused after deletes.
    next_seq: u32,
}

#[derive(Debug, Default)]
struct CatalogState {
    categories: Vec<Category>,
    products: BTreeMap<ProductCode, ProductRecord>,
}

#[derive(Debug, Default)]
struct ContentState {
    hero_images: Vec<HeroImage>,
    services: Vec<Service>,
    social_links: BTreeMap<String, SocialLink>,
}

pub struct MemoryStore {
    catalog: Mutex<CatalogState>,
    content: Mutex<ContentState>,
    allowlist: Mutex<BTreeMap<String, AllowlistEntry>>,
    rng: Mutex<StdRng>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Deterministic code generation for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            catalog: Mutex::new(CatalogState::default()),
            content: Mutex::new(ContentState::default()),
            allowlist: Mutex::new(BTreeMap::new()),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn catalog(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        self.catalog.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn content(&self) -> std::sync::MutexGuard<'_, ContentState> {
        self.content.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ── catalog ─────────────────────────────────────────────────────────

    fn create_category_sync(&self, new: NewCategory) -> Result<Category, StoreError> {
        new.validate()?;
        let mut state = self.catalog();
        if let Some(parent_id) = new.parent_id {
            if !state.categories.iter().any(|c| c.id == parent_id) {
                return Err(DomainError::not_found().into());
            }
        }
        category::ensure_unique_sibling(&new.name, new.parent_id, &state.categories, None)?;

        let created = Category {
            id: CategoryId::new(),
            slug: category::slugify(&new.name),
            name: new.name,
            parent_id: new.parent_id,
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    fn update_category_sync(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, StoreError> {
        let mut state = self.catalog();
        let current = state
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(DomainError::NotFound)?;

        let name = update.name.unwrap_or_else(|| current.name.clone());
        if name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty").into());
        }
        let parent_id = update.parent_id.unwrap_or(current.parent_id);

        category::ensure_acyclic_parent(id, parent_id, &state.categories)?;
        category::ensure_unique_sibling(&name, parent_id, &state.categories, Some(id))?;
        if let Some(p) = parent_id {
            if !state.categories.iter().any(|c| c.id == p) {
                return Err(DomainError::not_found().into());
            }
        }

        let slot = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::NotFound)?;
        slot.slug = category::slugify(&name);
        slot.name = name;
        slot.parent_id = parent_id;
        Ok(slot.clone())
    }

    fn delete_category_sync(&self, id: CategoryId) -> Result<(), StoreError> {
        let mut state = self.catalog();
        if !state.categories.iter().any(|c| c.id == id) {
            return Err(DomainError::not_found().into());
        }
        if state.categories.iter().any(|c| c.parent_id == Some(id)) {
            return Err(DomainError::invariant("category still has subcategories").into());
        }
        if state.products.values().any(|r| r.product.category_id == id) {
            return Err(DomainError::invariant("category still has products").into());
        }
        state.categories.retain(|c| c.id != id);
        Ok(())
    }

    fn list_categories_sync(&self) -> Vec<Category> {
        self.catalog().categories.clone()
    }

    fn create_product_sync(&self, new: NewProduct) -> Result<ProductDetail, StoreError> {
        new.validate()?;
        let mut state = self.catalog();
        let category_name = state
            .categories
            .iter()
            .find(|c| c.id == new.category_id)
            .map(|c| c.name.clone())
            .ok_or(DomainError::NotFound)?;

        let prefix = code::code_prefix(&category_name);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let product_code = (0..code::MAX_CODE_ATTEMPTS)
            .map(|_| code::candidate_code(&prefix, &mut *rng))
            .find(|candidate| !state.products.contains_key(candidate))
            .ok_or_else(|| {
                DomainError::conflict(format!("no free product code under prefix {prefix:?}"))
            })?;
        drop(rng);

        let mut variants = Vec::with_capacity(new.variants.len());
        for (index, input) in new.variants.iter().cloned().enumerate() {
            variants.push(input.into_variant(&product_code, index as u32 + 1)?);
        }
        let printing_options = new
            .printing_options
            .iter()
            .map(|name| PrintingOption {
                id: PrintingOptionId::new(),
                product_code: product_code.clone(),
                name: name.clone(),
            })
            .collect::<Vec<_>>();

        let record = ProductRecord {
            product: Product {
                code: product_code.clone(),
                name: new.name,
                description: new.description,
                category_id: new.category_id,
                total_available: product::total_of(&variants),
                multi_images: variants.len() > 1,
                materials: new.materials,
                item_size: new.item_size,
                item_weight: new.item_weight,
                created_at: Utc::now(),
            },
            next_seq: variants.len() as u32 + 1,
            variants,
            printing_options,
        };
        let detail = ProductDetail {
            product: record.product.clone(),
            variants: record.variants.clone(),
            printing_options: record.printing_options.clone(),
        };
        state.products.insert(product_code, record);
        Ok(detail)
    }

    fn get_product_sync(&self, code: &ProductCode) -> Result<ProductDetail, StoreError> {
        let state = self.catalog();
        let record = state.products.get(code).ok_or(DomainError::NotFound)?;
        Ok(ProductDetail {
            product: record.product.clone(),
            variants: record.variants.clone(),
            printing_options: record.printing_options.clone(),
        })
    }

    fn list_products_sync(&self, category: Option<CategoryId>) -> Vec<Product> {
        self.catalog()
            .products
            .values()
            .filter(|r| category.is_none_or(|id| r.product.category_id == id))
            .map(|r| r.product.clone())
            .collect()
    }

    fn update_product_sync(
        &self,
        code: &ProductCode,
        update: ProductUpdate,
    ) -> Result<Product, StoreError> {
        update.validate()?;
        let mut state = self.catalog();
        if let Some(category_id) = update.category_id {
            if !state.categories.iter().any(|c| c.id == category_id) {
                return Err(DomainError::not_found().into());
            }
        }
        let record = state.products.get_mut(code).ok_or(DomainError::NotFound)?;
        update.apply(&mut record.product);
        Ok(record.product.clone())
    }

    fn delete_product_sync(&self, code: &ProductCode) -> Result<(), StoreError> {
        // Variants and printing options live inside the record; removing it
        // is the cascading cleanup.
        self.catalog()
            .products
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found().into())
    }

    fn add_variant_sync(
        &self,
        code: &ProductCode,
        new: NewVariant,
    ) -> Result<ColorVariant, StoreError> {
        let mut state = self.catalog();
        let record = state.products.get_mut(code).ok_or(DomainError::NotFound)?;
        let created = new.into_variant(code, record.next_seq)?;
        record.next_seq += 1;
        record.variants.push(created.clone());
        record.product.total_available = product::total_of(&record.variants);
        Ok(created)
    }

    fn delete_variant_sync(
        &self,
        code: &ProductCode,
        variant_code: &VariantCode,
    ) -> Result<(), StoreError> {
        let mut state = self.catalog();
        let record = state.products.get_mut(code).ok_or(DomainError::NotFound)?;
        let index = record
            .variants
            .iter()
            .position(|v| v.code == *variant_code)
            .ok_or(DomainError::NotFound)?;
        variant::ensure_not_last(record.variants.len())?;
        record.variants.remove(index);
        record.product.total_available = product::total_of(&record.variants);
        Ok(())
    }

    fn sell_sync(
        &self,
        code: &ProductCode,
        variant_code: &VariantCode,
        quantity: i64,
    ) -> Result<SellOutcome, StoreError> {
        let mut state = self.catalog();
        let record = state.products.get_mut(code).ok_or(DomainError::NotFound)?;
        let slot = record
            .variants
            .iter_mut()
            .find(|v| v.code == *variant_code)
            .ok_or(DomainError::NotFound)?;
        variant::ensure_in_stock(slot.available, quantity)?;
        slot.available -= quantity;
        let variant_available = slot.available;
        record.product.total_available = product::total_of(&record.variants);
        Ok(SellOutcome {
            variant_available,
            total_available: record.product.total_available,
        })
    }

    // ── content ─────────────────────────────────────────────────────────

    fn add_hero_image_sync(&self, url: String) -> Result<HeroImage, StoreError> {
        if url.trim().is_empty() {
            return Err(DomainError::validation("image url cannot be empty").into());
        }
        let mut state = self.content();
        let next_order = state
            .hero_images
            .iter()
            .map(|i| i.sort_order)
            .max()
            .map_or(0, |max| max + 1);
        let image = HeroImage {
            id: HeroImageId::new(),
            url,
            sort_order: next_order,
            created_at: Utc::now(),
        };
        state.hero_images.push(image.clone());
        Ok(image)
    }

    fn list_hero_images_sync(&self) -> Vec<HeroImage> {
        hero::sorted_for_display(self.content().hero_images.clone())
    }

    fn delete_hero_image_sync(&self, id: HeroImageId) -> Result<(), StoreError> {
        let mut state = self.content();
        if !state.hero_images.iter().any(|i| i.id == id) {
            return Err(DomainError::not_found().into());
        }
        state.hero_images.retain(|i| i.id != id);
        Ok(())
    }

    fn reorder_hero_images_sync(&self, ids: Vec<HeroImageId>) -> Result<(), StoreError> {
        let mut state = self.content();
        let assignments = hero::order_assignments(&ids, &state.hero_images)?;
        for (id, sort_order) in assignments {
            if let Some(image) = state.hero_images.iter_mut().find(|i| i.id == id) {
                image.sort_order = sort_order;
            }
        }
        Ok(())
    }

    fn create_service_sync(&self, new: NewService) -> Result<Service, StoreError> {
        new.validate()?;
        let mut state = self.content();
        if state.services.iter().any(|s| s.category == new.category) {
            return Err(DomainError::conflict(format!(
                "a service for category {:?} already exists",
                new.category
            ))
            .into());
        }
        let service = Service {
            id: ServiceId::new(),
            category: new.category,
            title: new.title,
            body: new.body,
            image_url: new.image_url,
        };
        state.services.push(service.clone());
        Ok(service)
    }

    fn list_services_sync(&self) -> Vec<Service> {
        let mut services = self.content().services.clone();
        services.sort_by(|a, b| a.category.cmp(&b.category));
        services
    }

    fn update_service_sync(
        &self,
        id: ServiceId,
        update: ServiceUpdate,
    ) -> Result<Service, StoreError> {
        let mut state = self.content();
        let service = state
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DomainError::NotFound)?;
        update.apply(service);
        Ok(service.clone())
    }

    fn delete_service_sync(&self, id: ServiceId) -> Result<(), StoreError> {
        let mut state = self.content();
        if !state.services.iter().any(|s| s.id == id) {
            return Err(DomainError::not_found().into());
        }
        state.services.retain(|s| s.id != id);
        Ok(())
    }

    fn upsert_social_link_sync(&self, link: SocialLink) -> Result<SocialLink, StoreError> {
        link.validate()?;
        self.content()
            .social_links
            .insert(link.platform.clone(), link.clone());
        Ok(link)
    }

    fn list_social_links_sync(&self) -> Vec<SocialLink> {
        self.content().social_links.values().cloned().collect()
    }

    fn delete_social_link_sync(&self, platform: &str) -> Result<(), StoreError> {
        self.content()
            .social_links
            .remove(platform)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found().into())
    }

    // ── allow-list ──────────────────────────────────────────────────────

    fn allowlist_add_sync(&self, email: &str) -> Result<AllowlistEntry, StoreError> {
        validate_email(email)?;
        let mut state = self.allowlist.lock().unwrap_or_else(|e| e.into_inner());
        if state.contains_key(email) {
            return Err(DomainError::conflict(format!("{email} is already on the allow-list")).into());
        }
        let entry = AllowlistEntry {
            email: email.to_string(),
            added_at: Utc::now(),
        };
        state.insert(entry.email.clone(), entry.clone());
        Ok(entry)
    }

    fn allowlist_remove_sync(&self, email: &str) -> Result<(), StoreError> {
        self.allowlist
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(email)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found().into())
    }

    fn allowlist_list_sync(&self) -> Vec<AllowlistEntry> {
        self.allowlist
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }

    fn allowlist_contains_sync(&self, email: &str) -> bool {
        // Exact, case-sensitive match; see DESIGN.md.
        self.allowlist
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(email)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        self.create_category_sync(new)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, StoreError> {
        self.update_category_sync(id, update)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        self.delete_category_sync(id)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.list_categories_sync())
    }

    async fn create_product(&self, new: NewProduct) -> Result<ProductDetail, StoreError> {
        self.create_product_sync(new)
    }

    async fn get_product(&self, code: &ProductCode) -> Result<ProductDetail, StoreError> {
        self.get_product_sync(code)
    }

    async fn list_products(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, StoreError> {
        Ok(self.list_products_sync(category))
    }

    async fn update_product(
        &self,
        code: &ProductCode,
        update: ProductUpdate,
    ) -> Result<Product, StoreError> {
        self.update_product_sync(code, update)
    }

    async fn delete_product(&self, code: &ProductCode) -> Result<(), StoreError> {
        self.delete_product_sync(code)
    }

    async fn add_variant(
        &self,
        code: &ProductCode,
        new: NewVariant,
    ) -> Result<ColorVariant, StoreError> {
        self.add_variant_sync(code, new)
    }

    async fn delete_variant(
        &self,
        code: &ProductCode,
        variant: &VariantCode,
    ) -> Result<(), StoreError> {
        self.delete_variant_sync(code, variant)
    }

    async fn sell(
        &self,
        code: &ProductCode,
        variant: &VariantCode,
        quantity: i64,
    ) -> Result<SellOutcome, StoreError> {
        self.sell_sync(code, variant, quantity)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn add_hero_image(&self, url: String) -> Result<HeroImage, StoreError> {
        self.add_hero_image_sync(url)
    }

    async fn list_hero_images(&self) -> Result<Vec<HeroImage>, StoreError> {
        Ok(self.list_hero_images_sync())
    }

    async fn delete_hero_image(&self, id: HeroImageId) -> Result<(), StoreError> {
        self.delete_hero_image_sync(id)
    }

    async fn reorder_hero_images(&self, ids: Vec<HeroImageId>) -> Result<(), StoreError> {
        self.reorder_hero_images_sync(ids)
    }

    async fn create_service(&self, new: NewService) -> Result<Service, StoreError> {
        self.create_service_sync(new)
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        Ok(self.list_services_sync())
    }

    async fn update_service(
        &self,
        id: ServiceId,
        update: ServiceUpdate,
    ) -> Result<Service, StoreError> {
        self.update_service_sync(id, update)
    }

    async fn delete_service(&self, id: ServiceId) -> Result<(), StoreError> {
        self.delete_service_sync(id)
    }

    async fn upsert_social_link(&self, link: SocialLink) -> Result<SocialLink, StoreError> {
        self.upsert_social_link_sync(link)
    }

    async fn list_social_links(&self) -> Result<Vec<SocialLink>, StoreError> {
        Ok(self.list_social_links_sync())
    }

    async fn delete_social_link(&self, platform: &str) -> Result<(), StoreError> {
        self.delete_social_link_sync(platform)
    }
}

#[async_trait]
impl AllowlistStore for MemoryStore {
    async fn add(&self, email: &str) -> Result<AllowlistEntry, StoreError> {
        self.allowlist_add_sync(email)
    }

    async fn remove(&self, email: &str) -> Result<(), StoreError> {
        self.allowlist_remove_sync(email)
    }

    async fn list(&self) -> Result<Vec<AllowlistEntry>, StoreError> {
        Ok(self.allowlist_list_sync())
    }

    async fn contains(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.allowlist_contains_sync(email))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use promostore_catalog::product::total_of;

    use super::*;

    fn seeded() -> MemoryStore {
        MemoryStore::with_seed(7)
    }

    fn mugs_category(store: &MemoryStore) -> Category {
        store
            .create_category_sync(NewCategory {
                name: "Mugs".into(),
                parent_id: None,
            })
            .unwrap()
    }

    fn variant(name: &str, available: i64) -> NewVariant {
        NewVariant {
            name: name.into(),
            image_url: format!("https://files.example/{name}.png"),
            available,
        }
    }

    fn mug_product(store: &MemoryStore, variants: Vec<NewVariant>) -> ProductDetail {
        let cat = mugs_category(store);
        store
            .create_product_sync(NewProduct {
                name: "Classic Mug".into(),
                description: "11oz ceramic mug".into(),
                category_id: cat.id,
                materials: "ceramic".into(),
                item_size: "11oz".into(),
                item_weight: "300g".into(),
                variants,
                printing_options: vec!["screen print".into()],
            })
            .unwrap()
    }

    #[test]
    fn product_code_carries_category_prefix_and_five_digits() {
        let store = seeded();
        let detail = mug_product(&store, vec![variant("red", 3)]);
        let code = detail.product.code.as_str();
        assert!(code.starts_with("MUG"), "{code}");
        assert_eq!(code.len(), 8);
        assert!(code[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn two_products_in_succession_get_distinct_codes() {
        let store = seeded();
        let cat = mugs_category(&store);
        let new = |name: &str| NewProduct {
            name: name.into(),
            description: String::new(),
            category_id: cat.id,
            materials: String::new(),
            item_size: String::new(),
            item_weight: String::new(),
            variants: vec![variant("red", 1)],
            printing_options: vec![],
        };
        let a = store.create_product_sync(new("Mug A")).unwrap();
        let b = store.create_product_sync(new("Mug B")).unwrap();
        assert_ne!(a.product.code, b.product.code);
    }

    #[test]
    fn creation_seeds_total_and_multi_images() {
        let store = seeded();
        let detail = mug_product(&store, vec![variant("red", 4), variant("blue", 6)]);
        assert_eq!(detail.product.total_available, 10);
        assert!(detail.product.multi_images);
        assert_eq!(detail.variants[0].code.as_str().len(), 11);
        assert!(detail.variants[0].code.as_str().ends_with("C01"));
        assert!(detail.variants[1].code.as_str().ends_with("C02"));
    }

    #[test]
    fn invalid_variant_fails_whole_creation() {
        let store = seeded();
        let cat = mugs_category(&store);
        let err = store
            .create_product_sync(NewProduct {
                name: "Broken".into(),
                description: String::new(),
                category_id: cat.id,
                materials: String::new(),
                item_size: String::new(),
                item_weight: String::new(),
                variants: vec![variant("red", 3), variant("blue", -1)],
                printing_options: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
        assert!(store.list_products_sync(None).is_empty());
    }

    #[test]
    fn sell_decrements_variant_and_total_together() {
        let store = seeded();
        let detail = mug_product(&store, vec![variant("red", 4), variant("blue", 6)]);
        let code = detail.product.code.clone();
        let red = detail.variants[0].code.clone();

        let outcome = store.sell_sync(&code, &red, 3).unwrap();
        assert_eq!(outcome.variant_available, 1);
        assert_eq!(outcome.total_available, 7);

        // Selling exactly what's left drives the variant to zero.
        let outcome = store.sell_sync(&code, &red, 1).unwrap();
        assert_eq!(outcome.variant_available, 0);
        assert_eq!(outcome.total_available, 6);
    }

    #[test]
    fn oversell_is_rejected_with_no_state_change() {
        let store = seeded();
        let detail = mug_product(&store, vec![variant("red", 5)]);
        let code = detail.product.code.clone();
        let red = detail.variants[0].code.clone();

        let err = store.sell_sync(&code, &red, 6).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::InsufficientStock {
                requested: 6,
                available: 5
            })
        ));

        let after = store.get_product_sync(&code).unwrap();
        assert_eq!(after.variants[0].available, 5);
        assert_eq!(after.product.total_available, 5);
    }

    #[test]
    fn add_variant_recomputes_total_in_the_same_operation() {
        let store = seeded();
        let detail = mug_product(&store, vec![variant("red", 4)]);
        let code = detail.product.code.clone();

        let added = store.add_variant_sync(&code, variant("blue", 9)).unwrap();
        assert!(added.code.as_str().ends_with("C02"));

        let after = store.get_product_sync(&code).unwrap();
        assert_eq!(after.product.total_available, 13);
    }

    #[test]
    fn delete_variant_recomputes_total_and_protects_the_last_one() {
        let store = seeded();
        let detail = mug_product(&store, vec![variant("red", 4), variant("blue", 6)]);
        let code = detail.product.code.clone();
        let red = detail.variants[0].code.clone();
        let blue = detail.variants[1].code.clone();

        store.delete_variant_sync(&code, &red).unwrap();
        let after = store.get_product_sync(&code).unwrap();
        assert_eq!(after.product.total_available, 6);

        let err = store.delete_variant_sync(&code, &blue).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::InvariantViolation(_))
        ));
        let after = store.get_product_sync(&code).unwrap();
        assert_eq!(after.variants.len(), 1);
        assert_eq!(after.product.total_available, 6);
    }

    #[test]
    fn deleting_an_unknown_variant_is_not_found_even_on_a_one_variant_product() {
        let store = seeded();
        let detail = mug_product(&store, vec![variant("red", 4)]);
        let code = detail.product.code.clone();
        let bogus: VariantCode = format!("{code}C99").parse().unwrap();

        // The missing row wins over the last-variant guard.
        let err = store.delete_variant_sync(&code, &bogus).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::NotFound)));
    }

    #[test]
    fn variant_codes_are_never_reused_after_a_delete() {
        let store = seeded();
        let detail = mug_product(&store, vec![variant("red", 1), variant("blue", 2)]);
        let code = detail.product.code.clone();
        store
            .delete_variant_sync(&code, &detail.variants[1].code)
            .unwrap();
        let added = store.add_variant_sync(&code, variant("green", 3)).unwrap();
        assert!(added.code.as_str().ends_with("C03"));
    }

    #[test]
    fn duplicate_sibling_category_is_rejected_but_other_parent_is_fine() {
        let store = seeded();
        let top = store
            .create_category_sync(NewCategory {
                name: "Drinkware".into(),
                parent_id: None,
            })
            .unwrap();
        store
            .create_category_sync(NewCategory {
                name: "Classic".into(),
                parent_id: Some(top.id),
            })
            .unwrap();

        let err = store
            .create_category_sync(NewCategory {
                name: "Classic".into(),
                parent_id: Some(top.id),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict(_))));

        // Same name at the top level is a different sibling set.
        assert!(store
            .create_category_sync(NewCategory {
                name: "Classic".into(),
                parent_id: None,
            })
            .is_ok());
    }

    #[test]
    fn category_with_products_cannot_be_deleted() {
        let store = seeded();
        let detail = mug_product(&store, vec![variant("red", 1)]);
        let err = store
            .delete_category_sync(detail.product.category_id)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn hero_reorder_is_persisted_and_read_back_in_order() {
        let store = seeded();
        let a = store.add_hero_image_sync("a.jpg".into()).unwrap();
        let b = store.add_hero_image_sync("b.jpg".into()).unwrap();
        let c = store.add_hero_image_sync("c.jpg".into()).unwrap();

        store.reorder_hero_images_sync(vec![c.id, a.id, b.id]).unwrap();

        let listed = store.list_hero_images_sync();
        let urls: Vec<_> = listed.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["c.jpg", "a.jpg", "b.jpg"]);
        assert_eq!(
            listed.iter().map(|i| i.sort_order).collect::<Vec<_>>(),
            [0, 1, 2]
        );
    }

    #[test]
    fn partial_hero_reorder_leaves_unlisted_images_in_place() {
        let store = seeded();
        let a = store.add_hero_image_sync("a.jpg".into()).unwrap();
        let b = store.add_hero_image_sync("b.jpg".into()).unwrap();
        let c = store.add_hero_image_sync("c.jpg".into()).unwrap();

        store.reorder_hero_images_sync(vec![c.id, b.id]).unwrap();

        let listed = store.list_hero_images_sync();
        let a_after = listed.iter().find(|i| i.id == a.id).unwrap();
        assert_eq!(a_after.sort_order, 0);
        // c now also sits at 0; the earlier-created a wins the tie on display.
        let urls: Vec<_> = listed.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["a.jpg", "c.jpg", "b.jpg"]);
    }

    #[test]
    fn allowlist_is_exact_match_and_rejects_duplicates() {
        let store = seeded();
        store.allowlist_add_sync("admin@promostore.example").unwrap();

        assert!(store.allowlist_contains_sync("admin@promostore.example"));
        assert!(!store.allowlist_contains_sync("Admin@promostore.example"));

        let err = store.allowlist_add_sync("admin@promostore.example").unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict(_))));

        store.allowlist_remove_sync("admin@promostore.example").unwrap();
        assert!(!store.allowlist_contains_sync("admin@promostore.example"));
    }

    #[test]
    fn allowlist_rejects_malformed_emails() {
        let store = seeded();
        let err = store.allowlist_add_sync("not-an-email").unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
    }

    #[test]
    fn social_links_upsert_by_platform() {
        let store = seeded();
        store
            .upsert_social_link_sync(SocialLink {
                platform: "instagram".into(),
                url: "https://instagram.com/old".into(),
                label: "IG".into(),
            })
            .unwrap();
        store
            .upsert_social_link_sync(SocialLink {
                platform: "instagram".into(),
                url: "https://instagram.com/new".into(),
                label: "Instagram".into(),
            })
            .unwrap();

        let links = store.list_social_links_sync();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://instagram.com/new");
    }

    // ── invariant property ──────────────────────────────────────────────

    #[derive(Debug, Clone)]
    enum Op {
        Sell { variant: usize, quantity: i64 },
        Add { available: i64 },
        Delete { variant: usize },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..6, 0i64..60).prop_map(|(variant, quantity)| Op::Sell { variant, quantity }),
            (0i64..50).prop_map(|available| Op::Add { available }),
            (0usize..6).prop_map(|variant| Op::Delete { variant }),
        ]
    }

    proptest! {
        /// After any sequence of create/sell/add/delete-variant operations,
        /// `total_available` equals the sum of the variants' `available`.
        #[test]
        fn total_available_always_matches_variant_sum(
            initial in proptest::collection::vec(0i64..50, 1..4),
            ops in proptest::collection::vec(op_strategy(), 0..24),
        ) {
            let store = MemoryStore::with_seed(99);
            let variants = initial
                .iter()
                .enumerate()
                .map(|(i, &available)| variant(&format!("color{i}"), available))
                .collect();
            let code = mug_product(&store, variants).product.code;

            for op in ops {
                let detail = store.get_product_sync(&code).unwrap();
                match op {
                    Op::Sell { variant, quantity } => {
                        let target = detail.variants[variant % detail.variants.len()].code.clone();
                        let _ = store.sell_sync(&code, &target, quantity);
                    }
                    Op::Add { available } => {
                        let name = format!("extra{}", detail.variants.len());
                        let _ = store.add_variant_sync(&code, self::variant(&name, available));
                    }
                    Op::Delete { variant } => {
                        let target = detail.variants[variant % detail.variants.len()].code.clone();
                        let _ = store.delete_variant_sync(&code, &target);
                    }
                }

                let after = store.get_product_sync(&code).unwrap();
                prop_assert_eq!(after.product.total_available, total_of(&after.variants));
                prop_assert!(after.variants.iter().all(|v| v.available >= 0));
            }
        }
    }
}
