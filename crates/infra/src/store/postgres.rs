//! Postgres-backed store.
//!
//! Every multi-row operation runs inside one transaction so partial failure
//! leaves no visible inconsistency. `products.total_available` is maintained
//! as a materialized view: it is recomputed from the variant rows inside the
//! same transaction as any variant mutation, never patched incrementally.
//!
//! The sell path uses a conditional update
//! (`available = available - $q ... AND available >= $q`) so two concurrent
//! sells race at the row level inside the database instead of in application
//! code; there is no read-then-write window to lose an update in.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use async_trait::async_trait;

use promostore_auth::{validate_email, AllowlistEntry};
use promostore_catalog::product::PrintingOption;
use promostore_catalog::{
    category, code, Category, CategoryUpdate, ColorVariant, NewCategory, NewProduct, NewVariant,
    Product, ProductDetail, ProductUpdate,
};
use promostore_catalog::variant;
use promostore_content::{hero, HeroImage, NewService, Service, ServiceUpdate, SocialLink};
use promostore_core::{
    CategoryId, DomainError, HeroImageId, PrintingOptionId, ProductCode, ServiceId, VariantCode,
};

use super::{AllowlistStore, CatalogStore, ContentStore, SellOutcome, StoreError};

/// Postgres implementation of all three store traits.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        slug TEXT NOT NULL,
        parent_id UUID REFERENCES categories(id)
    )
    "#,
    // Sibling uniqueness: NULL parents form one sibling set, so plain
    // UNIQUE (name, parent_id) would not cover the top level.
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS categories_sibling_name ON categories
        (name, COALESCE(parent_id, '00000000-0000-0000-0000-000000000000'::uuid))
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        category_id UUID NOT NULL REFERENCES categories(id),
        total_available BIGINT NOT NULL DEFAULT 0,
        multi_images BOOLEAN NOT NULL DEFAULT FALSE,
        materials TEXT NOT NULL DEFAULT '',
        item_size TEXT NOT NULL DEFAULT '',
        item_weight TEXT NOT NULL DEFAULT '',
        next_seq INT NOT NULL DEFAULT 1,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS color_variants (
        code TEXT PRIMARY KEY,
        product_code TEXT NOT NULL REFERENCES products(code),
        name TEXT NOT NULL,
        image_url TEXT NOT NULL DEFAULT '',
        available BIGINT NOT NULL CHECK (available >= 0),
        seq INT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS printing_options (
        id UUID PRIMARY KEY,
        product_code TEXT NOT NULL REFERENCES products(code),
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hero_images (
        id UUID PRIMARY KEY,
        url TEXT NOT NULL,
        sort_order INT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS services (
        id UUID PRIMARY KEY,
        category TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        body TEXT NOT NULL DEFAULT '',
        image_url TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS social_links (
        platform TEXT PRIMARY KEY,
        url TEXT NOT NULL,
        label TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS admin_allowlist (
        email TEXT PRIMARY KEY,
        added_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Recompute `total_available` from the variant rows. Must run inside the
/// same transaction as the variant mutation it follows.
const RECOMPUTE_TOTAL: &str = r#"
    UPDATE products
    SET total_available = COALESCE(
        (SELECT SUM(available)::BIGINT FROM color_variants WHERE product_code = $1), 0)
    WHERE code = $1
    RETURNING total_available
"#;

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::backend("connect", e))?;
        Ok(Self { pool })
    }

    /// Create the schema when missing. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::backend("ensure_schema", e))?;
        }
        Ok(())
    }

    async fn load_categories(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, name, slug, parent_id FROM categories")
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| StoreError::backend("load_categories", e))?;
        rows.iter().map(category_from_row).collect()
    }
}

fn map_unique_violation(op: &str, conflict: &str, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            return DomainError::conflict(conflict.to_string()).into();
        }
    }
    StoreError::backend(op, e)
}

fn category_from_row(row: &PgRow) -> Result<Category, StoreError> {
    Ok(Category {
        id: CategoryId::from_uuid(
            row.try_get("id")
                .map_err(|e| StoreError::backend("category row", e))?,
        ),
        name: row
            .try_get("name")
            .map_err(|e| StoreError::backend("category row", e))?,
        slug: row
            .try_get("slug")
            .map_err(|e| StoreError::backend("category row", e))?,
        parent_id: row
            .try_get::<Option<Uuid>, _>("parent_id")
            .map_err(|e| StoreError::backend("category row", e))?
            .map(CategoryId::from_uuid),
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let get = |e: sqlx::Error| StoreError::backend("product row", e);
    Ok(Product {
        code: ProductCode::from_generated(row.try_get("code").map_err(get)?),
        name: row.try_get("name").map_err(|e| StoreError::backend("product row", e))?,
        description: row
            .try_get("description")
            .map_err(|e| StoreError::backend("product row", e))?,
        category_id: CategoryId::from_uuid(
            row.try_get("category_id")
                .map_err(|e| StoreError::backend("product row", e))?,
        ),
        total_available: row
            .try_get("total_available")
            .map_err(|e| StoreError::backend("product row", e))?,
        multi_images: row
            .try_get("multi_images")
            .map_err(|e| StoreError::backend("product row", e))?,
        materials: row
            .try_get("materials")
            .map_err(|e| StoreError::backend("product row", e))?,
        item_size: row
            .try_get("item_size")
            .map_err(|e| StoreError::backend("product row", e))?,
        item_weight: row
            .try_get("item_weight")
            .map_err(|e| StoreError::backend("product row", e))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| StoreError::backend("product row", e))?,
    })
}

fn variant_from_row(row: &PgRow) -> Result<ColorVariant, StoreError> {
    let err = |e: sqlx::Error| StoreError::backend("variant row", e);
    Ok(ColorVariant {
        code: VariantCode::from_generated(row.try_get("code").map_err(err)?),
        product_code: ProductCode::from_generated(
            row.try_get("product_code")
                .map_err(|e| StoreError::backend("variant row", e))?,
        ),
        name: row
            .try_get("name")
            .map_err(|e| StoreError::backend("variant row", e))?,
        image_url: row
            .try_get("image_url")
            .map_err(|e| StoreError::backend("variant row", e))?,
        available: row
            .try_get("available")
            .map_err(|e| StoreError::backend("variant row", e))?,
        seq: row
            .try_get::<i32, _>("seq")
            .map_err(|e| StoreError::backend("variant row", e))? as u32,
    })
}

fn hero_from_row(row: &PgRow) -> Result<HeroImage, StoreError> {
    let err = |e: sqlx::Error| StoreError::backend("hero row", e);
    Ok(HeroImage {
        id: HeroImageId::from_uuid(row.try_get("id").map_err(err)?),
        url: row
            .try_get("url")
            .map_err(|e| StoreError::backend("hero row", e))?,
        sort_order: row
            .try_get("sort_order")
            .map_err(|e| StoreError::backend("hero row", e))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StoreError::backend("hero row", e))?,
    })
}

fn service_from_row(row: &PgRow) -> Result<Service, StoreError> {
    let err = |e: sqlx::Error| StoreError::backend("service row", e);
    Ok(Service {
        id: ServiceId::from_uuid(row.try_get("id").map_err(err)?),
        category: row
            .try_get("category")
            .map_err(|e| StoreError::backend("service row", e))?,
        title: row
            .try_get("title")
            .map_err(|e| StoreError::backend("service row", e))?,
        body: row
            .try_get("body")
            .map_err(|e| StoreError::backend("service row", e))?,
        image_url: row
            .try_get("image_url")
            .map_err(|e| StoreError::backend("service row", e))?,
    })
}

impl PgStore {
    async fn fetch_detail(&self, code: &ProductCode) -> Result<ProductDetail, StoreError> {
        let product_row = sqlx::query("SELECT * FROM products WHERE code = $1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::backend("get_product", e))?
            .ok_or(DomainError::NotFound)?;
        let product = product_from_row(&product_row)?;

        let variant_rows =
            sqlx::query("SELECT * FROM color_variants WHERE product_code = $1 ORDER BY seq")
                .bind(code.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::backend("get_product", e))?;
        let variants = variant_rows
            .iter()
            .map(variant_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let option_rows =
            sqlx::query("SELECT id, product_code, name FROM printing_options WHERE product_code = $1")
                .bind(code.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::backend("get_product", e))?;
        let printing_options = option_rows
            .iter()
            .map(|row| {
                Ok(PrintingOption {
                    id: PrintingOptionId::from_uuid(
                        row.try_get("id")
                            .map_err(|e| StoreError::backend("printing row", e))?,
                    ),
                    product_code: code.clone(),
                    name: row
                        .try_get("name")
                        .map_err(|e| StoreError::backend("printing row", e))?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(ProductDetail {
            product,
            variants,
            printing_options,
        })
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        new.validate()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("create_category", e))?;

        if let Some(parent_id) = new.parent_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                    .bind(parent_id.as_uuid())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| StoreError::backend("create_category", e))?;
            if !exists {
                return Err(DomainError::not_found().into());
            }
        }

        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND parent_id IS NOT DISTINCT FROM $2)",
        )
        .bind(&new.name)
        .bind(new.parent_id.map(|p| *p.as_uuid()))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::backend("create_category", e))?;
        if duplicate {
            return Err(DomainError::conflict(format!(
                "a category named {:?} already exists at this level",
                new.name
            ))
            .into());
        }

        let created = Category {
            id: CategoryId::new(),
            slug: category::slugify(&new.name),
            name: new.name,
            parent_id: new.parent_id,
        };
        sqlx::query("INSERT INTO categories (id, name, slug, parent_id) VALUES ($1, $2, $3, $4)")
            .bind(created.id.as_uuid())
            .bind(&created.name)
            .bind(&created.slug)
            .bind(created.parent_id.map(|p| *p.as_uuid()))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_unique_violation(
                    "create_category",
                    "a category with this name already exists at this level",
                    e,
                )
            })?;
        tx.commit()
            .await
            .map_err(|e| StoreError::backend("create_category", e))?;
        Ok(created)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("update_category", e))?;

        let current_row = sqlx::query("SELECT id, name, slug, parent_id FROM categories WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("update_category", e))?
            .ok_or(DomainError::NotFound)?;
        let current = category_from_row(&current_row)?;

        let name = update.name.unwrap_or_else(|| current.name.clone());
        if name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty").into());
        }
        let parent_id = update.parent_id.unwrap_or(current.parent_id);

        let all = self.load_categories(&mut tx).await?;
        category::ensure_acyclic_parent(id, parent_id, &all)?;
        category::ensure_unique_sibling(&name, parent_id, &all, Some(id))?;
        if let Some(p) = parent_id {
            if !all.iter().any(|c| c.id == p) {
                return Err(DomainError::not_found().into());
            }
        }

        let updated = Category {
            id,
            slug: category::slugify(&name),
            name,
            parent_id,
        };
        sqlx::query("UPDATE categories SET name = $2, slug = $3, parent_id = $4 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(&updated.name)
            .bind(&updated.slug)
            .bind(updated.parent_id.map(|p| *p.as_uuid()))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_unique_violation(
                    "update_category",
                    "a category with this name already exists at this level",
                    e,
                )
            })?;
        tx.commit()
            .await
            .map_err(|e| StoreError::backend("update_category", e))?;
        Ok(updated)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("delete_category", e))?;

        let has_children: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| StoreError::backend("delete_category", e))?;
        if has_children {
            return Err(DomainError::invariant("category still has subcategories").into());
        }
        let has_products: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE category_id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| StoreError::backend("delete_category", e))?;
        if has_products {
            return Err(DomainError::invariant("category still has products").into());
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("delete_category", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        tx.commit()
            .await
            .map_err(|e| StoreError::backend("delete_category", e))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, name, slug, parent_id FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend("list_categories", e))?;
        rows.iter().map(category_from_row).collect()
    }

    #[tracing::instrument(skip(self, new), fields(product = %new.name), err)]
    async fn create_product(&self, new: NewProduct) -> Result<ProductDetail, StoreError> {
        new.validate()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("create_product", e))?;

        let category_name: String =
            sqlx::query_scalar("SELECT name FROM categories WHERE id = $1")
                .bind(new.category_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| StoreError::backend("create_product", e))?
                .ok_or(DomainError::NotFound)?;

        // Pre-draw every candidate so the RNG never crosses an await point.
        let prefix = code::code_prefix(&category_name);
        let candidates: Vec<ProductCode> = {
            let mut rng = rand::thread_rng();
            (0..code::MAX_CODE_ATTEMPTS)
                .map(|_| code::candidate_code(&prefix, &mut rng))
                .collect()
        };

        let created_at = Utc::now();
        let mut product_code = None;
        for candidate in candidates {
            // The primary key resolves the collision race; DO NOTHING turns a
            // taken code into a retry instead of an error.
            let result = sqlx::query(
                r#"
                INSERT INTO products
                    (code, name, description, category_id, total_available, multi_images,
                     materials, item_size, item_weight, next_seq, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                ON CONFLICT (code) DO NOTHING
                "#,
            )
            .bind(candidate.as_str())
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.category_id.as_uuid())
            .bind(new.initial_total())
            .bind(new.multi_images())
            .bind(&new.materials)
            .bind(&new.item_size)
            .bind(&new.item_weight)
            .bind(new.variants.len() as i32 + 1)
            .bind(created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("create_product", e))?;

            if result.rows_affected() == 1 {
                product_code = Some(candidate);
                break;
            }
        }
        let product_code = product_code.ok_or_else(|| {
            DomainError::conflict(format!("no free product code under prefix {prefix:?}"))
        })?;

        let mut variants = Vec::with_capacity(new.variants.len());
        for (index, input) in new.variants.iter().cloned().enumerate() {
            let created = input.into_variant(&product_code, index as u32 + 1)?;
            sqlx::query(
                "INSERT INTO color_variants (code, product_code, name, image_url, available, seq)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(created.code.as_str())
            .bind(product_code.as_str())
            .bind(&created.name)
            .bind(&created.image_url)
            .bind(created.available)
            .bind(created.seq as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("create_product", e))?;
            variants.push(created);
        }

        let mut printing_options = Vec::with_capacity(new.printing_options.len());
        for name in &new.printing_options {
            let option = PrintingOption {
                id: PrintingOptionId::new(),
                product_code: product_code.clone(),
                name: name.clone(),
            };
            sqlx::query("INSERT INTO printing_options (id, product_code, name) VALUES ($1, $2, $3)")
                .bind(option.id.as_uuid())
                .bind(product_code.as_str())
                .bind(&option.name)
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::backend("create_product", e))?;
            printing_options.push(option);
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::backend("create_product", e))?;

        Ok(ProductDetail {
            product: Product {
                code: product_code,
                name: new.name,
                description: new.description,
                category_id: new.category_id,
                total_available: promostore_catalog::product::total_of(&variants),
                multi_images: variants.len() > 1,
                materials: new.materials,
                item_size: new.item_size,
                item_weight: new.item_weight,
                created_at,
            },
            variants,
            printing_options,
        })
    }

    async fn get_product(&self, code: &ProductCode) -> Result<ProductDetail, StoreError> {
        self.fetch_detail(code).await
    }

    async fn list_products(&self, category: Option<CategoryId>) -> Result<Vec<Product>, StoreError> {
        let rows = match category {
            Some(id) => {
                sqlx::query("SELECT * FROM products WHERE category_id = $1 ORDER BY created_at")
                    .bind(id.as_uuid())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT * FROM products ORDER BY created_at")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| StoreError::backend("list_products", e))?;
        rows.iter().map(product_from_row).collect()
    }

    async fn update_product(
        &self,
        code: &ProductCode,
        update: ProductUpdate,
    ) -> Result<Product, StoreError> {
        update.validate()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("update_product", e))?;

        if let Some(category_id) = update.category_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                    .bind(category_id.as_uuid())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| StoreError::backend("update_product", e))?;
            if !exists {
                return Err(DomainError::not_found().into());
            }
        }

        let row = sqlx::query("SELECT * FROM products WHERE code = $1 FOR UPDATE")
            .bind(code.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("update_product", e))?
            .ok_or(DomainError::NotFound)?;
        let mut product = product_from_row(&row)?;
        update.apply(&mut product);

        sqlx::query(
            "UPDATE products SET name = $2, description = $3, category_id = $4,
             materials = $5, item_size = $6, item_weight = $7 WHERE code = $1",
        )
        .bind(code.as_str())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id.as_uuid())
        .bind(&product.materials)
        .bind(&product.item_size)
        .bind(&product.item_weight)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::backend("update_product", e))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::backend("update_product", e))?;
        Ok(product)
    }

    async fn delete_product(&self, code: &ProductCode) -> Result<(), StoreError> {
        // Dependents first; no DB-level cascade is assumed.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("delete_product", e))?;

        sqlx::query("DELETE FROM printing_options WHERE product_code = $1")
            .bind(code.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("delete_product", e))?;
        sqlx::query("DELETE FROM color_variants WHERE product_code = $1")
            .bind(code.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("delete_product", e))?;
        let result = sqlx::query("DELETE FROM products WHERE code = $1")
            .bind(code.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("delete_product", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::backend("delete_product", e))
    }

    async fn add_variant(
        &self,
        code: &ProductCode,
        new: NewVariant,
    ) -> Result<ColorVariant, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("add_variant", e))?;

        // Lock the product row to serialize sequence assignment.
        let next_seq: i32 =
            sqlx::query_scalar("SELECT next_seq FROM products WHERE code = $1 FOR UPDATE")
                .bind(code.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| StoreError::backend("add_variant", e))?
                .ok_or(DomainError::NotFound)?;

        let created = new.into_variant(code, next_seq as u32)?;
        sqlx::query(
            "INSERT INTO color_variants (code, product_code, name, image_url, available, seq)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(created.code.as_str())
        .bind(code.as_str())
        .bind(&created.name)
        .bind(&created.image_url)
        .bind(created.available)
        .bind(created.seq as i32)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::backend("add_variant", e))?;

        sqlx::query("UPDATE products SET next_seq = next_seq + 1 WHERE code = $1")
            .bind(code.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("add_variant", e))?;
        sqlx::query(RECOMPUTE_TOTAL)
            .bind(code.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("add_variant", e))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::backend("add_variant", e))?;
        Ok(created)
    }

    async fn delete_variant(
        &self,
        code: &ProductCode,
        variant_code: &VariantCode,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("delete_variant", e))?;

        sqlx::query("SELECT code FROM products WHERE code = $1 FOR UPDATE")
            .bind(code.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("delete_variant", e))?
            .ok_or(DomainError::NotFound)?;

        // Target must exist before the last-variant guard, so a bogus variant
        // code on a one-variant product is a 404, not a guard failure.
        sqlx::query("SELECT code FROM color_variants WHERE product_code = $1 AND code = $2")
            .bind(code.as_str())
            .bind(variant_code.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("delete_variant", e))?
            .ok_or(DomainError::NotFound)?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM color_variants WHERE product_code = $1")
                .bind(code.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| StoreError::backend("delete_variant", e))?;
        variant::ensure_not_last(count as usize)?;

        sqlx::query("DELETE FROM color_variants WHERE product_code = $1 AND code = $2")
            .bind(code.as_str())
            .bind(variant_code.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("delete_variant", e))?;

        sqlx::query(RECOMPUTE_TOTAL)
            .bind(code.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("delete_variant", e))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::backend("delete_variant", e))
    }

    #[tracing::instrument(skip(self), fields(product = %code, variant = %variant_code), err)]
    async fn sell(
        &self,
        code: &ProductCode,
        variant_code: &VariantCode,
        quantity: i64,
    ) -> Result<SellOutcome, StoreError> {
        if quantity <= 0 {
            return Err(DomainError::validation("sale quantity must be positive").into());
        }
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("sell", e))?;

        let variant_available: Option<i64> = sqlx::query_scalar(
            "UPDATE color_variants SET available = available - $3
             WHERE product_code = $1 AND code = $2 AND available >= $3
             RETURNING available",
        )
        .bind(code.as_str())
        .bind(variant_code.as_str())
        .bind(quantity)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::backend("sell", e))?;

        let variant_available = match variant_available {
            Some(v) => v,
            None => {
                // Distinguish "no such variant" from "not enough stock".
                let available: Option<i64> = sqlx::query_scalar(
                    "SELECT available FROM color_variants WHERE product_code = $1 AND code = $2",
                )
                .bind(code.as_str())
                .bind(variant_code.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| StoreError::backend("sell", e))?;
                return match available {
                    Some(available) => Err(DomainError::InsufficientStock {
                        requested: quantity,
                        available,
                    }
                    .into()),
                    None => Err(DomainError::not_found().into()),
                };
            }
        };

        let total_available: i64 = sqlx::query_scalar(RECOMPUTE_TOTAL)
            .bind(code.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("sell", e))?
            .ok_or(DomainError::NotFound)?;

        tx.commit()
            .await
            .map_err(|e| StoreError::backend("sell", e))?;
        Ok(SellOutcome {
            variant_available,
            total_available,
        })
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn add_hero_image(&self, url: String) -> Result<HeroImage, StoreError> {
        if url.trim().is_empty() {
            return Err(DomainError::validation("image url cannot be empty").into());
        }
        let image = HeroImage {
            id: HeroImageId::new(),
            url,
            sort_order: 0,
            created_at: Utc::now(),
        };
        // Appended images land after everything currently in the carousel.
        let row = sqlx::query(
            "INSERT INTO hero_images (id, url, sort_order, created_at)
             SELECT $1, $2, COALESCE(MAX(sort_order) + 1, 0), $3 FROM hero_images
             RETURNING id, url, sort_order, created_at",
        )
        .bind(image.id.as_uuid())
        .bind(&image.url)
        .bind(image.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::backend("add_hero_image", e))?;
        hero_from_row(&row)
    }

    async fn list_hero_images(&self) -> Result<Vec<HeroImage>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, url, sort_order, created_at FROM hero_images
             ORDER BY sort_order, created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::backend("list_hero_images", e))?;
        rows.iter().map(hero_from_row).collect()
    }

    async fn delete_hero_image(&self, id: HeroImageId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM hero_images WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend("delete_hero_image", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    async fn reorder_hero_images(&self, ids: Vec<HeroImageId>) -> Result<(), StoreError> {
        // Full rewrite of the listed rows; last concurrent writer wins.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("reorder_hero_images", e))?;

        let rows = sqlx::query("SELECT id, url, sort_order, created_at FROM hero_images FOR UPDATE")
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("reorder_hero_images", e))?;
        let existing = rows
            .iter()
            .map(hero_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        for (id, sort_order) in hero::order_assignments(&ids, &existing)? {
            sqlx::query("UPDATE hero_images SET sort_order = $2 WHERE id = $1")
                .bind(id.as_uuid())
                .bind(sort_order)
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::backend("reorder_hero_images", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::backend("reorder_hero_images", e))
    }

    async fn create_service(&self, new: NewService) -> Result<Service, StoreError> {
        new.validate()?;
        let service = Service {
            id: ServiceId::new(),
            category: new.category,
            title: new.title,
            body: new.body,
            image_url: new.image_url,
        };
        sqlx::query(
            "INSERT INTO services (id, category, title, body, image_url) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(service.id.as_uuid())
        .bind(&service.category)
        .bind(&service.title)
        .bind(&service.body)
        .bind(&service.image_url)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                "create_service",
                "a service for this category already exists",
                e,
            )
        })?;
        Ok(service)
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, category, title, body, image_url FROM services ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::backend("list_services", e))?;
        rows.iter().map(service_from_row).collect()
    }

    async fn update_service(
        &self,
        id: ServiceId,
        update: ServiceUpdate,
    ) -> Result<Service, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("update_service", e))?;

        let row = sqlx::query(
            "SELECT id, category, title, body, image_url FROM services WHERE id = $1 FOR UPDATE",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::backend("update_service", e))?
        .ok_or(DomainError::NotFound)?;
        let mut service = service_from_row(&row)?;
        update.apply(&mut service);

        sqlx::query("UPDATE services SET title = $2, body = $3, image_url = $4 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(&service.title)
            .bind(&service.body)
            .bind(&service.image_url)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("update_service", e))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::backend("update_service", e))?;
        Ok(service)
    }

    async fn delete_service(&self, id: ServiceId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend("delete_service", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    async fn upsert_social_link(&self, link: SocialLink) -> Result<SocialLink, StoreError> {
        link.validate()?;
        sqlx::query(
            "INSERT INTO social_links (platform, url, label) VALUES ($1, $2, $3)
             ON CONFLICT (platform) DO UPDATE SET url = EXCLUDED.url, label = EXCLUDED.label",
        )
        .bind(&link.platform)
        .bind(&link.url)
        .bind(&link.label)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend("upsert_social_link", e))?;
        Ok(link)
    }

    async fn list_social_links(&self) -> Result<Vec<SocialLink>, StoreError> {
        let rows = sqlx::query("SELECT platform, url, label FROM social_links ORDER BY platform")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend("list_social_links", e))?;
        rows.iter()
            .map(|row| {
                Ok(SocialLink {
                    platform: row
                        .try_get("platform")
                        .map_err(|e| StoreError::backend("social row", e))?,
                    url: row
                        .try_get("url")
                        .map_err(|e| StoreError::backend("social row", e))?,
                    label: row
                        .try_get("label")
                        .map_err(|e| StoreError::backend("social row", e))?,
                })
            })
            .collect()
    }

    async fn delete_social_link(&self, platform: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM social_links WHERE platform = $1")
            .bind(platform)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend("delete_social_link", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }
}

#[async_trait]
impl AllowlistStore for PgStore {
    async fn add(&self, email: &str) -> Result<AllowlistEntry, StoreError> {
        validate_email(email)?;
        let entry = AllowlistEntry {
            email: email.to_string(),
            added_at: Utc::now(),
        };
        sqlx::query("INSERT INTO admin_allowlist (email, added_at) VALUES ($1, $2)")
            .bind(&entry.email)
            .bind(entry.added_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation("allowlist_add", "email is already on the allow-list", e)
            })?;
        Ok(entry)
    }

    async fn remove(&self, email: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM admin_allowlist WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend("allowlist_remove", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AllowlistEntry>, StoreError> {
        let rows = sqlx::query("SELECT email, added_at FROM admin_allowlist ORDER BY email")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend("allowlist_list", e))?;
        rows.iter()
            .map(|row| {
                Ok(AllowlistEntry {
                    email: row
                        .try_get("email")
                        .map_err(|e| StoreError::backend("allowlist row", e))?,
                    added_at: row
                        .try_get("added_at")
                        .map_err(|e| StoreError::backend("allowlist row", e))?,
                })
            })
            .collect()
    }

    async fn contains(&self, email: &str) -> Result<bool, StoreError> {
        // Exact, case-sensitive match; see DESIGN.md.
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM admin_allowlist WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::backend("allowlist_contains", e))
    }
}
