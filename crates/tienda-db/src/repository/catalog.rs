//! # Catalog Repository
//!
//! Sizes and products: the rows variants point at.
//!
//! Catalog management proper (editing, searching, images) lives outside this
//! crate. These operations exist so that variants have valid foreign keys and
//! so the seed binary and tests can build a catalog.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use tienda_core::{Money, Product, Size};

/// Repository for sizes and products.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Sizes
    // =========================================================================

    /// Creates a size. `name` is unique.
    pub async fn create_size(&self, name: &str, display_name: &str, sort_order: i64) -> DbResult<Size> {
        let size = Size {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            display_name: display_name.to_string(),
            sort_order,
        };

        debug!(id = %size.id, name = %size.name, "Inserting size");

        sqlx::query("INSERT INTO sizes (id, name, display_name, sort_order) VALUES (?1, ?2, ?3, ?4)")
            .bind(&size.id)
            .bind(&size.name)
            .bind(&size.display_name)
            .bind(size.sort_order)
            .execute(&self.pool)
            .await?;

        Ok(size)
    }

    /// Gets a size by its unique short name ("M", "38", "UNICA").
    pub async fn get_size_by_name(&self, name: &str) -> DbResult<Option<Size>> {
        let size = sqlx::query_as::<_, Size>(
            "SELECT id, name, display_name, sort_order FROM sizes WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(size)
    }

    /// All sizes in picker order.
    pub async fn list_sizes(&self) -> DbResult<Vec<Size>> {
        let sizes = sqlx::query_as::<_, Size>(
            "SELECT id, name, display_name, sort_order FROM sizes ORDER BY sort_order, name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sizes)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Creates an active product.
    pub async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
        category: Option<&str>,
        base_price: Money,
    ) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            category: category.map(str::to_string),
            base_price_cents: base_price.cents(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, category,
                base_price_cents, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.base_price_cents)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, description, category,
                base_price_cents, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }
}
