//! # Variant Repository
//!
//! Database operations for variants and their stock counts.
//!
//! ## Stock Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every stock write carries its own guard in the WHERE clause:          │
//! │                                                                         │
//! │  apply_delta_in_tx                                                     │
//! │    UPDATE variants SET stock = stock + ?delta                          │
//! │    WHERE id = ? AND stock + ?delta >= 0                                │
//! │    rows = 0 → the row would have gone negative (or is gone)            │
//! │                                                                         │
//! │  compare_and_set_in_tx                                                 │
//! │    UPDATE variants SET stock = ?new                                    │
//! │    WHERE id = ? AND stock = ?expected                                  │
//! │    rows = 0 → someone changed stock since it was read                  │
//! │                                                                         │
//! │  Stock is never written as "read, compute, overwrite" without one.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tienda_core::{Money, StockLevel, Variant};

/// Repository for variant database operations.
#[derive(Debug, Clone)]
pub struct VariantRepository {
    pool: SqlitePool,
}

impl VariantRepository {
    /// Creates a new VariantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VariantRepository { pool }
    }

    // =========================================================================
    // Catalog-side operations
    // =========================================================================

    /// Creates a variant with an initial stock count.
    ///
    /// Catalog management owns variant creation; the opening stock is the
    /// only stock value written outside the ledger.
    pub async fn create(
        &self,
        product_id: &str,
        size_id: &str,
        color: &str,
        initial_stock: i64,
        price_override: Option<Money>,
    ) -> DbResult<Variant> {
        let now = Utc::now();
        let variant = Variant {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            size_id: size_id.to_string(),
            color: color.to_string(),
            stock: initial_stock,
            price_override_cents: price_override.map(|p| p.cents()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.insert(&variant).await?;
        Ok(variant)
    }

    /// Inserts a variant row.
    pub async fn insert(&self, variant: &Variant) -> DbResult<()> {
        debug!(id = %variant.id, product_id = %variant.product_id, color = %variant.color, "Inserting variant");

        sqlx::query(
            r#"
            INSERT INTO variants (
                id, product_id, size_id, color,
                stock, price_override_cents, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&variant.id)
        .bind(&variant.product_id)
        .bind(&variant.size_id)
        .bind(&variant.color)
        .bind(variant.stock)
        .bind(variant.price_override_cents)
        .bind(variant.is_active)
        .bind(variant.created_at)
        .bind(variant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Sets the soft-delete flag.
    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE variants SET is_active = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(is_active)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Variant", id));
        }

        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a variant by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Variant>> {
        let variant = sqlx::query_as::<_, Variant>(
            r#"
            SELECT
                id, product_id, size_id, color,
                stock, price_override_cents, is_active,
                created_at, updated_at
            FROM variants
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variant)
    }

    /// Gets only the stock count of a variant.
    pub async fn stock_level(&self, id: &str) -> DbResult<Option<StockLevel>> {
        let level = sqlx::query_as::<_, StockLevel>("SELECT id, stock FROM variants WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(level)
    }

    /// Active variants at or below `threshold`, emptiest first.
    pub async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<Variant>> {
        let variants = sqlx::query_as::<_, Variant>(
            r#"
            SELECT
                id, product_id, size_id, color,
                stock, price_override_cents, is_active,
                created_at, updated_at
            FROM variants
            WHERE is_active = 1 AND stock <= ?1
            ORDER BY stock ASC, id ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(variants)
    }

    // =========================================================================
    // Unit-of-work operations
    // =========================================================================

    /// Reads a variant inside the caller's unit of work.
    pub async fn fetch_in_tx(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Variant>> {
        let variant = sqlx::query_as::<_, Variant>(
            r#"
            SELECT
                id, product_id, size_id, color,
                stock, price_override_cents, is_active,
                created_at, updated_at
            FROM variants
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(variant)
    }

    /// Adds `delta` (positive or negative) to stock unless the result would
    /// be negative.
    ///
    /// ## Returns
    /// * `true` - stock updated
    /// * `false` - no row matched: the variant is missing or `stock + delta < 0`
    pub async fn apply_delta_in_tx(
        conn: &mut SqliteConnection,
        id: &str,
        delta: i64,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(variant_id = %id, delta, "Applying stock delta");

        let result = sqlx::query(
            r#"
            UPDATE variants
            SET stock = stock + ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Writes `new_stock` only if stock still equals `expected`.
    ///
    /// ## Returns
    /// * `true` - stock updated
    /// * `false` - stock changed since it was read
    pub async fn compare_and_set_in_tx(
        conn: &mut SqliteConnection,
        id: &str,
        expected: i64,
        new_stock: i64,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(variant_id = %id, expected, new_stock, "Setting stock");

        let result = sqlx::query(
            r#"
            UPDATE variants
            SET stock = ?3,
                updated_at = ?4
            WHERE id = ?1 AND stock = ?2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(new_stock)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
