//! # Transaction Repository
//!
//! Database operations for ledger transactions and their items.
//!
//! ## Transaction Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Transaction Lifecycle                                │
//! │                                                                         │
//! │  1. CREATE (inside the ledger's unit of work)                          │
//! │     └── insert_in_tx()      → transactions row, status COMPLETADA      │
//! │     └── insert_item_in_tx() → one transaction_items row per line       │
//! │                                                                         │
//! │  2. (OPTIONAL) CANCEL                                                  │
//! │     └── mark_cancelled_in_tx() → status CANCELADA                      │
//! │         guarded by WHERE status = 'COMPLETADA', so it flips once       │
//! │                                                                         │
//! │  Rows are never deleted; items are never updated.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use tienda_core::{
    StockMovement, Transaction, TransactionItem, TransactionStatus, TransactionType,
};

/// Resolved listing query: filters plus a concrete page window.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a transaction by ID, items included.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let mut conn = self.pool.acquire().await?;

        let Some(mut transaction) = Self::fetch_in_tx(&mut *conn, id).await? else {
            return Ok(None);
        };
        transaction.items = Self::fetch_items_in_tx(&mut *conn, id).await?;

        Ok(Some(transaction))
    }

    /// Gets all items of a transaction.
    pub async fn get_items(&self, transaction_id: &str) -> DbResult<Vec<TransactionItem>> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_items_in_tx(&mut *conn, transaction_id).await
    }

    /// Lists one page of transactions (newest first) and the total number of
    /// rows matching the filters.
    ///
    /// Absent filters bind as NULL and switch their clause off.
    pub async fn list(&self, query: &ListQuery) -> DbResult<(Vec<Transaction>, i64)> {
        let transaction_type = query.transaction_type.map(|t| t.as_str());
        let status = query.status.map(|s| s.as_str());

        let mut conn = self.pool.acquire().await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE (?1 IS NULL OR type = ?1)
              AND (?2 IS NULL OR status = ?2)
              AND (?3 IS NULL OR created_at >= ?3)
              AND (?4 IS NULL OR created_at <= ?4)
            "#,
        )
        .bind(transaction_type)
        .bind(status)
        .bind(query.from)
        .bind(query.to)
        .fetch_one(&mut *conn)
        .await?;

        let mut rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                id, type, status, user_id, user_name,
                total_cents, notes, created_at, updated_at
            FROM transactions
            WHERE (?1 IS NULL OR type = ?1)
              AND (?2 IS NULL OR status = ?2)
              AND (?3 IS NULL OR created_at >= ?3)
              AND (?4 IS NULL OR created_at <= ?4)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?5 OFFSET ?6
            "#,
        )
        .bind(transaction_type)
        .bind(status)
        .bind(query.from)
        .bind(query.to)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&mut *conn)
        .await?;

        for transaction in &mut rows {
            transaction.items = Self::fetch_items_in_tx(&mut *conn, &transaction.id).await?;
        }

        Ok((rows, total))
    }

    /// Every item that moved `variant_id`, annotated with its transaction,
    /// most recent first.
    pub async fn history_for_variant(&self, variant_id: &str) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT
                i.id AS item_id,
                i.transaction_id,
                i.variant_id,
                i.quantity,
                i.unit_price_cents,
                i.subtotal_cents,
                t.type AS transaction_type,
                t.status,
                t.user_name,
                t.created_at
            FROM transaction_items i
            INNER JOIN transactions t ON t.id = i.transaction_id
            WHERE i.variant_id = ?1
            ORDER BY t.created_at DESC, t.rowid DESC, i.rowid ASC
            "#,
        )
        .bind(variant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    // =========================================================================
    // Unit-of-work operations
    // =========================================================================

    /// Reads a transaction header (without items) inside a unit of work.
    pub async fn fetch_in_tx(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                id, type, status, user_id, user_name,
                total_cents, notes, created_at, updated_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(transaction)
    }

    /// Reads the items of a transaction, in insertion order.
    pub async fn fetch_items_in_tx(
        conn: &mut SqliteConnection,
        transaction_id: &str,
    ) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT
                id, transaction_id, variant_id,
                quantity, unit_price_cents, subtotal_cents
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(transaction_id)
        .fetch_all(conn)
        .await?;

        Ok(items)
    }

    /// Inserts a transaction header.
    pub async fn insert_in_tx(conn: &mut SqliteConnection, transaction: &Transaction) -> DbResult<()> {
        debug!(
            id = %transaction.id,
            transaction_type = transaction.transaction_type.as_str(),
            total_cents = transaction.total_cents,
            "Inserting transaction"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, type, status, user_id, user_name,
                total_cents, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&transaction.id)
        .bind(transaction.transaction_type)
        .bind(transaction.status)
        .bind(&transaction.user_id)
        .bind(&transaction.user_name)
        .bind(transaction.total_cents)
        .bind(&transaction.notes)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Inserts one transaction item.
    pub async fn insert_item_in_tx(conn: &mut SqliteConnection, item: &TransactionItem) -> DbResult<()> {
        debug!(
            transaction_id = %item.transaction_id,
            variant_id = %item.variant_id,
            quantity = item.quantity,
            "Inserting transaction item"
        );

        sqlx::query(
            r#"
            INSERT INTO transaction_items (
                id, transaction_id, variant_id,
                quantity, unit_price_cents, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&item.id)
        .bind(&item.transaction_id)
        .bind(&item.variant_id)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.subtotal_cents)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Flips a completed transaction to CANCELADA.
    ///
    /// ## Returns
    /// * `true` - status changed
    /// * `false` - transaction missing or no longer COMPLETADA
    pub async fn mark_cancelled_in_tx(
        conn: &mut SqliteConnection,
        id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = ?2,
                updated_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(id)
        .bind(TransactionStatus::Cancelled)
        .bind(now)
        .bind(TransactionStatus::Completed)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
