//! # Stock Queries
//!
//! Read-only views over variants and the transaction ledger.
//!
//! ```text
//! stock_level(id)          → { id, stock }
//! low_stock(threshold?)    → active variants with stock <= threshold
//! stock_history(id)        → ledger items for one variant, newest first
//! list_transactions(f)     → Page<Transaction>
//! get_transaction(id)      → Transaction with items
//! ```
//!
//! Direct adjustments leave no ledger record, so they never show up in
//! `stock_history`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::LedgerResult;
use crate::repository::transaction::ListQuery;
use crate::repository::{TransactionRepository, VariantRepository};
use tienda_core::validation::{
    validate_date_range, validate_id, validate_pagination, validate_threshold,
};
use tienda_core::{
    CoreError, Page, PageMeta, StockLevel, StockMovement, Transaction, TransactionFilter, Variant,
    DEFAULT_LOW_STOCK_THRESHOLD,
};

/// Read-only stock and transaction queries.
///
/// Obtained from [`Database::stock`](crate::Database::stock).
#[derive(Debug, Clone)]
pub struct StockQueries {
    pool: SqlitePool,
    low_stock_threshold: i64,
}

impl StockQueries {
    pub fn new(pool: SqlitePool) -> Self {
        StockQueries {
            pool,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    /// Overrides the threshold `low_stock(None)` uses.
    pub fn with_low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    fn variants(&self) -> VariantRepository {
        VariantRepository::new(self.pool.clone())
    }

    fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    /// Current stock count of a variant.
    pub async fn stock_level(&self, variant_id: &str) -> LedgerResult<StockLevel> {
        validate_id("variant_id", variant_id)?;

        let level = self
            .variants()
            .stock_level(variant_id)
            .await?
            .ok_or_else(|| CoreError::VariantNotFound(variant_id.to_string()))?;

        Ok(level)
    }

    /// Active variants whose stock is at or below `threshold`, emptiest first.
    pub async fn low_stock(&self, threshold: Option<i64>) -> LedgerResult<Vec<Variant>> {
        let threshold = threshold.unwrap_or(self.low_stock_threshold);
        validate_threshold(threshold)?;

        let variants = self.variants().list_low_stock(threshold).await?;
        debug!(threshold, count = variants.len(), "Low stock listed");

        Ok(variants)
    }

    /// Ledger movements of one variant, most recent transaction first.
    ///
    /// An unknown variant simply has no history.
    pub async fn stock_history(&self, variant_id: &str) -> LedgerResult<Vec<StockMovement>> {
        validate_id("variant_id", variant_id)?;

        let movements = self.transactions().history_for_variant(variant_id).await?;
        Ok(movements)
    }

    /// One page of transactions, newest first.
    pub async fn list_transactions(&self, filter: &TransactionFilter) -> LedgerResult<Page<Transaction>> {
        let (page, limit) = validate_pagination(filter.page, filter.limit)?;
        validate_date_range(filter.from, filter.to)?;

        let meta = PageMeta::new(0, page, limit);
        let query = ListQuery {
            transaction_type: filter.transaction_type,
            status: filter.status,
            from: filter.from,
            to: filter.to,
            limit: i64::from(limit),
            offset: meta.offset(),
        };

        let (data, total) = self.transactions().list(&query).await?;
        debug!(page, limit, total, "Transactions listed");

        Ok(Page {
            data,
            meta: PageMeta::new(total, page, limit),
        })
    }

    /// A transaction with its items.
    pub async fn get_transaction(&self, transaction_id: &str) -> LedgerResult<Transaction> {
        validate_id("transaction_id", transaction_id)?;

        let transaction = self
            .transactions()
            .get_by_id(transaction_id)
            .await?
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;

        Ok(transaction)
    }
}
