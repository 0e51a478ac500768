//! # Stock Ledger Engine
//!
//! The only code that changes `variants.stock`.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale(actor, lines, notes)                                       │
//! │                                                                         │
//! │  validate lines, sum demand, total ──(bad input)──► ValidationError   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ─────────────────────────────────────────────────────────┐      │
//! │  │ 1. read every variant          ──(missing)──► NotFound       │      │
//! │  │ 2. stock >= demand, ALL lines  ──(short)────► Insufficient   │      │
//! │  │ 3. subtotal = qty × price, total = Σ                         │      │
//! │  │ 4. INSERT transaction + items                                │      │
//! │  │ 5. UPDATE stock - demand WHERE stock + delta >= 0            │      │
//! │  └ 6. COMMIT ──(stale snapshot / busy)──► Conflict              ┘      │
//! │                                                                         │
//! │  Any early return drops the sqlx::Transaction, which rolls back.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! SQLite admits one writer at a time. Two sales that read the same stock
//! cannot both commit: the second one to write finds its read snapshot stale
//! (`SQLITE_BUSY_SNAPSHOT`) or the database locked (`SQLITE_BUSY`), and fails
//! with [`ErrorCode::Conflict`](tienda_core::ErrorCode::Conflict). The engine
//! never retries; the caller may.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{DbError, LedgerError, LedgerResult};
use crate::repository::{TransactionRepository, VariantRepository};
use tienda_core::stock;
use tienda_core::validation::{
    validate_adjust_quantity, validate_entry_lines, validate_id, validate_notes,
    validate_sale_lines, validate_stock_ceiling, ValidationResult,
};
use tienda_core::{
    Actor, CoreError, EntryLine, Money, SaleLine, StockAdjustmentMode, Transaction,
    TransactionItem, TransactionStatus, TransactionType, Variant,
};

/// Sale, entry, cancellation and adjustment, each as one atomic unit.
///
/// Obtained from [`Database::ledger`](crate::Database::ledger). The caller
/// is responsible for authentication and role checks; the engine trusts the
/// [`Actor`] it is given.
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger { pool }
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a sale and takes the sold units out of stock.
    ///
    /// ## Errors
    /// - `VALIDATION_ERROR` - no lines, quantity or price out of range, or a
    ///   total that does not fit in `i64`
    /// - `NOT_FOUND` - a variant does not exist
    /// - `INSUFFICIENT_STOCK` - a variant holds fewer units than requested
    ///   (repeated lines for one variant are summed)
    /// - `CONFLICT` - a concurrent writer won the race
    ///
    /// On any error no transaction exists and no stock changed.
    pub async fn create_sale(
        &self,
        actor: &Actor,
        lines: &[SaleLine],
        notes: Option<&str>,
    ) -> LedgerResult<Transaction> {
        let result = async {
            validate_sale_lines(lines)?;
            let notes = validate_notes(notes)?;
            let demand = stock::demand_by_variant(lines)?;
            let total = stock::sale_total(lines)?;
            self.record_sale(actor, lines, &demand, total, notes).await
        }
        .await;

        match &result {
            Ok(sale) => info!(
                transaction_id = %sale.id,
                user_id = %actor.id,
                items = sale.items.len(),
                total = %sale.total(),
                "Sale recorded"
            ),
            Err(err) => log_rejection("create_sale", err),
        }

        result
    }

    async fn record_sale(
        &self,
        actor: &Actor,
        lines: &[SaleLine],
        demand: &[(String, i64)],
        total: Money,
        notes: Option<String>,
    ) -> LedgerResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        // Steps 1-2: every variant is read and checked before anything is written
        for (variant_id, requested) in demand {
            let variant = require_variant(&mut tx, variant_id).await?;
            if !variant.can_fulfil(*requested) {
                return Err(insufficient(variant, *requested).into());
            }
        }

        // Steps 3-4
        let now = Utc::now();
        let mut sale = new_transaction(actor, TransactionType::Sale, notes, now);
        sale.total_cents = total.cents();
        sale.items = lines
            .iter()
            .map(|line| {
                Ok(TransactionItem {
                    id: Uuid::new_v4().to_string(),
                    transaction_id: sale.id.clone(),
                    variant_id: line.variant_id.clone(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                    subtotal_cents: stock::line_subtotal(line)?.cents(),
                })
            })
            .collect::<ValidationResult<_>>()?;
        write_transaction(&mut tx, &sale).await?;

        // Step 5
        for (variant_id, requested) in demand {
            if !VariantRepository::apply_delta_in_tx(&mut tx, variant_id, -requested, now).await? {
                let variant = require_variant(&mut tx, variant_id).await?;
                return Err(insufficient(variant, *requested).into());
            }
        }

        // Step 6
        tx.commit().await?;
        Ok(sale)
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Records received goods and adds them to stock.
    ///
    /// Unit cost is stored as the item's unit price (zero when omitted);
    /// subtotals and the total are always zero.
    ///
    /// ## Errors
    /// - `VALIDATION_ERROR` - no lines, quantity or cost out of range, or a
    ///   variant's stock would pass [`MAX_STOCK`](tienda_core::MAX_STOCK)
    /// - `NOT_FOUND` - a variant does not exist
    /// - `CONFLICT` - a concurrent writer won the race
    pub async fn create_entry(
        &self,
        actor: &Actor,
        lines: &[EntryLine],
        notes: Option<&str>,
    ) -> LedgerResult<Transaction> {
        let result = async {
            validate_entry_lines(lines)?;
            let notes = validate_notes(notes)?;
            let supply = stock::supply_by_variant(lines)?;
            self.record_entry(actor, lines, &supply, notes).await
        }
        .await;

        match &result {
            Ok(entry) => info!(
                transaction_id = %entry.id,
                user_id = %actor.id,
                items = entry.items.len(),
                units = entry.items.iter().map(|i| i.quantity).sum::<i64>(),
                "Entry recorded"
            ),
            Err(err) => log_rejection("create_entry", err),
        }

        result
    }

    async fn record_entry(
        &self,
        actor: &Actor,
        lines: &[EntryLine],
        supply: &[(String, i64)],
        notes: Option<String>,
    ) -> LedgerResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        for (variant_id, received) in supply {
            let variant = require_variant(&mut tx, variant_id).await?;
            validate_stock_ceiling(variant.stock.checked_add(*received))?;
        }

        let now = Utc::now();
        let mut entry = new_transaction(actor, TransactionType::Entry, notes, now);
        entry.items = lines
            .iter()
            .map(|line| TransactionItem {
                id: Uuid::new_v4().to_string(),
                transaction_id: entry.id.clone(),
                variant_id: line.variant_id.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_cost().cents(),
                subtotal_cents: 0,
            })
            .collect();
        write_transaction(&mut tx, &entry).await?;

        for (variant_id, received) in supply {
            if !VariantRepository::apply_delta_in_tx(&mut tx, variant_id, *received, now).await? {
                return Err(CoreError::VariantNotFound(variant_id.clone()).into());
            }
        }

        tx.commit().await?;
        Ok(entry)
    }

    // =========================================================================
    // Cancellation
    // =========================================================================

    /// Cancels a completed transaction and reverses its stock effect.
    ///
    /// ```text
    /// VENTA   cancel → stock += qty  (goods come back)
    /// ENTRADA cancel → stock -= qty  (goods never arrived)
    /// ```
    ///
    /// ## Errors
    /// - `NOT_FOUND` - unknown transaction
    /// - `INVALID_STATE` - already CANCELADA, or reversing an entry would take
    ///   a variant below zero because its units were sold meanwhile
    /// - `CONFLICT` - a concurrent writer won the race
    pub async fn cancel(&self, transaction_id: &str) -> LedgerResult<Transaction> {
        let result = async {
            validate_id("transaction_id", transaction_id)?;
            self.reverse(transaction_id).await
        }
        .await;

        match &result {
            Ok(cancelled) => info!(
                transaction_id = %cancelled.id,
                transaction_type = cancelled.transaction_type.as_str(),
                items = cancelled.items.len(),
                "Transaction cancelled"
            ),
            Err(err) => log_rejection("cancel", err),
        }

        result
    }

    async fn reverse(&self, transaction_id: &str) -> LedgerResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        let mut transaction = TransactionRepository::fetch_in_tx(&mut tx, transaction_id)
            .await?
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;

        if !transaction.status.can_cancel() {
            return Err(invalid_status(&transaction).into());
        }

        transaction.items = TransactionRepository::fetch_items_in_tx(&mut tx, transaction_id).await?;

        let now = Utc::now();
        for (variant_id, delta) in
            stock::reversal_by_variant(transaction.transaction_type, &transaction.items)?
        {
            if !VariantRepository::apply_delta_in_tx(&mut tx, &variant_id, delta, now).await? {
                let variant = require_variant(&mut tx, &variant_id).await?;
                return Err(CoreError::ReversalBlocked {
                    transaction_id: transaction.id,
                    variant_id,
                    available: variant.stock,
                    required: -delta,
                }
                .into());
            }
        }

        // Guarded flip: a racing cancel that got here first leaves no row to match
        if !TransactionRepository::mark_cancelled_in_tx(&mut tx, transaction_id, now).await? {
            return Err(CoreError::InvalidTransactionStatus {
                transaction_id: transaction.id,
                current_status: TransactionStatus::Cancelled.as_str().to_string(),
            }
            .into());
        }

        tx.commit().await?;

        transaction.status = TransactionStatus::Cancelled;
        transaction.updated_at = now;
        Ok(transaction)
    }

    // =========================================================================
    // Direct Adjustment
    // =========================================================================

    /// Corrects a miscount without a ledger record.
    ///
    /// | mode     | result                     |
    /// |----------|----------------------------|
    /// | INCREASE | stock + quantity           |
    /// | DECREASE | max(0, stock - quantity)   |
    /// | SET      | quantity                   |
    ///
    /// Adjustments never appear in stock history; `reason` is only logged.
    ///
    /// ## Errors
    /// - `VALIDATION_ERROR` - quantity < 0, or the result would pass
    ///   [`MAX_STOCK`](tienda_core::MAX_STOCK)
    /// - `NOT_FOUND` - unknown variant
    /// - `CONFLICT` - stock changed between read and write
    pub async fn adjust_stock(
        &self,
        variant_id: &str,
        quantity: i64,
        mode: StockAdjustmentMode,
        reason: Option<&str>,
    ) -> LedgerResult<Variant> {
        let result = async {
            validate_id("variant_id", variant_id)?;
            validate_adjust_quantity(quantity)?;
            self.apply_adjustment(variant_id, quantity, mode).await
        }
        .await;

        match &result {
            Ok((variant, previous)) => info!(
                variant_id = %variant.id,
                mode = ?mode,
                quantity,
                previous,
                stock = variant.stock,
                reason = reason.unwrap_or(""),
                "Stock adjusted"
            ),
            Err(err) => log_rejection("adjust_stock", err),
        }

        result.map(|(variant, _)| variant)
    }

    async fn apply_adjustment(
        &self,
        variant_id: &str,
        quantity: i64,
        mode: StockAdjustmentMode,
    ) -> LedgerResult<(Variant, i64)> {
        let mut tx = self.pool.begin().await?;

        let mut variant = require_variant(&mut tx, variant_id).await?;
        let previous = variant.stock;
        let now = Utc::now();
        variant.stock = validate_stock_ceiling(Some(mode.apply(previous, quantity)))?;

        let written = VariantRepository::compare_and_set_in_tx(
            &mut tx,
            variant_id,
            previous,
            variant.stock,
            now,
        )
        .await?;
        if !written {
            return Err(DbError::Conflict(format!(
                "stock of variant {variant_id} changed during adjustment"
            ))
            .into());
        }

        tx.commit().await?;

        variant.updated_at = now;
        Ok((variant, previous))
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn require_variant(conn: &mut SqliteConnection, variant_id: &str) -> LedgerResult<Variant> {
    VariantRepository::fetch_in_tx(conn, variant_id)
        .await?
        .ok_or_else(|| CoreError::VariantNotFound(variant_id.to_string()).into())
}

fn new_transaction(
    actor: &Actor,
    transaction_type: TransactionType,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id: Uuid::new_v4().to_string(),
        transaction_type,
        status: TransactionStatus::Completed,
        user_id: actor.id.clone(),
        user_name: actor.name.clone(),
        total_cents: 0,
        notes,
        created_at: now,
        updated_at: now,
        items: Vec::new(),
    }
}

async fn write_transaction(conn: &mut SqliteConnection, transaction: &Transaction) -> LedgerResult<()> {
    TransactionRepository::insert_in_tx(&mut *conn, transaction).await?;
    for item in &transaction.items {
        TransactionRepository::insert_item_in_tx(&mut *conn, item).await?;
    }
    Ok(())
}

fn insufficient(variant: Variant, requested: i64) -> CoreError {
    CoreError::InsufficientStock {
        variant_id: variant.id,
        available: variant.stock,
        requested,
    }
}

fn invalid_status(transaction: &Transaction) -> CoreError {
    CoreError::InvalidTransactionStatus {
        transaction_id: transaction.id.clone(),
        current_status: transaction.status.as_str().to_string(),
    }
}

fn log_rejection(operation: &'static str, err: &LedgerError) {
    warn!(operation, code = ?err.code(), error = %err, "Ledger operation rejected");
}
