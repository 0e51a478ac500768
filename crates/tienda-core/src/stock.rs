//! # Stock Arithmetic
//!
//! Pure calculations the ledger engine performs inside a unit of work:
//! adjustment rules, per-variant demand, line subtotals and reversal deltas.
//!
//! ```text
//!   create_sale ──► demand_by_variant ──► check stock ──► line_subtotal / total
//!   cancel ───────► reversal_by_variant ──► check stock + delta >= 0
//!   adjust_stock ─► StockAdjustmentMode::apply
//! ```
//!
//! Sums and products are checked: a request whose numbers do not fit in
//! `i64` is a [`ValidationError`], never a wrapped value.

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{EntryLine, SaleLine, StockAdjustmentMode, TransactionItem, TransactionType};
use crate::validation::ValidationResult;

// =============================================================================
// Adjustments
// =============================================================================

impl StockAdjustmentMode {
    /// Computes the new stock for an administrative adjustment.
    ///
    /// `DECREASE` is floor-clamped at zero. `quantity` is assumed validated
    /// (non-negative).
    ///
    /// ```rust
    /// use tienda_core::StockAdjustmentMode;
    ///
    /// assert_eq!(StockAdjustmentMode::Increase.apply(4, 3), 7);
    /// assert_eq!(StockAdjustmentMode::Decrease.apply(4, 10), 0);
    /// assert_eq!(StockAdjustmentMode::Set.apply(4, 12), 12);
    /// ```
    pub fn apply(&self, current: i64, quantity: i64) -> i64 {
        match self {
            StockAdjustmentMode::Increase => current.saturating_add(quantity),
            StockAdjustmentMode::Decrease => current.saturating_sub(quantity).max(0),
            StockAdjustmentMode::Set => quantity,
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Sums requested quantities per variant, in first-appearance order.
///
/// Two lines for the same variant must be checked against stock together,
/// otherwise each could pass on its own and the pair overdraw the variant.
pub fn demand_by_variant(lines: &[SaleLine]) -> ValidationResult<Vec<(String, i64)>> {
    sum_by_variant(lines.iter().map(|l| (l.variant_id.as_str(), l.quantity)))
}

/// Sums received quantities per variant, in first-appearance order.
pub fn supply_by_variant(lines: &[EntryLine]) -> ValidationResult<Vec<(String, i64)>> {
    sum_by_variant(lines.iter().map(|l| (l.variant_id.as_str(), l.quantity)))
}

/// Subtotal of one sale line.
#[inline]
pub fn line_subtotal(line: &SaleLine) -> ValidationResult<Money> {
    line.unit_price
        .checked_multiply_quantity(line.quantity)
        .ok_or_else(|| amount_overflow("subtotal"))
}

/// Total of a sale: the sum of its line subtotals.
pub fn sale_total(lines: &[SaleLine]) -> ValidationResult<Money> {
    lines.iter().try_fold(Money::zero(), |total, line| {
        total
            .checked_add(line_subtotal(line)?)
            .ok_or_else(|| amount_overflow("total"))
    })
}

// =============================================================================
// Reversals
// =============================================================================

/// Signed stock change that undoes one line of a transaction.
///
/// | original | reversal |
/// |----------|----------|
/// | VENTA    | +qty     |
/// | ENTRADA  | -qty     |
#[inline]
pub fn reversal_delta(transaction_type: TransactionType, quantity: i64) -> i64 {
    match transaction_type {
        TransactionType::Sale => quantity,
        TransactionType::Entry => -quantity,
    }
}

/// Net reversal per variant for a whole transaction, in first-appearance order.
pub fn reversal_by_variant(
    transaction_type: TransactionType,
    items: &[TransactionItem],
) -> ValidationResult<Vec<(String, i64)>> {
    sum_by_variant(
        items
            .iter()
            .map(|i| (i.variant_id.as_str(), reversal_delta(transaction_type, i.quantity))),
    )
}

fn sum_by_variant<'a>(
    pairs: impl Iterator<Item = (&'a str, i64)>,
) -> ValidationResult<Vec<(String, i64)>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, i64)> = Vec::new();

    for (variant_id, qty) in pairs {
        match index.get(variant_id) {
            Some(&i) => {
                totals[i].1 = totals[i]
                    .1
                    .checked_add(qty)
                    .ok_or_else(|| amount_overflow("quantity"))?;
            }
            None => {
                index.insert(variant_id, totals.len());
                totals.push((variant_id.to_string(), qty));
            }
        }
    }

    Ok(totals)
}

fn amount_overflow(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: i64::MIN,
        max: i64::MAX,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
