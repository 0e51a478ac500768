//! # Domain Types
//!
//! Core domain types of the Tienda stock ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Variant      │   │   Transaction   │   │ TransactionItem │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──┼─────────────────┼───│  variant_id     │       │
//! │  │  product_id     │   │  id (UUID)      │◄──│  transaction_id │       │
//! │  │  size_id        │   │  type           │   │  quantity       │       │
//! │  │  color          │   │  status         │   │  unit_price     │       │
//! │  │  stock (>= 0)   │   │  total_cents    │   │  subtotal       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ TransactionType │   │TransactionStatus│   │      Role       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  VENTA          │   │  COMPLETADA ──┐ │   │  ADMIN          │       │
//! │  │  ENTRADA        │   │  CANCELADA ◄──┘ │   │  VENDEDORA      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A Transaction owns its items (they are created and live with it). A
//! Variant is only referenced by items; the ledger never deletes variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Role & Actor
// =============================================================================

/// Role of an authenticated user.
///
/// Authorization happens in the boundary layer. The capability helpers
/// below describe which operations each role may invoke there.
///
/// | operation                       | ADMIN | VENDEDORA |
/// |---------------------------------|-------|-----------|
/// | create sale                     |  yes  |    yes    |
/// | create entry / cancel / adjust  |  yes  |    no     |
/// | list / get transactions         |  yes  |    no     |
/// | stock level / low / history     |  yes  |    yes    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ADMIN"))]
    Admin,
    #[serde(rename = "VENDEDORA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "VENDEDORA"))]
    Vendedora,
}

impl Role {
    pub const fn can_create_sale(&self) -> bool {
        matches!(self, Role::Admin | Role::Vendedora)
    }

    pub const fn can_create_entry(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub const fn can_cancel_transaction(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub const fn can_adjust_stock(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub const fn can_view_transactions(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub const fn can_view_stock(&self) -> bool {
        matches!(self, Role::Admin | Role::Vendedora)
    }
}

/// The authenticated user an operation is performed for.
///
/// Supplied by the boundary layer after authentication; the ledger trusts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Actor {
    pub id: String,
    /// Display name, frozen onto every transaction the actor creates.
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Actor {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

// =============================================================================
// Catalog Rows
// =============================================================================

/// A garment size (XS, M, 38, UNICA, ...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Size {
    pub id: String,
    /// Short code, unique (e.g. "M").
    pub name: String,
    pub display_name: String,
    /// Position in size pickers (XS before S before M).
    pub sort_order: i64,
}

/// A catalog product. Variants carry the size/color/stock dimension.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Base price in cents, used when a variant has no override.
    pub base_price_cents: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }
}

// =============================================================================
// Variant
// =============================================================================

/// One purchasable unit: product × size × color, with its own stock count.
///
/// ## Stock Mutation Paths
/// ```text
///                    ┌──────────────────────────────┐
///  create_sale ─────►│                              │
///  create_entry ────►│   variants.stock  (>= 0)     │
///  cancel ──────────►│                              │
///  adjust_stock ────►│                              │
///                    └──────────────────────────────┘
/// ```
/// Nothing else writes `stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Variant {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub product_id: String,

    pub size_id: String,

    /// Free-text color ("Azul marino").
    pub color: String,

    /// Units on hand. Never negative in a committed state.
    pub stock: i64,

    /// Price override in cents; `None` means the product's base price.
    pub price_override_cents: Option<i64>,

    /// Soft-delete flag. Inactive variants drop out of low-stock alerts.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Variant {
    /// Returns the price override as Money, if any.
    #[inline]
    pub fn price_override(&self) -> Option<Money> {
        self.price_override_cents.map(Money::from_cents)
    }

    /// Checks whether `quantity` units can be taken from stock.
    #[inline]
    pub fn can_fulfil(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Checks whether this variant should raise a low-stock alert.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.is_active && self.stock <= threshold
    }
}

// =============================================================================
// Transaction Type & Status
// =============================================================================

/// The business event a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum TransactionType {
    /// Goods leave the store; stock decreases, revenue is recorded.
    #[serde(rename = "VENTA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "VENTA"))]
    Sale,
    /// Goods are received; stock increases, total is zero.
    #[serde(rename = "ENTRADA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ENTRADA"))]
    Entry,
}

impl TransactionType {
    /// Stored/wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "VENTA",
            TransactionType::Entry => "ENTRADA",
        }
    }
}

/// Lifecycle of a transaction.
///
/// ```text
/// COMPLETADA ──cancel──► CANCELADA (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum TransactionStatus {
    #[serde(rename = "COMPLETADA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "COMPLETADA"))]
    Completed,
    #[serde(rename = "CANCELADA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "CANCELADA"))]
    Cancelled,
}

impl TransactionStatus {
    /// Stored/wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "COMPLETADA",
            TransactionStatus::Cancelled => "CANCELADA",
        }
    }

    /// Only a completed transaction may be cancelled.
    pub const fn can_cancel(&self) -> bool {
        matches!(self, TransactionStatus::Completed)
    }
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Completed
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// An immutable ledger record of one sale or entry.
///
/// Only `status` (and `updated_at` with it) ever changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,

    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub transaction_type: TransactionType,

    pub status: TransactionStatus,

    /// Acting user's identifier.
    pub user_id: String,

    /// Acting user's display name at time of the transaction (frozen).
    pub user_name: String,

    /// Sum of line subtotals in cents. Always zero for entries.
    pub total_cents: i64,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Line items, loaded separately from `transaction_items`.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<TransactionItem>,
}

impl Transaction {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status == TransactionStatus::Cancelled
    }
}

/// One line of a transaction.
///
/// Quantity and unit price are the values agreed at the time of the event and
/// are never recomputed from the current catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub variant_id: String,
    /// Units moved (always positive).
    pub quantity: i64,
    /// Sale price, or unit cost for entries.
    pub unit_price_cents: i64,
    /// quantity × unit price for sales; 0 for entries.
    pub subtotal_cents: i64,
}

impl TransactionItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Ledger Inputs
// =============================================================================

/// One requested line of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    pub variant_id: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl SaleLine {
    pub fn new(variant_id: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        SaleLine {
            variant_id: variant_id.into(),
            quantity,
            unit_price,
        }
    }
}

/// One requested line of an inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EntryLine {
    pub variant_id: String,
    pub quantity: i64,
    /// Purchase cost per unit; recorded as zero when omitted.
    #[serde(default)]
    pub unit_cost: Option<Money>,
}

impl EntryLine {
    pub fn new(variant_id: impl Into<String>, quantity: i64, unit_cost: Option<Money>) -> Self {
        EntryLine {
            variant_id: variant_id.into(),
            quantity,
            unit_cost,
        }
    }

    /// Unit cost with the zero default applied.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        self.unit_cost.unwrap_or_default()
    }
}

/// How an administrative adjustment changes stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockAdjustmentMode {
    /// `stock += quantity`
    Increase,
    /// `stock = max(0, stock - quantity)`
    Decrease,
    /// `stock = quantity`
    Set,
}

// =============================================================================
// Query Results
// =============================================================================

/// Current stock count of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockLevel {
    pub id: String,
    pub stock: i64,
}

/// A transaction item annotated with its parent transaction.
///
/// One entry of a variant's movement history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovement {
    pub item_id: String,
    pub transaction_id: String,
    pub variant_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub user_name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Signed effect the original event had on stock.
    pub fn stock_delta(&self) -> i64 {
        match self.transaction_type {
            TransactionType::Sale => -self.quantity,
            TransactionType::Entry => self.quantity,
        }
    }
}

/// Filters for listing transactions. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionFilter {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    /// Inclusive lower bound on creation time.
    #[ts(as = "Option<String>")]
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    #[ts(as = "Option<String>")]
    pub to: Option<DateTime<Utc>>,
    /// 1-based page number.
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageMeta {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl PageMeta {
    /// Builds metadata; `total_pages` is `ceil(total / limit)`.
    pub fn new(total: i64, page: u32, limit: u32) -> Self {
        let per_page = i64::from(limit.max(1));
        PageMeta {
            total,
            page,
            limit,
            total_pages: (total + per_page - 1) / per_page,
        }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
