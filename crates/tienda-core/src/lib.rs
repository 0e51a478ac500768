//! # tienda-core: Pure Business Logic for the Tienda stock ledger
//!
//! This crate holds everything about the ledger that can be decided without
//! touching storage: money arithmetic, the shape of variants and
//! transactions, input validation and the stock adjustment rules.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Boundary layer (HTTP + auth, external)             │   │
//! │  │    POST /transactions/sale  POST /stock/adjust  GET /stock/low  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ authenticated Actor                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tienda-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   stock   │  │ validation│  │   │
//! │  │   │  Variant  │  │   Money   │  │ Adjust    │  │   rules   │  │   │
//! │  │   │Transaction│  │  totals   │  │ demand    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tienda-db (Database Layer)                   │   │
//! │  │        SQLite, repositories, StockLedger, StockQueries          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Variant, Transaction, TransactionItem, Actor, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types and stable error codes
//! - [`validation`] - Input validation re-asserted by the engine
//! - [`stock`] - Pure stock arithmetic (adjustments, demand, reversals)
//!
//! ## Example Usage
//!
//! ```rust
//! use tienda_core::money::Money;
//!
//! // Three shirts at 20.00 each
//! let subtotal = Money::from_cents(2000).multiply_quantity(3);
//! assert_eq!(subtotal.cents(), 6000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorCode, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level at or below which an active variant is reported as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Page size used by transaction listings when the caller gives none.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a transaction listing will return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Largest quantity a single sale or entry line may carry.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Largest unit price or unit cost a line may carry, in cents.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;

/// Ceiling on a variant's stock count. Entries and adjustments that would
/// push stock above it are rejected.
pub const MAX_STOCK: i64 = 1_000_000_000;
