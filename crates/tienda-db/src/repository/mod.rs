//! # Repository Module
//!
//! Database repository implementations for the Tienda ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  StockQueries / seed / tests           StockLedger (unit of work)       │
//! │       │                                     │                           │
//! │       │ db.variants().get_by_id(id)         │ VariantRepository::       │
//! │       │ (pooled connection)                 │   fetch_in_tx(&mut tx, id)│
//! │       ▼                                     ▼ (caller's transaction)    │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  VariantRepository   TransactionRepository   CatalogRepository  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods taking `&self` run on the pool. Associated functions ending in
//! `_in_tx` take a `&mut SqliteConnection` borrowed from an open
//! `sqlx::Transaction`, so every statement of a unit of work shares one
//! commit boundary.
//!
//! ## Available Repositories
//!
//! - [`VariantRepository`] - Variant rows and guarded stock updates
//! - [`TransactionRepository`] - Transactions, items and movement history
//! - [`CatalogRepository`] - Sizes and products

pub mod catalog;
pub mod transaction;
pub mod variant;

pub use catalog::CatalogRepository;
pub use transaction::TransactionRepository;
pub use variant::VariantRepository;
