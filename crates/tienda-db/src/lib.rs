//! # tienda-db: Database Layer and Stock Ledger
//!
//! SQLite storage for the Tienda inventory, plus the two services built on it:
//! the [`StockLedger`] engine (the only writer of stock) and the read-only
//! [`StockQueries`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda Data Flow                                 │
//! │                                                                         │
//! │  Boundary layer (authenticated Actor, role already checked)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tienda-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  StockLedger  │    │ StockQueries  │    │  Migrations  │  │   │
//! │  │   │  (ledger.rs)  │    │ (queries.rs)  │    │  (embedded)  │  │   │
//! │  │   └───────┬───────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │           ▼                    ▼                               │   │
//! │  │   ┌───────────────────────────────────────┐  ┌──────────────┐ │   │
//! │  │   │ VariantRepo  TransactionRepo  Catalog │  │   Database   │ │   │
//! │  │   └───────────────────────────────────────┘  │  (pool.rs)   │ │   │
//! │  │                                              └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL) : sizes, products, variants, transactions, items          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Environment configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and ledger error types
//! - [`repository`] - Repository implementations (variant, transaction, catalog)
//! - [`ledger`] - Sale, entry, cancellation, adjustment
//! - [`queries`] - Stock level, low stock, history, transaction listing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tienda_core::{Actor, Money, Role, SaleLine};
//! use tienda_db::{Database, StockConfig};
//!
//! let config = StockConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let actor = Actor::new(user_id, "Lucía", Role::Vendedora);
//! let sale = db
//!     .ledger()
//!     .create_sale(&actor, &[SaleLine::new(variant_id, 3, Money::from_cents(2000))], None)
//!     .await?;
//!
//! let low = db.stock().with_low_stock_threshold(config.low_stock_threshold).low_stock(None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, StockConfig};
pub use error::{DbError, DbResult, LedgerError, LedgerResult};
pub use ledger::StockLedger;
pub use pool::{Database, DbConfig};
pub use queries::StockQueries;

// Repository re-exports for convenience
pub use repository::{CatalogRepository, TransactionRepository, VariantRepository};
