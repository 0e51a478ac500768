//! # Error Types
//!
//! Domain-specific error types for tienda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tienda-core errors (this file)                                        │
//! │  ├── CoreError        - Ledger rule violations                         │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorCode        - Stable signal for the boundary layer           │
//! │                                                                         │
//! │  tienda-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── LedgerError      - What StockLedger / StockQueries return         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                          DbError ───┴→ LedgerError → ErrorCode         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (variant ID, transaction ID, ...)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to exactly one [`ErrorCode`]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Error Code
// =============================================================================

/// Machine-readable failure signal.
///
/// The boundary layer translates these into status codes without inspecting
/// message text.
///
/// | code                 | typical HTTP status |
/// |----------------------|---------------------|
/// | `NOT_FOUND`          | 404                 |
/// | `INSUFFICIENT_STOCK` | 400 / 409           |
/// | `INVALID_STATE`      | 400 / 409           |
/// | `CONFLICT`           | 409 (retryable)     |
/// | `VALIDATION_ERROR`   | 400                 |
/// | `DATABASE_ERROR`     | 500                 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A variant or transaction identifier does not resolve.
    NotFound,

    /// A sale line asks for more units than the variant holds.
    InsufficientStock,

    /// Illegal status transition or a reversal the ledger refuses.
    InvalidState,

    /// The unit of work lost a race with a concurrent writer. Retry the whole
    /// operation.
    Conflict,

    /// Malformed input, rejected before any store access.
    ValidationError,

    /// Any other storage failure.
    DatabaseError,
}

impl ErrorCode {
    /// Whether the caller may retry the whole logical operation unchanged.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::Conflict)
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Ledger rule violations.
///
/// Every variant is raised before the engine writes anything, or inside a
/// unit of work that is then rolled back, so none of them leave side effects.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Variant cannot be found.
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// Transaction cannot be found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Insufficient stock to complete a sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale line: variant V1, qty 8
    ///      │
    ///      ▼
    /// Check stock: available=7
    ///      │
    ///      ▼
    /// InsufficientStock { variant_id: "V1", available: 7, requested: 8 }
    ///      │
    ///      ▼
    /// Whole sale aborted, nothing written
    /// ```
    #[error("Insufficient stock for variant {variant_id}: available {available}, requested {requested}")]
    InsufficientStock {
        variant_id: String,
        available: i64,
        requested: i64,
    },

    /// Transaction is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Cancelling a transaction that is already CANCELADA
    #[error("Transaction {transaction_id} is {current_status}, cannot perform operation")]
    InvalidTransactionStatus {
        transaction_id: String,
        current_status: String,
    },

    /// Cancelling an entry would take a variant below zero.
    ///
    /// ## When This Occurs
    /// Goods received by an ENTRADA were sold before the entry is cancelled:
    /// ```text
    /// V1 stock 0 ── ENTRADA +5 ──► 5 ── VENTA -4 ──► 1
    ///                                             │
    ///                     cancel ENTRADA needs -5 ┘  → ReversalBlocked
    /// ```
    #[error("Cannot cancel transaction {transaction_id}: variant {variant_id} has {available} in stock, reversal needs {required}")]
    ReversalBlocked {
        transaction_id: String,
        variant_id: String,
        available: i64,
        required: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the stable error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::VariantNotFound(_) | CoreError::TransactionNotFound(_) => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::InvalidTransactionStatus { .. } | CoreError::ReversalBlocked { .. } => {
                ErrorCode::InvalidState
            }
            CoreError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any unit of work is opened.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, inverted date range).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            variant_id: "v-1".to_string(),
            available: 7,
            requested: 8,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for variant v-1: available 7, requested 8"
        );

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_codes_are_distinct_per_kind() {
        let cases = [
            (CoreError::VariantNotFound("v".into()), ErrorCode::NotFound),
            (CoreError::TransactionNotFound("t".into()), ErrorCode::NotFound),
            (
                CoreError::InsufficientStock {
                    variant_id: "v".into(),
                    available: 0,
                    requested: 1,
                },
                ErrorCode::InsufficientStock,
            ),
            (
                CoreError::InvalidTransactionStatus {
                    transaction_id: "t".into(),
                    current_status: "CANCELADA".into(),
                },
                ErrorCode::InvalidState,
            ),
            (
                CoreError::ReversalBlocked {
                    transaction_id: "t".into(),
                    variant_id: "v".into(),
                    available: 1,
                    required: 5,
                },
                ErrorCode::InvalidState,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(err.code(), code, "{err}");
        }
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "items".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_error_code_wire_names() {
        let json = serde_json::to_string(&ErrorCode::InsufficientStock).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_STOCK\"");
        assert!(ErrorCode::Conflict.is_retryable());
        assert!(!ErrorCode::NotFound.is_retryable());
    }
}
