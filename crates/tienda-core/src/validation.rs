//! # Validation Module
//!
//! Input validation for the stock ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Boundary layer (HTTP DTOs)                                   │
//! │  ├── Shape checks (required fields, types)                             │
//! │  └── Immediate client feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: StockLedger / StockQueries (Rust)                            │
//! │  └── THIS MODULE: re-asserted before any unit of work is opened        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tienda_core::validation::{validate_quantity, validate_threshold};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_threshold(-1).is_err());
//! ```

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{EntryLine, SaleLine};
use crate::{
    DEFAULT_PAGE_SIZE, MAX_LINE_QUANTITY, MAX_PAGE_SIZE, MAX_STOCK, MAX_UNIT_PRICE_CENTS,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text note accepted on a transaction.
pub const MAX_NOTES_LENGTH: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that an identifier was supplied.
///
/// Whether it resolves is decided by the store (`NOT_FOUND`), not here.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates optional transaction notes.
///
/// ## Returns
/// The trimmed notes, or `None` when absent or blank.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LENGTH,
        });
    }

    Ok(Some(notes.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - At most [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a sale unit price. Sales are never free.
///
/// ```rust
/// use tienda_core::money::Money;
/// use tienda_core::validation::validate_sale_price;
///
/// assert!(validate_sale_price(Money::from_cents(2000)).is_ok());
/// assert!(validate_sale_price(Money::zero()).is_err());
/// ```
pub fn validate_sale_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "unit_price".to_string(),
        });
    }

    check_price_ceiling("unit_price", price)
}

/// Validates an entry unit cost. Zero is allowed (donated or untracked cost).
pub fn validate_unit_cost(cost: Money) -> ValidationResult<()> {
    if cost.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit_cost".to_string(),
        });
    }

    check_price_ceiling("unit_cost", cost)
}

fn check_price_ceiling(field: &str, price: Money) -> ValidationResult<()> {
    if price.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates the quantity of an administrative adjustment (any mode).
pub fn validate_adjust_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_STOCK {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

/// Validates a stock count a write is about to produce.
///
/// ```rust
/// use tienda_core::validation::validate_stock_ceiling;
///
/// assert!(validate_stock_ceiling(Some(120)).is_ok());
/// assert!(validate_stock_ceiling(None).is_err());
/// ```
pub fn validate_stock_ceiling(stock: Option<i64>) -> ValidationResult<i64> {
    match stock {
        Some(stock) if stock <= MAX_STOCK => Ok(stock),
        _ => Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        }),
    }
}

/// Validates a low-stock threshold.
pub fn validate_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "threshold".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates every line of a sale request.
///
/// ## Rules
/// - At least one line
/// - Each line: variant id present, quantity > 0, unit price > 0
pub fn validate_sale_lines(lines: &[SaleLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for line in lines {
        validate_id("variant_id", &line.variant_id)?;
        validate_quantity(line.quantity)?;
        validate_sale_price(line.unit_price)?;
    }

    Ok(())
}

/// Validates every line of an entry request.
///
/// ## Rules
/// - At least one line
/// - Each line: variant id present, quantity > 0, unit cost >= 0 when given
pub fn validate_entry_lines(lines: &[EntryLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for line in lines {
        validate_id("variant_id", &line.variant_id)?;
        validate_quantity(line.quantity)?;
        validate_unit_cost(line.unit_cost())?;
    }

    Ok(())
}

// =============================================================================
// Listing Validators
// =============================================================================

/// Resolves and validates pagination input.
///
/// ## Returns
/// `(page, limit)` with defaults applied: page 1, limit [`DEFAULT_PAGE_SIZE`].
pub fn validate_pagination(page: Option<u32>, limit: Option<u32>) -> ValidationResult<(u32, u32)> {
    let page = page.unwrap_or(1);
    if page == 0 {
        return Err(ValidationError::MustBePositive {
            field: "page".to_string(),
        });
    }

    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: i64::from(MAX_PAGE_SIZE),
        });
    }

    Ok((page, limit))
}

/// Validates that a creation-time window is not inverted.
pub fn validate_date_range(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> ValidationResult<()> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ValidationError::InvalidFormat {
                field: "date range".to_string(),
                reason: "start must not be after end".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
