//! # Validation Module
//!
//! Input validation rules for Vend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: vend-engine (Rust)                                           │
//! │  ├── Typed request structs (deserialization)                           │
//! │  └── THIS MODULE: Business rule validation, fail-fast                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Guarded prior-value UPDATEs                                       │
//! │                                                                         │
//! │  Defense in depth: every rule is checked before any mutation, and      │
//! │  the schema enforces the same invariants once more.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vend_core::validation::{validate_coin, validate_cost};
//!
//! // Deposits accept the fixed denomination set only
//! validate_coin(50).unwrap();
//!
//! // Product cost must be a positive multiple of five
//! validate_cost(25).unwrap();
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::{DENOMINATIONS, MIN_USERNAME_LEN};

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that a value is a non-negative multiple of five.
///
/// ## Rules
/// - `value >= 0`, else "<field> must be non-negative number"
/// - `value % 5 == 0`, else "<field> must be multiple of 5"
///
/// ## Example
/// ```rust
/// use vend_core::validation::validate_multiple_of_five;
///
/// assert_eq!(validate_multiple_of_five(25, "cost").unwrap(), 25);
/// assert!(validate_multiple_of_five(-5, "cost").is_err());
/// assert!(validate_multiple_of_five(7, "cost").is_err());
/// ```
pub fn validate_multiple_of_five(value: i64, field: &str) -> ValidationResult<i64> {
    if value < 0 {
        return Err(ValidationError::not_non_negative(field));
    }

    if value % 5 != 0 {
        return Err(ValidationError::not_multiple_of_five(field));
    }

    Ok(value)
}

/// Validates a coin for the deposit operation.
///
/// ## Policy
/// Deposits accept the fixed discrete denomination set {5, 10, 20, 50, 100},
/// not arbitrary multiples of five. The two policies are deliberately kept
/// separate; the multiple-of-five rule applies to product cost only.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Deposit: insert coin                                                   │
/// │                                                                         │
/// │  Buyer submits amount: 20                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_coin(20) ← THIS FUNCTION                                     │
/// │       │                                                                 │
/// │       ├── amount < 0?         → "Amount can't be negative number"      │
/// │       │                                                                 │
/// │       ├── not a denomination? → "You can only deposit 5,10,20,50       │
/// │       │                          or 100"                               │
/// │       │                                                                 │
/// │       └── OK → credit the buyer's deposit                              │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_coin(value: i64) -> ValidationResult<i64> {
    if value < 0 {
        return Err(ValidationError::NegativeAmount);
    }

    if !DENOMINATIONS.contains(&value) {
        return Err(ValidationError::InvalidDenomination);
    }

    Ok(value)
}

/// Validates a product cost.
///
/// ## Rules
/// - Non-negative multiple of five (same messages as
///   [`validate_multiple_of_five`])
/// - Strictly positive: a zero-cost product would settle purchases for free
pub fn validate_cost(value: i64) -> ValidationResult<i64> {
    let value = validate_multiple_of_five(value, "cost")?;

    if value == 0 {
        return Err(ValidationError::MustBePositive {
            field: "cost".to_string(),
        });
    }

    Ok(value)
}

/// Validates a stock count (product `amount_available`).
///
/// Zero is allowed: a listing may be sold out.
pub fn validate_stock(value: i64) -> ValidationResult<i64> {
    if value < 0 {
        return Err(ValidationError::NegativeAmount);
    }

    Ok(value)
}

/// Validates the unit count of a buy request.
///
/// Zero is allowed and settles as a no-op purchase with zero spend.
pub fn validate_purchase_amount(value: i64) -> ValidationResult<i64> {
    if value < 0 {
        return Err(ValidationError::NegativeAmount);
    }

    Ok(value)
}

// =============================================================================
// Identity Validators
// =============================================================================

/// Validates a username at registration.
///
/// ## Rules
/// - At least 4 characters ("Username must be at least 4 chars long")
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
