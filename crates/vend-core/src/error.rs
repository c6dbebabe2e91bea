//! # Error Types
//!
//! Domain-specific error types for vend-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vend-core errors (this file)                                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vend-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  vend-engine errors (separate crate)                                   │
//! │  └── EngineError      - Full taxonomy the caller sees                  │
//! │                                                                         │
//! │  Flow: ValidationError → EngineError ← DbError                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never String
//! 3. Each variant's display string is the exact user-facing message

use thiserror::Error;

/// Input validation errors.
///
/// These errors occur when user input doesn't meet business rules.
/// They are raised before any state mutation is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Numeric field was negative where a non-negative value is required.
    #[error("{field} must be non-negative number")]
    NotNonNegative { field: String },

    /// Numeric field was not a multiple of five.
    #[error("{field} must be multiple of 5")]
    NotMultipleOfFive { field: String },

    /// Numeric field must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of representable range (e.g. an order total
    /// that overflows).
    #[error("{field} is out of range")]
    OutOfRange { field: String },

    /// A deposit or purchase amount was negative.
    #[error("Amount can't be negative number")]
    NegativeAmount,

    /// A deposit used a coin outside the accepted denomination set.
    #[error("You can only deposit 5,10,20,50 or 100")]
    InvalidDenomination,

    /// Username shorter than the minimum length.
    #[error("Username must be at least 4 chars long")]
    UsernameTooShort,

    /// Role string was neither "buyer" nor "seller".
    #[error("Incorrect role. Must be either buyer or seller.")]
    InvalidRole,
}

impl ValidationError {
    /// Creates a NotNonNegative error for a named field.
    pub fn not_non_negative(field: impl Into<String>) -> Self {
        ValidationError::NotNonNegative {
            field: field.into(),
        }
    }

    /// Creates a NotMultipleOfFive error for a named field.
    pub fn not_multiple_of_five(field: impl Into<String>) -> Self {
        ValidationError::NotMultipleOfFive {
            field: field.into(),
        }
    }
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
