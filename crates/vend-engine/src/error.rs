//! # Engine Error Types
//!
//! The full error taxonomy exposed to the transport layer.
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvalidValue       bad input, user-correctable (4xx-equivalent)        │
//! │  Forbidden          role/ownership mismatch                             │
//! │  NotFound           missing account/product                             │
//! │  Conflict           duplicate username/product name                     │
//! │  InsufficientStock  not enough units to cover the order                 │
//! │  InsufficientFunds  not enough coins to cover the order                 │
//! │  Auth               bad/expired credential                              │
//! │  Unavailable        storage transient failure, retryable by caller      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure carries a stable kind (the variant) plus a human-readable
//! detail string. All business-rule failures are raised before any mutation
//! is attempted; `Unavailable` never leaves partial state behind because the
//! settlement runs in a single transaction.

use thiserror::Error;

use vend_core::ValidationError;
use vend_db::DbError;

use crate::auth::AuthError;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Bad input value; the detail string names the offending rule.
    #[error(transparent)]
    InvalidValue(#[from] ValidationError),

    /// The principal's role or ownership doesn't permit the operation.
    #[error("{0}")]
    Forbidden(String),

    /// The named account or product doesn't exist.
    #[error("{0}")]
    NotFound(String),

    /// A unique business key (username, product name) is already taken.
    #[error("{0}")]
    Conflict(String),

    /// The order asks for more units than are available.
    #[error("There is not enough units of this product.")]
    InsufficientStock,

    /// The buyer's deposit doesn't cover the order total.
    #[error("You don't have enough coins to for this order.")]
    InsufficientFunds,

    /// Credential could not be resolved to a principal.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Transient storage failure. The whole operation may be retried
    /// idempotently as long as no success was observed.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl EngineError {
    /// Forbidden: a non-buyer tried to deposit or buy.
    pub(crate) fn buyer_only() -> Self {
        EngineError::Forbidden(
            "You must be a buyer in order to buy things and deposit coins".to_string(),
        )
    }

    /// Forbidden: a non-seller tried to create a product.
    pub(crate) fn seller_only() -> Self {
        EngineError::Forbidden("You need to be a seller to create products".to_string())
    }

    /// Forbidden: the principal doesn't own the product it tried to mutate.
    pub(crate) fn not_owner() -> Self {
        EngineError::Forbidden("You are not authorized to perform this operation".to_string())
    }

    /// NotFound: no product with the requested name.
    pub(crate) fn no_such_product() -> Self {
        EngineError::NotFound("No such product".to_string())
    }

    /// NotFound: no account with the requested username/id.
    pub(crate) fn no_such_user() -> Self {
        EngineError::NotFound("No such user".to_string())
    }

    /// Conflict: the username is already registered.
    pub(crate) fn user_exists() -> Self {
        EngineError::Conflict("User already exists".to_string())
    }

    /// Conflict: a product with the same name already exists.
    pub(crate) fn product_exists() -> Self {
        EngineError::Conflict("There is a product with the same name.".to_string())
    }

    /// Whether the caller may retry the whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Unavailable(_))
    }
}

/// Convert database errors to engine errors.
///
/// Engine operations pre-check business rules for exact messages; this
/// mapping is the backstop for races and transient failures.
impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => EngineError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => EngineError::Conflict(err.to_string()),
            DbError::PoolExhausted | DbError::ConnectionFailed(_) => {
                EngineError::Unavailable(err.to_string())
            }
            other => EngineError::Unavailable(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        DbError::from(err).into()
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_detail_strings() {
        assert_eq!(
            EngineError::buyer_only().to_string(),
            "You must be a buyer in order to buy things and deposit coins"
        );
        assert_eq!(
            EngineError::InsufficientStock.to_string(),
            "There is not enough units of this product."
        );
        assert_eq!(
            EngineError::InsufficientFunds.to_string(),
            "You don't have enough coins to for this order."
        );
        assert_eq!(EngineError::no_such_product().to_string(), "No such product");
    }

    #[test]
    fn test_retryable() {
        assert!(EngineError::from(DbError::PoolExhausted).is_retryable());
        assert!(!EngineError::InsufficientFunds.is_retryable());
        assert!(!EngineError::no_such_user().is_retryable());
    }
}
