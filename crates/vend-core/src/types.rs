//! # Domain Types
//!
//! Core domain types used throughout Vend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────┐      │
//! │  │    Account      │   │    Product      │   │ PurchaseReceipt  │      │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────  │      │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  total_spent     │      │
//! │  │  username       │   │  product_name   │   │  products        │      │
//! │  │  role           │   │  cost           │   │  amount          │      │
//! │  │  deposit        │   │  amount_avail.  │   │  change          │      │
//! │  │  credential     │   │  seller_id      │   └──────────────────┘      │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  Request structs (statically typed, validated before any mutation):    │
//! │  DepositRequest • BuyRequest • NewProduct • ProductUpdate              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Accounts and products both have:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: (username, product_name) - human-readable, unique

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Role
// =============================================================================

/// The role an account holds.
///
/// Roles are immutable after registration. Sellers manage product listings;
/// buyers deposit coins and spend them against products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Deposits coins and buys products.
    Buyer,
    /// Creates and manages product listings. Deposit stays 0 by convention.
    Seller,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Buyer => f.write_str("buyer"),
            Role::Seller => f.write_str("seller"),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            _ => Err(ValidationError::InvalidRole),
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// A registered account (buyer or seller).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    /// Unique identifier (UUID v4). Immutable after creation.
    pub id: String,

    /// Unique username, at least 4 characters. Immutable.
    pub username: String,

    /// Account role. Immutable.
    pub role: Role,

    /// Current coin balance in integer currency units. Never negative.
    /// Only the deposit operation and purchase settlement mutate it.
    pub deposit: i64,

    /// Opaque secret handle owned by the session authority.
    /// This core stores it verbatim and never interprets or mutates it.
    pub credential: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account may deposit coins and buy products.
    #[inline]
    pub fn is_buyer(&self) -> bool {
        self.role == Role::Buyer
    }

    /// Whether this account may manage product listings.
    #[inline]
    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product listed by a seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4). Immutable after creation.
    pub id: String,

    /// Unique product name - the business key buyers order by.
    pub product_name: String,

    /// Price per unit in integer coin units. Positive, multiple of 5 so
    /// change is always payable in accepted denominations.
    pub cost: i64,

    /// Stock count. Never negative.
    pub amount_available: i64,

    /// Owning seller's account id. Immutable; only this seller may
    /// update or delete the product.
    pub seller_id: String,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks whether the requested number of units is in stock.
    #[inline]
    pub fn has_stock(&self, amount: i64) -> bool {
        amount <= self.amount_available
    }
}

// =============================================================================
// Purchase Receipt
// =============================================================================

/// The result of a successful purchase settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Total coins spent (`amount * cost`).
    pub total_spent: i64,
    /// Names of the purchased products.
    pub products: Vec<String>,
    /// Units purchased.
    pub amount: i64,
    /// Buyer's remaining deposit after settlement.
    pub change: i64,
}

// =============================================================================
// Request Types
// =============================================================================
// Statically typed request structs. Each is validated via the validation
// module before any mutation is attempted.

/// Request to deposit a single coin into a buyer's account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Coin value; must be one of the accepted denominations.
    pub amount: i64,
}

/// Request to buy `amount` units of the product named `product_name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyRequest {
    /// Business key of the product to buy.
    pub product_name: String,
    /// Units requested; must be non-negative.
    pub amount: i64,
}

/// Request to list a new product. The seller is taken from the principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub cost: i64,
    pub amount_available: i64,
}

/// Request to update an existing product's price and stock.
/// The product name is the lookup key and stays fixed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub cost: i64,
    pub amount_available: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("buyer".parse::<Role>().unwrap(), Role::Buyer);
        assert_eq!("seller".parse::<Role>().unwrap(), Role::Seller);
        assert_eq!(Role::Buyer.to_string(), "buyer");
        assert_eq!(Role::Seller.to_string(), "seller");
    }

    #[test]
    fn test_role_rejects_unknown() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Incorrect role. Must be either buyer or seller."
        );
    }

    #[test]
    fn test_product_has_stock() {
        let product = Product {
            id: "p1".to_string(),
            product_name: "soda".to_string(),
            cost: 25,
            amount_available: 10,
            seller_id: "s1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(product.has_stock(10)); // exact depletion allowed
        assert!(!product.has_stock(11));
        assert!(product.has_stock(0));
    }
}
