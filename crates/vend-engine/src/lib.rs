//! # vend-engine: Purchase Engine for Vend
//!
//! Orchestrates the vending machine's deposit/buy/reset lifecycle and the
//! seller-owned product catalog on top of [`vend_core`] (pure rules) and
//! [`vend_db`] (SQLite storage).
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  inbound request                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionAuthority::resolve_principal(token)   ← external collaborator   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  VendingMachine::{deposit, buy, reset, create_product, ...}             │
//! │       │                                                                 │
//! │       ├── vend-core validation (fail-fast, before any mutation)         │
//! │       │                                                                 │
//! │       └── vend-db repositories (guarded prior-value updates,            │
//! │            settlement in one transaction)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  result or EngineError (stable kind + verbatim detail string)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vend_db::{Database, DbConfig};
//! use vend_engine::{Principal, VendingMachine};
//! use vend_core::{BuyRequest, DepositRequest, Role};
//!
//! let db = Database::new(DbConfig::new("./vend.db")).await?;
//! let machine = VendingMachine::new(db);
//!
//! let account = machine.register("neo42", Role::Buyer, credential).await?;
//! let principal = Principal::from_account(&account);
//!
//! machine.deposit(&principal, DepositRequest { amount: 100 }).await?;
//! let receipt = machine
//!     .buy(&principal, &BuyRequest { product_name: "soda".into(), amount: 3 })
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod catalog;
pub mod error;
pub mod machine;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::{AuthError, Principal, SessionAuthority};
pub use catalog::can_mutate;
pub use error::{EngineError, EngineResult};
pub use machine::VendingMachine;

// =============================================================================
// Unit Tests
// =============================================================================
