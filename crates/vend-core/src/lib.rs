//! # vend-core: Pure Business Logic for Vend
//!
//! This crate is the **heart** of the vending machine. It contains all
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Vend Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Transport layer (HTTP, RPC, ...)                │   │
//! │  │                        (out of scope)                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                       vend-engine                                │   │
//! │  │        Deposit / Buy / Reset settlement, catalog ops             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ★ vend-core (THIS CRATE) ★                       │   │
//! │  │                                                                  │   │
//! │  │   ┌───────────┐     ┌────────────┐     ┌───────────┐            │   │
//! │  │   │   types   │     │ validation │     │   error   │            │   │
//! │  │   │  Account  │     │   coins    │     │ rules as  │            │   │
//! │  │   │  Product  │     │  cost %5   │     │  values   │            │   │
//! │  │   └───────────┘     └────────────┘     └───────────┘            │   │
//! │  │                                                                  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────┬────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vend-db (Database Layer)                      │   │
//! │  │             SQLite queries, migrations, repositories             │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Account, Product, PurchaseReceipt, requests)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Deposits and costs are integer coin units (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Coin denominations accepted by the deposit operation.
///
/// ## Policy
/// Deposits are restricted to this fixed discrete set (not "any multiple of
/// five"). The multiple-of-five rule applies to product cost only, so that
/// change is always payable in these coins.
pub const DENOMINATIONS: [i64; 5] = [5, 10, 20, 50, 100];

/// Minimum username length accepted at registration.
pub const MIN_USERNAME_LEN: usize = 4;
