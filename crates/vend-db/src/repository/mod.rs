//! # Repository Module
//!
//! Database repository implementations for Vend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Engine operation                                                       │
//! │       │                                                                 │
//! │       │  db.accounts().credit_deposit(id, 50)                           │
//! │       ▼                                                                 │
//! │  AccountRepository                                                      │
//! │  ├── get_by_username(&self, username)                                   │
//! │  ├── insert(&self, account)                                             │
//! │  ├── credit_deposit(&self, id, amount)                                  │
//! │  └── reset_deposit(&self, id)                                           │
//! │       │                                                                 │
//! │       │  SQL (prior-value arithmetic, guarded updates)                  │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transaction-Aware Helpers
//! The purchase settlement mutates one account row and one product row in a
//! single transaction. For that path each repository exposes `*_in`
//! associated functions taking a `&mut SqliteConnection`, so the engine can
//! compose them inside one `pool.begin()` scope.
//!
//! ## Available Repositories
//!
//! - [`account::AccountRepository`] - Account CRUD and deposit arithmetic
//! - [`product::ProductRepository`] - Product CRUD and stock arithmetic

pub mod account;
pub mod product;
