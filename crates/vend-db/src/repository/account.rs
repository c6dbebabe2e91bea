//! # Account Repository
//!
//! Database operations for accounts and their coin deposits.
//!
//! ## Deposit Arithmetic
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Deposit Update Strategy                              │
//! │                                                                         │
//! │  ❌ WRONG: absolute update (loses concurrent updates)                   │
//! │     read deposit=100 → compute 150 → UPDATE ... SET deposit = 150       │
//! │                                                                         │
//! │  ✅ CORRECT: prior-value update (race-free)                             │
//! │     UPDATE accounts SET deposit = deposit + 50                          │
//! │     UPDATE accounts SET deposit = deposit - 75 WHERE deposit >= 75      │
//! │                                                                         │
//! │  The guard on the debit reports via rows_affected() whether the         │
//! │  balance actually covered the charge at commit time, so a purchase      │
//! │  that lost a race is rejected instead of underflowing.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use vend_core::{Account, Role};

const ACCOUNT_COLUMNS: &str = "id, username, role, deposit, credential, created_at, updated_at";

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Gets an account by username (the business key).
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = ?1");

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Gets an account by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1");

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Creates a new account with a zero deposit.
    ///
    /// ## Returns
    /// * `Ok(Account)` - The created account
    /// * `Err(DbError::UniqueViolation)` - Username already exists
    pub async fn create(
        &self,
        username: &str,
        role: Role,
        credential: &str,
    ) -> DbResult<Account> {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role,
            deposit: 0,
            credential: credential.to_string(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %account.id, username = %account.username, role = %role, "Creating account");

        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, role, deposit, credential, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&account.id)
        .bind(&account.username)
        .bind(account.role)
        .bind(account.deposit)
        .bind(&account.credential)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(account)
    }

    /// Adds a (validated) coin to an account's deposit.
    ///
    /// The arithmetic is expressed against the prior value in a single
    /// UPDATE, so concurrent credits and debits against the same account
    /// cannot lose updates.
    pub async fn credit_deposit(&self, id: &str, amount: i64) -> DbResult<Account> {
        debug!(id = %id, amount = %amount, "Crediting deposit");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET deposit = deposit + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Account", id));
        }

        self.require_by_id(id).await
    }

    /// Sets an account's deposit back to zero unconditionally.
    ///
    /// Idempotent: resetting twice leaves the deposit at zero both times.
    pub async fn reset_deposit(&self, id: &str) -> DbResult<Account> {
        debug!(id = %id, "Resetting deposit");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET deposit = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Account", id));
        }

        self.require_by_id(id).await
    }

    /// Fetches an account that must exist (post-update reload).
    async fn require_by_id(&self, id: &str) -> DbResult<Account> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Account", id))
    }

    // =========================================================================
    // Transaction-Aware Helpers (purchase settlement)
    // =========================================================================

    /// Gets an account by ID inside an open transaction.
    pub async fn get_by_id_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1");

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(account)
    }

    /// Debits an account's deposit inside an open transaction, guarded so
    /// the balance can never underflow.
    ///
    /// ## Returns
    /// `true` if the debit applied; `false` if the guard rejected it
    /// (balance below `amount` at execution time). The caller decides
    /// whether to roll back.
    pub async fn debit_deposit_in(
        conn: &mut SqliteConnection,
        id: &str,
        amount: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, amount = %amount, "Debiting deposit");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET deposit = deposit - ?2, updated_at = ?3
            WHERE id = ?1 AND deposit >= ?2
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
