//! # Vending Machine Engine
//!
//! The deposit/buy/reset lifecycle.
//!
//! ## Purchase Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Purchase State Machine                              │
//! │                                                                         │
//! │  Validating ──► Reserving ──► Settling ──► Committed                    │
//! │      │              │             │                                     │
//! │      └──────────────┴─────────────┴────► Rejected                       │
//! │                                                                         │
//! │  Validating: role is buyer, amount non-negative (pure checks)           │
//! │  Reserving:  product exists, stock covers amount, deposit covers        │
//! │              total (reads inside the settlement transaction)            │
//! │  Settling:   guarded prior-value debit + stock decrement, one tx        │
//! │  Committed:  both mutations durable together → PurchaseReceipt          │
//! │  Rejected:   first failing gate wins, nothing was mutated               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conservation of Money
//! Within one settlement: `old_deposit - total_spent == change` and
//! `old_stock - amount == new_stock`. Both updates are phrased against the
//! prior value with a covering guard, so a purchase that lost a race against
//! a concurrent settlement is rejected instead of overselling or
//! overdrawing, whatever was read during validation.

use tracing::{debug, info};

use vend_core::validation::{validate_coin, validate_purchase_amount};
use vend_core::{Account, BuyRequest, DepositRequest, PurchaseReceipt, Role, ValidationError};
use vend_db::{AccountRepository, Database, ProductRepository};

use crate::auth::Principal;
use crate::error::{EngineError, EngineResult};

/// The vending machine engine.
///
/// Constructed with an explicitly injected [`Database`]; there is no
/// process-wide storage singleton. Cloning is cheap (shared pool) so one
/// engine can serve many concurrent request handlers.
#[derive(Debug, Clone)]
pub struct VendingMachine {
    db: Database,
}

impl VendingMachine {
    /// Creates an engine on top of an already-initialized database.
    pub fn new(db: Database) -> Self {
        VendingMachine { db }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Deposit / Reset
    // =========================================================================

    /// Deposits a single coin into the buyer's account.
    ///
    /// ## Preconditions (first failure wins)
    /// 1. Principal must be a buyer
    /// 2. Amount must be an accepted denomination
    ///
    /// The credit itself is a single prior-value UPDATE, so concurrent
    /// deposits and purchases against the same account cannot lose updates.
    pub async fn deposit(
        &self,
        principal: &Principal,
        request: DepositRequest,
    ) -> EngineResult<Account> {
        if principal.role != Role::Buyer {
            return Err(EngineError::buyer_only());
        }

        let amount = validate_coin(request.amount)?;

        let account = self
            .db
            .accounts()
            .credit_deposit(&principal.account_id, amount)
            .await?;

        info!(
            account = %principal.username,
            amount = %amount,
            deposit = %account.deposit,
            "Coin deposited"
        );

        Ok(account)
    }

    /// Resets the principal's deposit to zero unconditionally.
    ///
    /// Available to any authenticated principal, and idempotent: resetting
    /// twice yields a zero deposit both times.
    pub async fn reset(&self, principal: &Principal) -> EngineResult<Account> {
        let account = self
            .db
            .accounts()
            .reset_deposit(&principal.account_id)
            .await?;

        info!(account = %principal.username, "Deposit reset");

        Ok(account)
    }

    // =========================================================================
    // Buy
    // =========================================================================

    /// Buys `request.amount` units of the product named
    /// `request.product_name`.
    ///
    /// ## Preconditions (checked in order, first failure wins)
    /// 1. Principal must be a buyer → `Forbidden`
    /// 2. Amount must be non-negative → `InvalidValue`
    /// 3. Product must exist → `NotFound`
    /// 4. Stock must cover the amount → `InsufficientStock`
    /// 5. Deposit must cover `amount * cost` → `InsufficientFunds`
    ///
    /// ## Settlement
    /// Deposit debit and stock decrement are applied inside one transaction:
    /// either both become durably visible together or neither takes effect.
    /// A transient storage failure surfaces as `Unavailable` and the whole
    /// purchase may be retried.
    pub async fn buy(
        &self,
        principal: &Principal,
        request: &BuyRequest,
    ) -> EngineResult<PurchaseReceipt> {
        // --- Validating ------------------------------------------------------
        if principal.role != Role::Buyer {
            return Err(EngineError::buyer_only());
        }

        let amount = validate_purchase_amount(request.amount)?;

        debug!(
            buyer = %principal.username,
            product = %request.product_name,
            amount = %amount,
            "Purchase validating"
        );

        // --- Reserving -------------------------------------------------------
        // All reads happen inside the settlement transaction so the receipt
        // arithmetic and the guarded writes see one consistent snapshot.
        let mut tx = self.db.pool().begin().await?;

        let product = ProductRepository::get_by_name_in(&mut *tx, &request.product_name)
            .await?
            .ok_or_else(EngineError::no_such_product)?;

        if !product.has_stock(amount) {
            return Err(EngineError::InsufficientStock);
        }

        let account = AccountRepository::get_by_id_in(&mut *tx, &principal.account_id)
            .await?
            .ok_or_else(EngineError::no_such_user)?;

        let total_spent = amount
            .checked_mul(product.cost)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "amount".to_string(),
            })?;

        if total_spent > account.deposit {
            return Err(EngineError::InsufficientFunds);
        }

        // --- Settling --------------------------------------------------------
        let debited =
            AccountRepository::debit_deposit_in(&mut *tx, &account.id, total_spent).await?;
        if !debited {
            // Lost a race against a concurrent settlement on this account
            tx.rollback().await?;
            return Err(EngineError::InsufficientFunds);
        }

        let decremented =
            ProductRepository::decrement_stock_in(&mut *tx, &product.id, amount).await?;
        if !decremented {
            tx.rollback().await?;
            return Err(EngineError::InsufficientStock);
        }

        tx.commit().await?;

        // --- Committed -------------------------------------------------------
        let change = account.deposit - total_spent;

        info!(
            buyer = %principal.username,
            product = %product.product_name,
            amount = %amount,
            total_spent = %total_spent,
            change = %change,
            "Purchase committed"
        );

        Ok(PurchaseReceipt {
            total_spent,
            products: vec![product.product_name],
            amount,
            change,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vend_db::DbConfig;

    async fn test_machine() -> VendingMachine {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        VendingMachine::new(db)
    }

    async fn register_buyer(machine: &VendingMachine, username: &str) -> Principal {
        let account = machine
            .database()
            .accounts()
            .create(username, Role::Buyer, "secret")
            .await
            .unwrap();
        Principal::from_account(&account)
    }

    async fn register_seller(machine: &VendingMachine, username: &str) -> Principal {
        let account = machine
            .database()
            .accounts()
            .create(username, Role::Seller, "secret")
            .await
            .unwrap();
        Principal::from_account(&account)
    }

    async fn list_product(
        machine: &VendingMachine,
        seller: &Principal,
        name: &str,
        cost: i64,
        stock: i64,
    ) {
        machine
            .database()
            .products()
            .insert(name, cost, stock, &seller.account_id)
            .await
            .unwrap();
    }

    fn buy_request(name: &str, amount: i64) -> BuyRequest {
        BuyRequest {
            product_name: name.to_string(),
            amount,
        }
    }

    // -------------------------------------------------------------------------
    // Deposit / Reset
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_deposit_accumulates() {
        let machine = test_machine().await;
        let buyer = register_buyer(&machine, "buyer1").await;

        let mut expected = 0;
        for coin in [5, 10, 20, 50, 100] {
            expected += coin;
            let account = machine
                .deposit(&buyer, DepositRequest { amount: coin })
                .await
                .unwrap();
            assert_eq!(account.deposit, expected);
        }
    }

    #[tokio::test]
    async fn test_deposit_rejects_bad_coins() {
        let machine = test_machine().await;
        let buyer = register_buyer(&machine, "buyer1").await;

        let err = machine
            .deposit(&buyer, DepositRequest { amount: -5 })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Amount can't be negative number");

        let err = machine
            .deposit(&buyer, DepositRequest { amount: 25 })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You can only deposit 5,10,20,50 or 100");

        // Nothing was credited
        let account = machine
            .database()
            .accounts()
            .get_by_id(&buyer.account_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.deposit, 0);
    }

    #[tokio::test]
    async fn test_seller_cannot_deposit_or_buy() {
        let machine = test_machine().await;
        let seller = register_seller(&machine, "seller1").await;
        list_product(&machine, &seller, "soda", 25, 10).await;

        let err = machine
            .deposit(&seller, DepositRequest { amount: 5 })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
        assert_eq!(
            err.to_string(),
            "You must be a buyer in order to buy things and deposit coins"
        );

        let err = machine
            .buy(&seller, &buy_request("soda", 1))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "You must be a buyer in order to buy things and deposit coins"
        );
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let machine = test_machine().await;
        let buyer = register_buyer(&machine, "buyer1").await;

        machine
            .deposit(&buyer, DepositRequest { amount: 100 })
            .await
            .unwrap();

        let account = machine.reset(&buyer).await.unwrap();
        assert_eq!(account.deposit, 0);

        let account = machine.reset(&buyer).await.unwrap();
        assert_eq!(account.deposit, 0);
    }

    #[tokio::test]
    async fn test_reset_allowed_for_sellers() {
        // Reset is deliberately not buyer-only
        let machine = test_machine().await;
        let seller = register_seller(&machine, "seller1").await;

        let account = machine.reset(&seller).await.unwrap();
        assert_eq!(account.deposit, 0);
    }

    // -------------------------------------------------------------------------
    // Buy
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_buy_scenario_soda() {
        // Product {soda, cost 25, stock 10}, deposit 100, buy 3
        // → spent 75, change 25, new stock 7
        let machine = test_machine().await;
        let seller = register_seller(&machine, "seller1").await;
        let buyer = register_buyer(&machine, "buyer1").await;
        list_product(&machine, &seller, "soda", 25, 10).await;

        machine
            .deposit(&buyer, DepositRequest { amount: 100 })
            .await
            .unwrap();

        let receipt = machine.buy(&buyer, &buy_request("soda", 3)).await.unwrap();

        assert_eq!(receipt.total_spent, 75);
        assert_eq!(receipt.products, vec!["soda".to_string()]);
        assert_eq!(receipt.amount, 3);
        assert_eq!(receipt.change, 25);

        let soda = machine
            .database()
            .products()
            .get_by_name("soda")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(soda.amount_available, 7);

        let account = machine
            .database()
            .accounts()
            .get_by_id(&buyer.account_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.deposit, 25);
    }

    #[tokio::test]
    async fn test_buy_missing_product() {
        let machine = test_machine().await;
        let buyer = register_buyer(&machine, "buyer1").await;

        let err = machine
            .buy(&buyer, &buy_request("ghost", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
        assert_eq!(err.to_string(), "No such product");
    }

    #[tokio::test]
    async fn test_buy_negative_amount() {
        let machine = test_machine().await;
        let seller = register_seller(&machine, "seller1").await;
        let buyer = register_buyer(&machine, "buyer1").await;
        list_product(&machine, &seller, "soda", 25, 10).await;

        let err = machine
            .buy(&buyer, &buy_request("soda", -1))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidValue(_)));
    }

    #[tokio::test]
    async fn test_buy_stock_boundaries() {
        let machine = test_machine().await;
        let seller = register_seller(&machine, "seller1").await;
        let buyer = register_buyer(&machine, "buyer1").await;
        list_product(&machine, &seller, "gum", 5, 4).await;

        machine
            .deposit(&buyer, DepositRequest { amount: 100 })
            .await
            .unwrap();

        // One more than stock fails
        let err = machine
            .buy(&buyer, &buy_request("gum", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientStock));
        assert_eq!(
            err.to_string(),
            "There is not enough units of this product."
        );

        // Exact depletion to zero succeeds
        let receipt = machine.buy(&buyer, &buy_request("gum", 4)).await.unwrap();
        assert_eq!(receipt.total_spent, 20);

        let gum = machine
            .database()
            .products()
            .get_by_name("gum")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(gum.amount_available, 0);
    }

    #[tokio::test]
    async fn test_buy_funds_boundaries() {
        let machine = test_machine().await;
        let seller = register_seller(&machine, "seller1").await;
        let buyer = register_buyer(&machine, "buyer1").await;
        list_product(&machine, &seller, "soda", 25, 100).await;

        // Deposit exactly 50: buying 3 (cost 75) must fail, buying 2 (cost 50)
        // must succeed with change 0
        machine
            .deposit(&buyer, DepositRequest { amount: 50 })
            .await
            .unwrap();

        let err = machine
            .buy(&buyer, &buy_request("soda", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientFunds));
        assert_eq!(
            err.to_string(),
            "You don't have enough coins to for this order."
        );

        let receipt = machine.buy(&buyer, &buy_request("soda", 2)).await.unwrap();
        assert_eq!(receipt.total_spent, 50);
        assert_eq!(receipt.change, 0);
    }

    #[tokio::test]
    async fn test_buy_zero_units_is_a_noop_purchase() {
        let machine = test_machine().await;
        let seller = register_seller(&machine, "seller1").await;
        let buyer = register_buyer(&machine, "buyer1").await;
        list_product(&machine, &seller, "soda", 25, 10).await;

        let receipt = machine.buy(&buyer, &buy_request("soda", 0)).await.unwrap();
        assert_eq!(receipt.total_spent, 0);
        assert_eq!(receipt.amount, 0);
        assert_eq!(receipt.change, 0);

        let soda = machine
            .database()
            .products()
            .get_by_name("soda")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(soda.amount_available, 10);
    }

    #[tokio::test]
    async fn test_buy_conserves_money_and_stock() {
        let machine = test_machine().await;
        let seller = register_seller(&machine, "seller1").await;
        let buyer = register_buyer(&machine, "buyer1").await;
        list_product(&machine, &seller, "chips", 20, 12).await;

        for coin in [100, 100, 50] {
            machine
                .deposit(&buyer, DepositRequest { amount: coin })
                .await
                .unwrap();
        }

        for amount in [1, 2, 3] {
            let before_account = machine
                .database()
                .accounts()
                .get_by_id(&buyer.account_id)
                .await
                .unwrap()
                .unwrap();
            let before_product = machine
                .database()
                .products()
                .get_by_name("chips")
                .await
                .unwrap()
                .unwrap();

            let receipt = machine
                .buy(&buyer, &buy_request("chips", amount))
                .await
                .unwrap();

            let after_account = machine
                .database()
                .accounts()
                .get_by_id(&buyer.account_id)
                .await
                .unwrap()
                .unwrap();
            let after_product = machine
                .database()
                .products()
                .get_by_name("chips")
                .await
                .unwrap()
                .unwrap();

            assert_eq!(
                after_product.amount_available + amount,
                before_product.amount_available
            );
            assert_eq!(
                before_account.deposit - receipt.total_spent,
                receipt.change
            );
            assert_eq!(after_account.deposit, receipt.change);
            assert!(receipt.change >= 0);
        }
    }

    // -------------------------------------------------------------------------
    // Concurrency
    // -------------------------------------------------------------------------

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_purchases_never_oversell() {
        let machine = Arc::new(test_machine().await);
        let seller = register_seller(&machine, "seller1").await;
        let buyer = register_buyer(&machine, "buyer1").await;

        // Stock 5, 8 concurrent single-unit purchases, funds never binding
        list_product(&machine, &seller, "water", 5, 5).await;
        machine
            .deposit(&buyer, DepositRequest { amount: 50 })
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let machine = Arc::clone(&machine);
            let buyer = buyer.clone();
            handles.push(tokio::spawn(async move {
                machine.buy(&buyer, &buy_request("water", 1)).await
            }));
        }

        let mut successes = 0;
        let mut stock_rejections = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(receipt) => {
                    assert_eq!(receipt.total_spent, 5);
                    successes += 1;
                }
                Err(EngineError::InsufficientStock) => stock_rejections += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 5);
        assert_eq!(stock_rejections, 3);

        let water = machine
            .database()
            .products()
            .get_by_name("water")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(water.amount_available, 0);

        // 5 units at cost 5 spent from a 50 coin deposit
        let account = machine
            .database()
            .accounts()
            .get_by_id(&buyer.account_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.deposit, 25);
    }
}
