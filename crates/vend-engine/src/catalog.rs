//! # Catalog & Account Operations
//!
//! Registration, account lookup, and the seller-owned product catalog.
//!
//! ## Ownership Rule
//! A product may only be mutated by the seller that listed it. The rule
//! lives in a single predicate, [`can_mutate`], shared by the update and
//! delete paths so it cannot drift between them.

use tracing::info;

use vend_core::validation::{validate_cost, validate_stock, validate_username};
use vend_core::{Account, NewProduct, Product, ProductUpdate, Role};
use vend_db::DbError;

use crate::auth::Principal;
use crate::error::{EngineError, EngineResult};
use crate::machine::VendingMachine;

/// Whether `principal` is allowed to update or delete `product`.
///
/// Ownership is an id equality check against the listing seller; roles
/// don't matter here (a seller cannot touch another seller's product).
pub fn can_mutate(principal: &Principal, product: &Product) -> bool {
    principal.account_id == product.seller_id
}

impl VendingMachine {
    // =========================================================================
    // Accounts
    // =========================================================================

    /// Registers a new account with a zero deposit.
    ///
    /// The credential is an opaque handle produced by the session authority
    /// (e.g. a password hash); this core stores it verbatim.
    pub async fn register(
        &self,
        username: &str,
        role: Role,
        credential: &str,
    ) -> EngineResult<Account> {
        validate_username(username)?;

        if self
            .database()
            .accounts()
            .get_by_username(username)
            .await?
            .is_some()
        {
            return Err(EngineError::user_exists());
        }

        // The unique index backstops the pre-check under races
        let account = match self
            .database()
            .accounts()
            .create(username, role, credential)
            .await
        {
            Err(DbError::UniqueViolation { .. }) => return Err(EngineError::user_exists()),
            other => other?,
        };

        info!(username = %account.username, role = %account.role, "Account registered");

        Ok(account)
    }

    /// Gets an account by username.
    pub async fn get_account(&self, username: &str) -> EngineResult<Account> {
        self.database()
            .accounts()
            .get_by_username(username)
            .await?
            .ok_or_else(EngineError::no_such_user)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Lists the whole catalog.
    pub async fn list_products(&self) -> EngineResult<Vec<Product>> {
        Ok(self.database().products().list().await?)
    }

    /// Gets a product by name.
    pub async fn get_product(&self, name: &str) -> EngineResult<Product> {
        self.database()
            .products()
            .get_by_name(name)
            .await?
            .ok_or_else(EngineError::no_such_product)
    }

    /// Lists a new product owned by the calling seller.
    ///
    /// ## Preconditions (first failure wins)
    /// 1. Principal must be a seller → `Forbidden`
    /// 2. Cost must be a positive multiple of five → `InvalidValue`
    /// 3. Stock must be non-negative → `InvalidValue`
    /// 4. Product name must be free → `Conflict`
    pub async fn create_product(
        &self,
        principal: &Principal,
        request: &NewProduct,
    ) -> EngineResult<Product> {
        if principal.role != Role::Seller {
            return Err(EngineError::seller_only());
        }

        let cost = validate_cost(request.cost)?;
        let stock = validate_stock(request.amount_available)?;

        if self
            .database()
            .products()
            .get_by_name(&request.product_name)
            .await?
            .is_some()
        {
            return Err(EngineError::product_exists());
        }

        let product = match self
            .database()
            .products()
            .insert(&request.product_name, cost, stock, &principal.account_id)
            .await
        {
            Err(DbError::UniqueViolation { .. }) => return Err(EngineError::product_exists()),
            other => other?,
        };

        info!(
            seller = %principal.username,
            product = %product.product_name,
            cost = %product.cost,
            stock = %product.amount_available,
            "Product listed"
        );

        Ok(product)
    }

    /// Updates a product's cost and stock. Owner only.
    pub async fn update_product(
        &self,
        principal: &Principal,
        name: &str,
        update: ProductUpdate,
    ) -> EngineResult<Product> {
        let product = self.get_product(name).await?;

        if !can_mutate(principal, &product) {
            return Err(EngineError::not_owner());
        }

        let cost = validate_cost(update.cost)?;
        let stock = validate_stock(update.amount_available)?;

        self.database()
            .products()
            .update(&product.id, cost, stock)
            .await?;

        info!(
            seller = %principal.username,
            product = %product.product_name,
            cost = %cost,
            stock = %stock,
            "Product updated"
        );

        Ok(Product {
            cost,
            amount_available: stock,
            ..product
        })
    }

    /// Deletes a product. Owner only.
    pub async fn delete_product(&self, principal: &Principal, name: &str) -> EngineResult<()> {
        let product = self.get_product(name).await?;

        if !can_mutate(principal, &product) {
            return Err(EngineError::not_owner());
        }

        self.database().products().delete(&product.id).await?;

        info!(
            seller = %principal.username,
            product = %product.product_name,
            "Product deleted"
        );

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use vend_db::{Database, DbConfig};

    async fn test_machine() -> VendingMachine {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        VendingMachine::new(db)
    }

    async fn register_principal(
        machine: &VendingMachine,
        username: &str,
        role: Role,
    ) -> Principal {
        let account = machine.register(username, role, "secret").await.unwrap();
        Principal::from_account(&account)
    }

    fn new_product(name: &str, cost: i64, stock: i64) -> NewProduct {
        NewProduct {
            product_name: name.to_string(),
            cost,
            amount_available: stock,
        }
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_register_and_lookup() {
        let machine = test_machine().await;

        let account = machine.register("neo42", Role::Buyer, "hash").await.unwrap();
        assert_eq!(account.deposit, 0);
        assert_eq!(account.credential, "hash");

        let found = machine.get_account("neo42").await.unwrap();
        assert_eq!(found.id, account.id);

        let err = machine.get_account("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "No such user");
    }

    #[tokio::test]
    async fn test_register_short_username() {
        let machine = test_machine().await;

        let err = machine.register("bob", Role::Buyer, "hash").await.unwrap_err();
        assert_eq!(err.to_string(), "Username must be at least 4 chars long");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let machine = test_machine().await;

        machine.register("twin", Role::Buyer, "a").await.unwrap();
        let err = machine.register("twin", Role::Seller, "b").await.unwrap_err();

        assert!(matches!(err, EngineError::Conflict(_)));
        assert_eq!(err.to_string(), "User already exists");
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_product_seller_only() {
        let machine = test_machine().await;
        let buyer = register_principal(&machine, "buyer1", Role::Buyer).await;

        let err = machine
            .create_product(&buyer, &new_product("soda", 25, 10))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "You need to be a seller to create products"
        );
    }

    #[tokio::test]
    async fn test_create_product_validates_values() {
        let machine = test_machine().await;
        let seller = register_principal(&machine, "seller1", Role::Seller).await;

        let err = machine
            .create_product(&seller, &new_product("soda", 13, 10))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cost must be multiple of 5");

        let err = machine
            .create_product(&seller, &new_product("soda", 0, 10))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cost must be positive");

        let err = machine
            .create_product(&seller, &new_product("soda", 25, -1))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Amount can't be negative number");
    }

    #[tokio::test]
    async fn test_create_product_duplicate_name() {
        let machine = test_machine().await;
        let seller = register_principal(&machine, "seller1", Role::Seller).await;
        let other = register_principal(&machine, "seller2", Role::Seller).await;

        machine
            .create_product(&seller, &new_product("soda", 25, 10))
            .await
            .unwrap();

        // Name is unique across all sellers
        let err = machine
            .create_product(&other, &new_product("soda", 50, 1))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "There is a product with the same name.");
    }

    #[tokio::test]
    async fn test_only_owner_can_update_or_delete() {
        let machine = test_machine().await;
        let owner = register_principal(&machine, "seller1", Role::Seller).await;
        let intruder = register_principal(&machine, "seller2", Role::Seller).await;

        let product = machine
            .create_product(&owner, &new_product("soda", 25, 10))
            .await
            .unwrap();

        assert!(can_mutate(&owner, &product));
        assert!(!can_mutate(&intruder, &product));

        let update = ProductUpdate {
            cost: 30,
            amount_available: 5,
        };

        let err = machine
            .update_product(&intruder, "soda", update)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "You are not authorized to perform this operation"
        );

        let err = machine.delete_product(&intruder, "soda").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "You are not authorized to perform this operation"
        );

        // The owner succeeds
        let updated = machine.update_product(&owner, "soda", update).await.unwrap();
        assert_eq!(updated.cost, 30);
        assert_eq!(updated.amount_available, 5);

        machine.delete_product(&owner, "soda").await.unwrap();
        let err = machine.get_product("soda").await.unwrap_err();
        assert_eq!(err.to_string(), "No such product");
    }

    #[tokio::test]
    async fn test_list_products() {
        let machine = test_machine().await;
        let seller = register_principal(&machine, "seller1", Role::Seller).await;

        machine
            .create_product(&seller, &new_product("water", 5, 3))
            .await
            .unwrap();
        machine
            .create_product(&seller, &new_product("chips", 20, 4))
            .await
            .unwrap();

        let names: Vec<String> = machine
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.product_name)
            .collect();
        assert_eq!(names, vec!["chips", "water"]);
    }
}
