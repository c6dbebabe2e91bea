//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD keyed by the unique product name
//! - Guarded stock decrement for purchase settlement
//!
//! ## Stock Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ❌ WRONG: absolute update (oversells under concurrency)                │
//! │     read stock=10 → compute 7 → UPDATE ... SET amount_available = 7     │
//! │                                                                         │
//! │  ✅ CORRECT: guarded prior-value update                                 │
//! │     UPDATE products                                                     │
//! │     SET amount_available = amount_available - 3                         │
//! │     WHERE id = ? AND amount_available >= 3                              │
//! │                                                                         │
//! │  rows_affected() tells the settlement whether the stock still covered   │
//! │  the request at execution time, whatever was read during validation.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use vend_core::Product;

const PRODUCT_COLUMNS: &str =
    "id, product_name, cost, amount_available, seller_id, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its unique name (the business key buyers order by).
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE product_name = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists all products, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY product_name");

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a new product for a seller.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted product
    /// * `Err(DbError::UniqueViolation)` - Product name already exists
    pub async fn insert(
        &self,
        product_name: &str,
        cost: i64,
        amount_available: i64,
        seller_id: &str,
    ) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            product_name: product_name.to_string(),
            cost,
            amount_available,
            seller_id: seller_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.product_name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products
                (id, product_name, cost, amount_available, seller_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.product_name)
        .bind(product.cost)
        .bind(product.amount_available)
        .bind(&product.seller_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates a product's cost and stock. The name and owner stay fixed.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, cost: i64, amount_available: i64) -> DbResult<()> {
        debug!(id = %id, cost = %cost, stock = %amount_available, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET cost = ?2, amount_available = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(cost)
        .bind(amount_available)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    // =========================================================================
    // Transaction-Aware Helpers (purchase settlement)
    // =========================================================================

    /// Gets a product by name inside an open transaction.
    pub async fn get_by_name_in(
        conn: &mut SqliteConnection,
        name: &str,
    ) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE product_name = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name)
            .fetch_optional(conn)
            .await?;

        Ok(product)
    }

    /// Decrements a product's stock inside an open transaction, guarded so
    /// the stock can never go negative.
    ///
    /// ## Returns
    /// `true` if the decrement applied; `false` if the guard rejected it
    /// (stock below `amount` at execution time).
    pub async fn decrement_stock_in(
        conn: &mut SqliteConnection,
        id: &str,
        amount: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, amount = %amount, "Decrementing stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET amount_available = amount_available - ?2, updated_at = ?3
            WHERE id = ?1 AND amount_available >= ?2
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use vend_core::Role;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seller_id(db: &Database) -> String {
        db.accounts()
            .create("seller1", Role::Seller, "s")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_insert_and_get_product() {
        let db = test_db().await;
        let seller = seller_id(&db).await;
        let repo = db.products();

        let soda = repo.insert("soda", 25, 10, &seller).await.unwrap();
        assert_eq!(soda.cost, 25);
        assert_eq!(soda.amount_available, 10);

        let found = repo.get_by_name("soda").await.unwrap().unwrap();
        assert_eq!(found.id, soda.id);
        assert_eq!(found.seller_id, seller);

        assert!(repo.get_by_name("chips").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        let seller = seller_id(&db).await;
        let repo = db.products();

        repo.insert("soda", 25, 10, &seller).await.unwrap();
        let err = repo.insert("soda", 50, 1, &seller).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_products_sorted() {
        let db = test_db().await;
        let seller = seller_id(&db).await;
        let repo = db.products();

        repo.insert("water", 5, 3, &seller).await.unwrap();
        repo.insert("chips", 10, 4, &seller).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.product_name)
            .collect();
        assert_eq!(names, vec!["chips", "water"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let seller = seller_id(&db).await;
        let repo = db.products();

        let soda = repo.insert("soda", 25, 10, &seller).await.unwrap();

        repo.update(&soda.id, 30, 4).await.unwrap();
        let updated = repo.get_by_id(&soda.id).await.unwrap().unwrap();
        assert_eq!(updated.cost, 30);
        assert_eq!(updated.amount_available, 4);

        repo.delete(&soda.id).await.unwrap();
        assert!(repo.get_by_id(&soda.id).await.unwrap().is_none());

        let err = repo.delete(&soda.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_decrement_stock_guard() {
        let db = test_db().await;
        let seller = seller_id(&db).await;
        let repo = db.products();

        let soda = repo.insert("soda", 25, 3, &seller).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();

        // Exact depletion to zero is allowed
        let applied = ProductRepository::decrement_stock_in(&mut *tx, &soda.id, 3)
            .await
            .unwrap();
        assert!(applied);

        // Stock is now 0; further decrements are rejected by the guard
        let applied = ProductRepository::decrement_stock_in(&mut *tx, &soda.id, 1)
            .await
            .unwrap();
        assert!(!applied);

        tx.commit().await.unwrap();

        let soda = repo.get_by_id(&soda.id).await.unwrap().unwrap();
        assert_eq!(soda.amount_available, 0);
    }
}
