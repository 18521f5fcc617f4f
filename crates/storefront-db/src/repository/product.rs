//! # Product Repository
//!
//! The database side of the catalog: lookups for the Stock Guard and the
//! pricing builder, and the stock reservation used by order creation.
//!
//! ## Stock Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Conditional Decrement                                │
//! │                                                                         │
//! │  ❌ WRONG: read, decide, write (two checkouts both see stock = 1)      │
//! │     SELECT stock_quantity ... ; UPDATE products SET stock_quantity = 0 │
//! │                                                                         │
//! │  ✅ CORRECT: decide inside the write                                   │
//! │     UPDATE products                                                     │
//! │        SET stock_quantity = stock_quantity - :qty                       │
//! │      WHERE id = :id AND is_active = 1 AND stock_quantity >= :qty        │
//! │                                                                         │
//! │  1 row  → reserved                                                      │
//! │  0 rows → classify (missing / inactive / insufficient), caller rolls   │
//! │           back the whole order transaction                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::{CatalogProduct, CatalogSnapshot, ProductId};

const PRODUCT_COLUMNS: &str = "id, name, price_cents, stock_quantity, is_active";

/// A product to insert (seed data and fixtures).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub stock_quantity: i64,
}

impl NewProduct {
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        stock_quantity: i64,
    ) -> Self {
        NewProduct {
            sku: sku.into(),
            name: name.into(),
            price_cents,
            stock_quantity,
        }
    }
}

/// Result of [`ProductRepository::reserve_stock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// Stock was decremented.
    Reserved,
    /// No product with this id.
    Missing,
    /// The product is not active.
    Inactive,
    /// Not enough stock; nothing was decremented.
    Insufficient { available: i64 },
}

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

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<CatalogProduct>> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch(&mut conn, id).await
    }

    /// Loads the products a request mentions into a [`CatalogSnapshot`].
    ///
    /// Ids that do not resolve are simply absent from the snapshot; the
    /// pricing builder reports them as `ProductNotFound`.
    pub async fn load_catalog(&self, ids: &[ProductId]) -> DbResult<CatalogSnapshot> {
        let ids: BTreeSet<ProductId> = ids.iter().copied().collect();
        if ids.is_empty() {
            return Ok(CatalogSnapshot::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM products WHERE id IN (",
            PRODUCT_COLUMNS
        ));
        let mut separated = query.separated(", ");
        for id in &ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let products: Vec<CatalogProduct> = query
            .build_query_as::<CatalogProduct>()
            .fetch_all(&self.pool)
            .await?;

        debug!(requested = ids.len(), found = products.len(), "Loaded catalog snapshot");
        Ok(products.into_iter().collect())
    }

    /// Inserts a new active product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, product: &NewProduct) -> DbResult<CatalogProduct> {
        debug!(sku = %product.sku, "Inserting product");

        let now = Utc::now();

        let inserted = sqlx::query_as::<_, CatalogProduct>(&format!(
            r#"
            INSERT INTO products (sku, name, price_cents, stock_quantity, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Changes the catalog price. Existing order items keep their snapshot.
    pub async fn set_price(&self, id: ProductId, price_cents: i64) -> DbResult<()> {
        debug!(product_id = id, price_cents, "Updating price");

        let result = sqlx::query("UPDATE products SET price_cents = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(price_cents)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Activates or deactivates a product.
    pub async fn set_active(&self, id: ProductId, active: bool) -> DbResult<()> {
        debug!(product_id = id, active, "Setting product active flag");

        let result = sqlx::query("UPDATE products SET is_active = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Transaction building blocks
    // -------------------------------------------------------------------------

    /// Reads a product on the given connection.
    pub async fn fetch(conn: &mut SqliteConnection, id: ProductId) -> DbResult<Option<CatalogProduct>> {
        let product = sqlx::query_as::<_, CatalogProduct>(&format!(
            "SELECT {} FROM products WHERE id = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Takes `quantity` units of stock, only if all of them are available.
    ///
    /// On anything but [`ReserveOutcome::Reserved`] nothing was written, and
    /// the caller is expected to roll back its transaction.
    pub async fn reserve_stock(
        &self,
        conn: &mut SqliteConnection,
        id: ProductId,
        quantity: i64,
    ) -> DbResult<ReserveOutcome> {
        let result = sqlx::query(
            r#"
            UPDATE products
               SET stock_quantity = stock_quantity - ?2,
                   updated_at = ?3
             WHERE id = ?1
               AND is_active = 1
               AND stock_quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 1 {
            debug!(product_id = id, quantity, "Reserved stock");
            return Ok(ReserveOutcome::Reserved);
        }

        let outcome = match Self::fetch(conn, id).await? {
            None => ReserveOutcome::Missing,
            Some(product) if !product.is_active => ReserveOutcome::Inactive,
            Some(product) => ReserveOutcome::Insufficient {
                available: product.stock_quantity,
            },
        };

        debug!(product_id = id, quantity, ?outcome, "Stock reservation refused");
        Ok(outcome)
    }

    /// Returns `quantity` units to stock (order cancellation).
    ///
    /// ## Returns
    /// `false` when the product row no longer exists.
    pub async fn restock(
        &self,
        conn: &mut SqliteConnection,
        id: ProductId,
        quantity: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE products SET stock_quantity = stock_quantity + ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        debug!(product_id = id, quantity, "Restocked");
        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{commit, Database, DbConfig};
    use storefront_core::CatalogLookup;

    async fn db_with_mug(stock: i64) -> (Database, CatalogProduct) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mug = db
            .products()
            .insert(&NewProduct::new("MUG-1", "Mug", 1000, stock))
            .await
            .unwrap();
        (db, mug)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (db, mug) = db_with_mug(5).await;

        assert!(mug.is_active);
        assert_eq!(mug.price_cents, 1000);

        let fetched = db.products().get_by_id(mug.id).await.unwrap();
        assert_eq!(fetched, Some(mug));
        assert_eq!(db.products().get_by_id(999).await.unwrap(), None);
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_sku() {
        let (db, _) = db_with_mug(5).await;

        let err = db
            .products()
            .insert(&NewProduct::new("MUG-1", "Other mug", 500, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref column } if column == "products.sku"));
    }

    #[tokio::test]
    async fn test_load_catalog_skips_unknown_ids() {
        let (db, mug) = db_with_mug(5).await;

        let snapshot = db.products().load_catalog(&[mug.id, mug.id, 999]).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get_product(mug.id).is_some());
        assert!(snapshot.get_product(999).is_none());

        assert!(db.products().load_catalog(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reserve_stock() {
        let (db, mug) = db_with_mug(5).await;
        let products = db.products();

        let mut tx = db.begin().await.unwrap();
        assert_eq!(
            products.reserve_stock(&mut tx, mug.id, 3).await.unwrap(),
            ReserveOutcome::Reserved
        );
        assert_eq!(
            products.reserve_stock(&mut tx, mug.id, 3).await.unwrap(),
            ReserveOutcome::Insufficient { available: 2 }
        );
        assert_eq!(
            products.reserve_stock(&mut tx, 999, 1).await.unwrap(),
            ReserveOutcome::Missing
        );
        commit(tx).await.unwrap();

        let mug = products.get_by_id(mug.id).await.unwrap().unwrap();
        assert_eq!(mug.stock_quantity, 2);
    }

    #[tokio::test]
    async fn test_reserve_inactive_product() {
        let (db, mug) = db_with_mug(5).await;
        db.products().set_active(mug.id, false).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        let outcome = db.products().reserve_stock(&mut tx, mug.id, 1).await.unwrap();
        assert_eq!(outcome, ReserveOutcome::Inactive);
    }

    #[tokio::test]
    async fn test_restock() {
        let (db, mug) = db_with_mug(1).await;

        let mut tx = db.begin().await.unwrap();
        assert!(db.products().restock(&mut tx, mug.id, 4).await.unwrap());
        assert!(!db.products().restock(&mut tx, 999, 4).await.unwrap());
        commit(tx).await.unwrap();

        let mug = db.products().get_by_id(mug.id).await.unwrap().unwrap();
        assert_eq!(mug.stock_quantity, 5);
    }
}
