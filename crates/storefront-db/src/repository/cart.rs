//! # Cart Repository
//!
//! One row per (user, product). Cart rows are working state only: order
//! creation reads them but never writes them in its transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use storefront_core::{CartItem, ProductId, UserId};

const CART_COLUMNS: &str = "id, user_id, product_id, quantity, created_at, updated_at";

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Gets a single cart row.
    pub async fn get(&self, user_id: UserId, product_id: ProductId) -> DbResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {} FROM cart_items WHERE user_id = ?1 AND product_id = ?2",
            CART_COLUMNS
        ))
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// A user's cart in the order products were first added.
    pub async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {} FROM cart_items WHERE user_id = ?1 ORDER BY id",
            CART_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Adds `quantity` to the cart row, creating it if needed.
    pub async fn add(&self, user_id: UserId, product_id: ProductId, quantity: i64) -> DbResult<CartItem> {
        debug!(user_id, product_id, quantity, "Adding to cart");

        let item = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            INSERT INTO cart_items (user_id, product_id, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT (user_id, product_id) DO UPDATE SET
                quantity = cart_items.quantity + excluded.quantity,
                updated_at = excluded.updated_at
            RETURNING {}
            "#,
            CART_COLUMNS
        ))
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Replaces the quantity of an existing cart row.
    ///
    /// ## Returns
    /// `None` when the product is not in the cart.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> DbResult<Option<CartItem>> {
        debug!(user_id, product_id, quantity, "Updating cart quantity");

        let item = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            UPDATE cart_items SET quantity = ?3, updated_at = ?4
             WHERE user_id = ?1 AND product_id = ?2
            RETURNING {}
            "#,
            CART_COLUMNS
        ))
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Removes one product from the cart. `false` if it was not there.
    pub async fn remove(&self, user_id: UserId, product_id: ProductId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?1 AND product_id = ?2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Empties a user's cart and returns how many rows were removed.
    pub async fn clear(&self, user_id: UserId) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        debug!(user_id, removed = result.rows_affected(), "Cleared cart");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
