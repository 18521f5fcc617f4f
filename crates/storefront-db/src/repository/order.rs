//! # Order Repository
//!
//! Database operations for orders, order items, and the order-number
//! sequence.
//!
//! ## Order Creation (one transaction, driven by the order ledger)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   ├── next_order_number()   UPDATE order_number_sequence … RETURNING   │
//! │   ├── insert_header()       status = pending, total frozen             │
//! │   ├── for each line:                                                    │
//! │   │     reserve_stock()     (product repository)                       │
//! │   │     insert_item()       unit/total price frozen                    │
//! │  COMMIT  (or drop → ROLLBACK: no header, no items, no stock change)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sequence update is the first statement of the transaction, so the
//! write lock is taken up front instead of being upgraded from a read lock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use storefront_core::numbering::format_order_number;
use storefront_core::{DraftLine, Order, OrderDraft, OrderId, OrderItem, OrderStatus, UserId};

const ORDER_COLUMNS: &str = "id, user_id, order_number, status, total_amount_cents, \
                             shipping_address, billing_address, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, unit_price_cents, total_price_cents";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order with its items.
    pub async fn get_by_id(&self, id: OrderId) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch(&mut conn, id).await
    }

    /// Lists a user's orders, newest first, items included.
    pub async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        debug!(user_id, count = orders.len(), "Listed orders for user");
        Self::attach_items(&mut conn, orders).await
    }

    /// Lists every order, newest first, items included.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders ORDER BY created_at DESC, id DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(&mut *conn)
        .await?;

        debug!(count = orders.len(), "Listed all orders");
        Self::attach_items(&mut conn, orders).await
    }

    // -------------------------------------------------------------------------
    // Transaction building blocks
    // -------------------------------------------------------------------------

    /// Reads an order with its items on the given connection.
    pub async fn fetch(conn: &mut SqliteConnection, id: OrderId) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = ?1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        match order {
            Some(mut order) => {
                order.items = Self::fetch_items(conn, id).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Items of one order in insertion order.
    pub async fn fetch_items(conn: &mut SqliteConnection, order_id: OrderId) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {} FROM order_items WHERE order_id = ?1 ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }

    /// Allocates the next order number from the sequence.
    ///
    /// Returns the number and the creation time it was issued at. The clock
    /// is read once the sequence row is written, so while the transaction
    /// holds the write lock no later order can take an earlier timestamp.
    pub async fn next_order_number(
        &self,
        conn: &mut SqliteConnection,
    ) -> DbResult<(String, DateTime<Utc>)> {
        let sequence: i64 = sqlx::query_scalar(
            "UPDATE order_number_sequence SET value = value + 1 WHERE id = 1 RETURNING value",
        )
        .fetch_one(&mut *conn)
        .await?;

        let created_at = Utc::now();
        Ok((format_order_number(created_at, sequence), created_at))
    }

    /// Inserts the order header in `pending` with the draft's frozen total.
    pub async fn insert_header(
        &self,
        conn: &mut SqliteConnection,
        draft: &OrderDraft,
        order_number: &str,
        now: DateTime<Utc>,
    ) -> DbResult<OrderId> {
        debug!(order_number, user_id = draft.user_id, "Inserting order header");

        let id: OrderId = sqlx::query_scalar(
            r#"
            INSERT INTO orders (
                user_id, order_number, status, total_amount_cents,
                shipping_address, billing_address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING id
            "#,
        )
        .bind(draft.user_id)
        .bind(order_number)
        .bind(OrderStatus::Pending)
        .bind(draft.total_amount.cents())
        .bind(&draft.shipping_address)
        .bind(&draft.billing_address)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Inserts one line item with its price snapshot.
    pub async fn insert_item(
        &self,
        conn: &mut SqliteConnection,
        order_id: OrderId,
        line: &DraftLine,
        now: DateTime<Utc>,
    ) -> DbResult<OrderItem> {
        debug!(order_id, product_id = line.product_id, quantity = line.quantity, "Inserting order item");

        let item = sqlx::query_as::<_, OrderItem>(&format!(
            r#"
            INSERT INTO order_items (
                order_id, product_id, quantity, unit_price_cents, total_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price.cents())
        .bind(line.total_price.cents())
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(item)
    }

    /// Moves an order from `expected` to `next`, only if it is still in
    /// `expected`.
    ///
    /// ## Returns
    /// `false` when the order is missing or its status changed since it was
    /// read.
    pub async fn compare_and_set_status(
        &self,
        conn: &mut SqliteConnection,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        debug!(order_id = id, %expected, %next, applied = result.rows_affected() == 1, "Status compare-and-set");
        Ok(result.rows_affected() == 1)
    }

    /// Confirms a `pending` order and returns its frozen total in cents.
    ///
    /// `None` when the order is missing or no longer pending; nothing was
    /// written in that case.
    pub async fn confirm_pending(
        &self,
        conn: &mut SqliteConnection,
        id: OrderId,
        now: DateTime<Utc>,
    ) -> DbResult<Option<i64>> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE orders
               SET status = ?2, updated_at = ?3
             WHERE id = ?1 AND status = ?4
            RETURNING total_amount_cents
            "#,
        )
        .bind(id)
        .bind(OrderStatus::Confirmed)
        .bind(now)
        .bind(OrderStatus::Pending)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(total)
    }

    async fn attach_items(conn: &mut SqliteConnection, mut orders: Vec<Order>) -> DbResult<Vec<Order>> {
        if orders.is_empty() {
            return Ok(orders);
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM order_items WHERE order_id IN (",
            ITEM_COLUMNS
        ));
        let mut separated = query.separated(", ");
        for order in &orders {
            separated.push_bind(order.id);
        }
        separated.push_unseparated(") ORDER BY order_id, id");

        let items: Vec<OrderItem> = query
            .build_query_as::<OrderItem>()
            .fetch_all(&mut *conn)
            .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        for order in &mut orders {
            order.items = by_order.remove(&order.id).unwrap_or_default();
        }

        Ok(orders)
    }
}

// =============================================================================
// Test Support
// =============================================================================


// =============================================================================
// Unit Tests
// =============================================================================
