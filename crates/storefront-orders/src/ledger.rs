//! # Order Ledger
//!
//! Durable orders: atomic creation, owner-checked reads, newest-first
//! listings, and lifecycle updates.
//!
//! ## Creation
//! ```text
//! OrderDraft (priced, checked)
//!      │
//!      ▼
//! BEGIN
//!   next_order_number()                  ORD-YYYYMMDD-NNNNNN
//!   insert_header()                      status = pending
//!   for each line:
//!     reserve_stock()                    conditional decrement
//!       └── refused? ── ROLLBACK ──► ProductNotFound / ProductUnavailable /
//!                                    InsufficientStock
//!     insert_item()                      price snapshot
//! COMMIT
//! ```
//!
//! The draft's stock check is advisory; the conditional decrement inside the
//! transaction is what keeps two checkouts from selling the same unit.
//!
//! ## Status Updates
//! A status update reads the order, checks the transition against the
//! configured [`TransitionPolicy`], then writes it as a compare-and-set on
//! the status it read. Moving to `cancelled` returns the items to stock in
//! the same transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::{debug, error, info, warn};

use storefront_core::{
    CoreError, Order, OrderDraft, OrderId, OrderItem, OrderStatus, ProductId, TransitionPolicy,
    UserId, ValidationError,
};
use storefront_db::{commit, rollback, Database, DbError, DbTransaction, OrderRepository, ReserveOutcome};

use crate::error::{ServiceError, ServiceResult};

/// Owns order persistence and the order lifecycle.
#[derive(Debug, Clone)]
pub struct OrderLedger {
    db: Database,
    policy: TransitionPolicy,
}

impl OrderLedger {
    pub fn new(db: Database, policy: TransitionPolicy) -> Self {
        OrderLedger { db, policy }
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Persists a draft as a `pending` order, reserving its stock.
    ///
    /// Header, items, and stock decrements commit together. On any error
    /// the transaction is rolled back before returning, so readers never see
    /// part of the order.
    pub async fn create_order(&self, draft: &OrderDraft) -> ServiceResult<Order> {
        if draft.lines.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }

        let mut tx = self.db.begin().await?;

        let written = self.write_order(&mut tx, draft).await;
        match written {
            Ok(order) => {
                commit(tx).await?;
                info!(
                    order_id = order.id,
                    order_number = %order.order_number,
                    user_id = order.user_id,
                    total_cents = order.total_amount_cents,
                    items = order.items.len(),
                    "Order created"
                );
                Ok(order)
            }
            Err(err) => Err(abort(tx, err).await),
        }
    }

    async fn write_order(
        &self,
        conn: &mut SqliteConnection,
        draft: &OrderDraft,
    ) -> ServiceResult<Order> {
        let orders = self.db.orders();

        let (order_number, now) = orders.next_order_number(conn).await?;
        let order_id = orders.insert_header(conn, draft, &order_number, now).await?;
        debug!(order_id, %order_number, "Order header written");

        let mut reservations = Reservations::default();
        for line in &draft.lines {
            reservations
                .reserve(&self.db, conn, line.product_id, line.quantity)
                .await?;
            orders.insert_item(conn, order_id, line, now).await?;
        }

        OrderRepository::fetch(conn, order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id).into())
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Gets an order on behalf of `requester_id`.
    ///
    /// ## Returns
    /// * `Err(OrderNotFound)` - no such order
    /// * `Err(Unauthorized)` - the order belongs to someone else
    pub async fn get_order(&self, order_id: OrderId, requester_id: UserId) -> ServiceResult<Order> {
        let order = self.load(order_id).await?;

        if order.user_id != requester_id {
            warn!(order_id, requester_id, "Order read refused: not the owner");
            return Err(CoreError::Unauthorized { order_id }.into());
        }

        Ok(order)
    }

    /// A user's orders, newest first.
    pub async fn list_orders_for_user(&self, user_id: UserId) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_for_user(user_id).await?)
    }

    /// Every order, newest first. The caller is responsible for checking
    /// that the requester is privileged.
    pub async fn list_all_orders(&self) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_all().await?)
    }

    async fn load(&self, order_id: OrderId) -> ServiceResult<Order> {
        self.db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(order_id).into())
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Moves an order to `new_status` and returns the updated order.
    ///
    /// ## Returns
    /// * `Err(InvalidStatus)` - `new_status` is not a known status
    /// * `Err(OrderNotFound)` - no such order
    /// * `Err(InvalidTransition)` - the policy forbids the move
    /// * `Err(ConcurrentModification)` - the status changed after it was read
    ///
    /// Re-applying the current status succeeds without writing.
    pub async fn update_status(&self, order_id: OrderId, new_status: &str) -> ServiceResult<Order> {
        let next: OrderStatus = new_status.parse()?;
        let current = self.load(order_id).await?;

        if current.status == next {
            debug!(order_id, status = %next, "Status unchanged");
            return Ok(current);
        }

        if !current.status.can_transition_to(next, self.policy) {
            warn!(order_id, from = %current.status, to = %next, policy = ?self.policy, "Status transition refused");
            return Err(CoreError::InvalidTransition {
                from: current.status,
                to: next,
            }
            .into());
        }

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let written = self.write_status(&mut tx, &current, next, now).await;
        match written {
            Ok(order) => {
                commit(tx).await?;
                info!(order_id, from = %current.status, to = %next, "Order status updated");
                Ok(order)
            }
            Err(err) => Err(abort(tx, err).await),
        }
    }

    async fn write_status(
        &self,
        conn: &mut SqliteConnection,
        current: &Order,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> ServiceResult<Order> {
        let applied = self
            .db
            .orders()
            .compare_and_set_status(conn, current.id, current.status, next, now)
            .await?;

        if !applied {
            return Err(CoreError::ConcurrentModification {
                order_id: current.id,
            }
            .into());
        }

        if next == OrderStatus::Cancelled {
            self.restock_items(conn, &current.items).await?;
        } else if current.status == OrderStatus::Cancelled {
            // Only reachable under the permissive policy.
            let mut reservations = Reservations::default();
            for item in &current.items {
                reservations
                    .reserve(&self.db, conn, item.product_id, item.quantity)
                    .await?;
            }
        }

        OrderRepository::fetch(conn, current.id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", current.id).into())
    }

    async fn restock_items(&self, conn: &mut SqliteConnection, items: &[OrderItem]) -> ServiceResult<()> {
        let products = self.db.products();

        for item in items {
            if !products.restock(conn, item.product_id, item.quantity).await? {
                warn!(
                    order_id = item.order_id,
                    product_id = item.product_id,
                    "Cancelled item refers to a deleted product, not restocked"
                );
            }
        }

        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Stock taken so far in one transaction, per product.
///
/// Refusals report cumulative figures, so a request for the same product on
/// two lines reads as one request for the sum.
#[derive(Debug, Default)]
struct Reservations {
    taken: HashMap<ProductId, i64>,
}

impl Reservations {
    async fn reserve(
        &mut self,
        db: &Database,
        conn: &mut SqliteConnection,
        product_id: ProductId,
        quantity: i64,
    ) -> ServiceResult<()> {
        let already = self.taken.get(&product_id).copied().unwrap_or(0);

        let refusal = match db.products().reserve_stock(conn, product_id, quantity).await? {
            ReserveOutcome::Reserved => {
                self.taken.insert(product_id, already + quantity);
                return Ok(());
            }
            ReserveOutcome::Missing => CoreError::ProductNotFound(product_id),
            ReserveOutcome::Inactive => CoreError::ProductUnavailable { product_id },
            ReserveOutcome::Insufficient { available } => CoreError::InsufficientStock {
                product_id,
                available: available + already,
                requested: quantity + already,
            },
        };

        Err(refusal.into())
    }
}

/// Rolls back `tx` and hands back the error that caused it.
pub(crate) async fn abort(tx: DbTransaction, err: ServiceError) -> ServiceError {
    if let Err(rollback_err) = rollback(tx).await {
        error!(error = %rollback_err, "Rollback failed");
    }

    match &err {
        ServiceError::Domain(reason) => warn!(%reason, "Request rejected, transaction rolled back"),
        ServiceError::Storage(reason) => error!(%reason, "Storage failure, transaction rolled back"),
    }

    err
}

// =============================================================================
// Unit Tests
// =============================================================================
