//! # Payment Repository
//!
//! One row per settlement attempt. Rows are never updated except to move
//! `pending → completed | failed`, and the status guard lives in the SQL so
//! a settled row cannot be settled twice.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::{OrderId, Payment, PaymentId, PaymentStatus};

const PAYMENT_COLUMNS: &str = "id, order_id, payment_method, status, amount_cents, \
                               transaction_id, created_at, updated_at";

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Settlement attempts for an order, oldest first.
    pub async fn list_for_order(&self, order_id: OrderId) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {} FROM payments WHERE order_id = ?1 ORDER BY id",
            PAYMENT_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Inserts a `pending` payment.
    pub async fn insert_pending(
        &self,
        conn: &mut SqliteConnection,
        order_id: OrderId,
        payment_method: &str,
        amount_cents: i64,
        now: DateTime<Utc>,
    ) -> DbResult<PaymentId> {
        debug!(order_id, payment_method, amount_cents, "Inserting pending payment");

        let id: PaymentId = sqlx::query_scalar(
            r#"
            INSERT INTO payments (order_id, payment_method, status, amount_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING id
            "#,
        )
        .bind(order_id)
        .bind(payment_method)
        .bind(PaymentStatus::Pending)
        .bind(amount_cents)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Settles a pending payment as `completed` with an external reference.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no pending payment with this id
    pub async fn mark_completed(
        &self,
        conn: &mut SqliteConnection,
        id: PaymentId,
        transaction_id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Payment> {
        self.settle(conn, id, PaymentStatus::Completed, Some(transaction_id), now)
            .await
    }

    /// Settles a pending payment as `failed`.
    pub async fn mark_failed(
        &self,
        conn: &mut SqliteConnection,
        id: PaymentId,
        now: DateTime<Utc>,
    ) -> DbResult<Payment> {
        self.settle(conn, id, PaymentStatus::Failed, None, now).await
    }

    async fn settle(
        &self,
        conn: &mut SqliteConnection,
        id: PaymentId,
        outcome: PaymentStatus,
        transaction_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> DbResult<Payment> {
        if !PaymentStatus::Pending.can_transition_to(outcome) {
            return Err(DbError::Internal(format!("payment cannot settle as {outcome:?}")));
        }

        debug!(payment_id = id, ?outcome, "Settling payment");

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            UPDATE payments
               SET status = ?2, transaction_id = ?3, updated_at = ?4
             WHERE id = ?1 AND status = ?5
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .bind(outcome)
        .bind(transaction_id)
        .bind(now)
        .bind(PaymentStatus::Pending)
        .fetch_optional(&mut *conn)
        .await?;

        payment.ok_or_else(|| DbError::not_found("Pending payment", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
