//! # Payment Processor
//!
//! Settles a pending order in one transaction.
//!
//! ```text
//! BEGIN
//!   confirm_pending(order)       pending → confirmed, RETURNING total
//!     └── no row? ── ROLLBACK ──► OrderNotFound / OrderNotPayable
//!   insert_pending(payment)      amount = order total
//!   mark_completed(payment)      transaction_id = TXN-<uuid>
//! COMMIT
//! ```
//!
//! No gateway is called; a payment settles as soon as it is recorded. The
//! order write comes first so that concurrent payments for one order queue
//! on the write lock and only the first sees it `pending`.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{info, warn};
use uuid::Uuid;

use storefront_core::validation::validate_payment_method;
use storefront_core::{CoreError, OrderId, Payment};
use storefront_db::{commit, rollback, Database};

use crate::error::{ServiceError, ServiceResult};
use crate::ledger::abort;

/// Prefix of the settlement reference stored on completed payments.
const TRANSACTION_PREFIX: &str = "TXN";

/// Records and settles payments.
#[derive(Debug, Clone)]
pub struct PaymentProcessor {
    db: Database,
}

impl PaymentProcessor {
    pub fn new(db: Database) -> Self {
        PaymentProcessor { db }
    }

    /// Pays a `pending` order in full with `payment_method`.
    ///
    /// The completed payment, its amount, and the order's move to
    /// `confirmed` commit together or not at all.
    ///
    /// ## Returns
    /// * `Err(Validation)` - blank or oversized payment method
    /// * `Err(OrderNotFound)` - no such order
    /// * `Err(OrderNotPayable)` - the order is not `pending`
    pub async fn process_payment(&self, order_id: OrderId, payment_method: &str) -> ServiceResult<Payment> {
        let method = validate_payment_method(payment_method)?;

        let mut tx = self.db.begin().await?;

        let settled = self.settle(&mut tx, order_id, &method).await;
        match settled {
            Ok(Some(payment)) => {
                commit(tx).await?;
                info!(
                    order_id,
                    payment_id = payment.id,
                    amount_cents = payment.amount_cents,
                    transaction_id = payment.transaction_id.as_deref().unwrap_or_default(),
                    "Payment completed, order confirmed"
                );
                Ok(payment)
            }
            Ok(None) => {
                rollback(tx).await?;
                Err(self.not_payable(order_id).await)
            }
            Err(err) => Err(abort(tx, err).await),
        }
    }

    /// Settlement attempts for an order, oldest first.
    pub async fn payments_for_order(&self, order_id: OrderId) -> ServiceResult<Vec<Payment>> {
        Ok(self.db.payments().list_for_order(order_id).await?)
    }

    /// `None` when the order was not `pending`; nothing was written.
    async fn settle(
        &self,
        conn: &mut SqliteConnection,
        order_id: OrderId,
        method: &str,
    ) -> ServiceResult<Option<Payment>> {
        let orders = self.db.orders();
        let Some(total_cents) = orders.confirm_pending(conn, order_id, Utc::now()).await? else {
            return Ok(None);
        };

        // The write lock is held from here on.
        let now = Utc::now();

        let payments = self.db.payments();
        let payment_id = payments
            .insert_pending(conn, order_id, method, total_cents, now)
            .await?;

        let reference = format!("{}-{}", TRANSACTION_PREFIX, Uuid::new_v4().simple());
        let payment = payments
            .mark_completed(conn, payment_id, &reference, now)
            .await?;

        Ok(Some(payment))
    }

    /// Explains why an order could not be confirmed.
    async fn not_payable(&self, order_id: OrderId) -> ServiceError {
        let err: ServiceError = match self.db.orders().get_by_id(order_id).await {
            Ok(None) => CoreError::OrderNotFound(order_id).into(),
            Ok(Some(order)) => CoreError::OrderNotPayable {
                order_id,
                status: order.status,
            }
            .into(),
            Err(err) => return err.into(),
        };

        warn!(order_id, error = %err, "Payment refused");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{OrderStatus, PaymentStatus};
    use storefront_db::DbConfig;

    /// A pending order for user 1 totalling 2500 cents, placed directly.
    async fn pending_order(db: &Database) -> OrderId {
        sqlx::query_scalar(
            r#"
            INSERT INTO orders (
                user_id, order_number, status, total_amount_cents,
                shipping_address, billing_address, created_at, updated_at
            ) VALUES (1, 'ORD-TEST-1', 'pending', 2500, 'a', 'b', ?1, ?1)
            RETURNING id
            "#,
        )
        .bind(Utc::now())
        .fetch_one(db.pool())
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_payment_carries_order_total() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order_id = pending_order(&db).await;
        let processor = PaymentProcessor::new(db.clone());

        let payment = processor.process_payment(order_id, "  card ").await.unwrap();

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.amount_cents, 2500);
        assert_eq!(payment.payment_method, "card");
        assert!(payment.transaction_id.unwrap().starts_with("TXN-"));

        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_second_payment_is_refused() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order_id = pending_order(&db).await;
        let processor = PaymentProcessor::new(db.clone());

        processor.process_payment(order_id, "card").await.unwrap();
        let err = processor.process_payment(order_id, "card").await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Domain(CoreError::OrderNotPayable {
                status: OrderStatus::Confirmed,
                ..
            })
        ));
        assert_eq!(processor.payments_for_order(order_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_order_and_blank_method() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let processor = PaymentProcessor::new(db.clone());

        assert!(matches!(
            processor.process_payment(77, "card").await.unwrap_err(),
            ServiceError::Domain(CoreError::OrderNotFound(77))
        ));

        let order_id = pending_order(&db).await;
        assert!(matches!(
            processor.process_payment(order_id, "   ").await.unwrap_err(),
            ServiceError::Domain(CoreError::Validation(_))
        ));
        assert!(processor.payments_for_order(order_id).await.unwrap().is_empty());
    }
}
