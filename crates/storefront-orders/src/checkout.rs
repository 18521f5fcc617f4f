//! # Checkout
//!
//! Request → priced draft → durable order.
//!
//! ```text
//! CreateOrderRequest
//!      │ validate_order_request()
//!      ▼
//! load_catalog(product ids)      ← one IN query, point-in-time snapshot
//!      │
//!      ▼
//! build_order(snapshot)          ← pure: prices, totals, advisory stock check
//!      │
//!      ▼
//! OrderLedger::create_order()    ← transaction: header, items, stock
//! ```

use tracing::{debug, warn};

use storefront_core::pricing::build_order;
use storefront_core::validation::validate_order_request;
use storefront_core::{CreateOrderRequest, Order, ProductId, UserId};
use storefront_db::Database;

use crate::error::ServiceResult;
use crate::ledger::OrderLedger;

/// Places orders for authenticated requesters.
#[derive(Debug, Clone)]
pub struct Checkout {
    db: Database,
    ledger: OrderLedger,
}

impl Checkout {
    pub fn new(db: Database, ledger: OrderLedger) -> Self {
        Checkout { db, ledger }
    }

    /// Prices `request` at current catalog prices and persists it as a
    /// `pending` order owned by `requester_id`.
    ///
    /// Nothing is written unless every line resolves and its stock can be
    /// reserved.
    pub async fn place_order(
        &self,
        requester_id: UserId,
        request: &CreateOrderRequest,
    ) -> ServiceResult<Order> {
        validate_order_request(request)?;

        let ids: Vec<ProductId> = request.items.iter().map(|line| line.product_id).collect();
        let catalog = self.db.products().load_catalog(&ids).await?;
        debug!(requester_id, requested = ids.len(), resolved = catalog.len(), "Catalog snapshot loaded");

        let draft = build_order(&catalog, requester_id, request).map_err(|err| {
            warn!(requester_id, error = %err, "Order request rejected");
            err
        })?;

        self.ledger.create_order(&draft).await
    }
}
