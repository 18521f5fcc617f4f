//! # Pricing & Line-Item Builder
//!
//! Turns a checkout request into an [`OrderDraft`]: every line resolved
//! against the catalog, priced at the catalog price of this instant, and
//! summed into a total.
//!
//! ## Flow
//! ```text
//! CreateOrderRequest
//!      │
//!      ▼
//! validate_order_request()        ← shape only (lines, quantities, addresses)
//!      │
//!      ▼
//! for each line:
//!   catalog.get_product(id)       ← ProductNotFound aborts everything
//!   check_product(cumulative qty) ← ProductUnavailable / InsufficientStock
//!   unit_price × quantity         ← checked, AmountOverflow on overflow
//!      │
//!      ▼
//! OrderDraft { lines, total_amount = Σ line.total_price }
//! ```
//!
//! The build is pure. Stock is checked, not reserved; the order ledger
//! reserves it when the draft is persisted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogLookup;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::stock::check_product;
use crate::types::{CreateOrderRequest, ProductId, UserId};
use crate::validation::validate_order_request;

// =============================================================================
// Draft Types
// =============================================================================

/// One priced line, ready to become an order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Catalog price at build time.
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub total_price: Money,
}

/// A fully priced order that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub user_id: UserId,
    pub shipping_address: String,
    pub billing_address: String,
    /// Lines in request order. Repeated products stay separate lines.
    pub lines: Vec<DraftLine>,
    pub total_amount: Money,
}

// =============================================================================
// Builder
// =============================================================================

/// Prices a checkout request against `catalog`.
///
/// Fails without producing anything if any line fails: there is no partial
/// draft.
pub fn build_order<C: CatalogLookup + ?Sized>(
    catalog: &C,
    requester_id: UserId,
    request: &CreateOrderRequest,
) -> CoreResult<OrderDraft> {
    validate_order_request(request)?;

    let mut requested: HashMap<ProductId, i64> = HashMap::new();
    let mut lines = Vec::with_capacity(request.items.len());
    let mut total = Money::zero();

    for line in &request.items {
        let product = catalog
            .get_product(line.product_id)
            .ok_or(CoreError::ProductNotFound(line.product_id))?;

        let cumulative = requested.entry(line.product_id).or_insert(0);
        *cumulative += line.quantity;
        check_product(product, *cumulative)?;

        let overflow = || CoreError::AmountOverflow {
            product_id: line.product_id,
        };
        let unit_price = product.price();
        let total_price = unit_price
            .checked_multiply_quantity(line.quantity)
            .ok_or_else(overflow)?;
        total = total.checked_add(total_price).ok_or_else(overflow)?;

        lines.push(DraftLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price,
            total_price,
        });
    }

    Ok(OrderDraft {
        user_id: requester_id,
        shipping_address: request.shipping_address.trim().to_string(),
        billing_address: request.billing_address.trim().to_string(),
        lines,
        total_amount: total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
