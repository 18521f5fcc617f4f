//! # Domain Types
//!
//! Core domain types of the order-fulfillment core.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │◆──│   OrderItem     │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  order_id (FK)  │   │  order_id (FK)  │       │
//! │  │  order_number   │   │  product_id     │   │  method         │       │
//! │  │  status         │   │  unit_price ❄   │   │  status         │       │
//! │  │  total_amount ❄ │   │  total_price ❄  │   │  amount         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ❄ = frozen at creation (price-at-purchase, never recomputed)          │
//! │  ◆ = composition: items cannot outlive their order                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id`: numeric, used for relations
//! - `order_number`: human-facing business key (`ORD-20261019-000042`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

/// Numeric identity of an order.
pub type OrderId = i64;
/// Numeric identity of a catalog product.
pub type ProductId = i64;
/// Numeric identity of an authenticated user.
pub type UserId = i64;
/// Numeric identity of a payment attempt.
pub type PaymentId = i64;

// =============================================================================
// Catalog Product
// =============================================================================

/// What the catalog tells us about a product at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    /// Current price in cents.
    pub price_cents: i64,
    /// Stock on hand.
    pub stock_quantity: i64,
    /// Inactive products cannot be carted or ordered.
    pub is_active: bool,
}

impl CatalogProduct {
    /// Creates an active product.
    pub fn new(id: ProductId, name: impl Into<String>, price_cents: i64, stock_quantity: i64) -> Self {
        CatalogProduct {
            id,
            name: name.into(),
            price_cents,
            stock_quantity,
            is_active: true,
        }
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of an order.
///
/// ## State Machine
/// ```text
///   pending ──► confirmed ──► shipped ──► delivered
///      │            │
///      └────────────┴──► cancelled
/// ```
/// Under [`TransitionPolicy::Permissive`] any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting payment.
    Pending,
    /// Paid.
    Confirmed,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Abandoned; reserved stock has been returned.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// The wire/storage spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the lifecycle allows moving to `next`.
    ///
    /// Re-applying the current status is always allowed (it is a no-op).
    pub fn can_transition_to(&self, next: OrderStatus, policy: TransitionPolicy) -> bool {
        if *self == next {
            return true;
        }

        match policy {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => matches!(
                (self, next),
                (OrderStatus::Pending, OrderStatus::Confirmed)
                    | (OrderStatus::Pending, OrderStatus::Cancelled)
                    | (OrderStatus::Confirmed, OrderStatus::Shipped)
                    | (OrderStatus::Confirmed, OrderStatus::Cancelled)
                    | (OrderStatus::Shipped, OrderStatus::Delivered)
            ),
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

/// How strictly [`OrderStatus`] transitions are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Forward-only lifecycle.
    Strict,
    /// Any known status may follow any other.
    Permissive,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        TransitionPolicy::Strict
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Settlement state of a single payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// `pending → completed | failed`; both outcomes are final.
    pub const fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
        )
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A durable order: header plus its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Unique, human-referenceable business key.
    pub order_number: String,
    pub status: OrderStatus,
    /// Σ item.total_price_cents at creation (frozen).
    pub total_amount_cents: i64,
    pub shipping_address: String,
    pub billing_address: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Line items in insertion order.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Returns the frozen total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses snapshot pattern to freeze the price at time of purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: OrderId,
    /// Weak reference into the catalog.
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price in cents at time of order (frozen).
    pub unit_price_cents: i64,
    /// quantity × unit price.
    pub total_price_cents: i64,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// One settlement attempt for an order.
/// Re-processing creates a new row; rows are only mutated by status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    /// Free-form method ("card", "cod", ...).
    pub payment_method: String,
    pub status: PaymentStatus,
    /// Amount in cents; equals the order total.
    pub amount_cents: i64,
    /// External reference, set on completion.
    pub transaction_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One product-quantity pair requested at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// A checkout request as received from the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub shipping_address: String,
    pub billing_address: String,
}

// =============================================================================
// Cart
// =============================================================================

/// A product parked in a user's cart. Not part of order data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartItem {
    pub id: i64,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A cart item priced at the current catalog price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub item: CartItem,
    pub unit_price: Money,
    pub line_total: Money,
}

/// The whole cart with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total_items: i64,
    pub total_price: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_parse() {
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("cancelled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);

        let err = "bogus".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, CoreError::InvalidStatus("bogus".to_string()));

        // Case-sensitive, like the stored values
        assert!("Pending".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_serde_matches_storage_spelling() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_strict_lifecycle() {
        use OrderStatus::*;
        let strict = TransitionPolicy::Strict;

        assert!(Pending.can_transition_to(Confirmed, strict));
        assert!(Pending.can_transition_to(Cancelled, strict));
        assert!(Confirmed.can_transition_to(Shipped, strict));
        assert!(Confirmed.can_transition_to(Cancelled, strict));
        assert!(Shipped.can_transition_to(Delivered, strict));

        assert!(!Pending.can_transition_to(Shipped, strict));
        assert!(!Shipped.can_transition_to(Cancelled, strict));
        assert!(!Delivered.can_transition_to(Pending, strict));
        assert!(!Cancelled.can_transition_to(Confirmed, strict));

        // Re-applying the current status is a no-op
        assert!(Delivered.can_transition_to(Delivered, strict));
    }

    #[test]
    fn test_permissive_lifecycle() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert!(from.can_transition_to(to, TransitionPolicy::Permissive));
            }
        }
    }

    #[test]
    fn test_payment_state_machine() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Failed));
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Failed));
        assert!(!PaymentStatus::Failed.can_transition_to(PaymentStatus::Completed));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert_eq!(TransitionPolicy::default(), TransitionPolicy::Strict);
    }
}
