//! # storefront-core: Pure Business Logic for Storefront Orders
//!
//! This crate holds every rule of the order-fulfillment core that can be
//! expressed without touching storage: money, pricing, stock checks, and the
//! order/payment state machines.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Orders Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              HTTP layer (out of tree)                           │   │
//! │  │    POST /orders, GET /orders/{id}, POST /payments, ...          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               storefront-orders (services)                      │   │
//! │  │    Checkout, OrderLedger, PaymentProcessor, CartService         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ storefront-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │   stock   │  │   │
//! │  │   │  Order    │  │   Money   │  │ OrderDraft│  │   guard   │  │   │
//! │  │   │  Payment  │  │  (cents)  │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Database Layer)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, OrderItem, Payment, CartItem, statuses)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - The catalog lookup seam and an in-memory snapshot of it
//! - [`pricing`] - Pricing & Line-Item Builder (`build_order`)
//! - [`stock`] - Stock Guard (`check_availability`)
//! - [`numbering`] - Order number formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::catalog::CatalogSnapshot;
//! use storefront_core::pricing::build_order;
//! use storefront_core::{CatalogProduct, CreateOrderRequest, OrderLineRequest};
//!
//! let catalog: CatalogSnapshot = vec![CatalogProduct::new(1, "Mug", 1000, 5)]
//!     .into_iter()
//!     .collect();
//!
//! let request = CreateOrderRequest {
//!     items: vec![OrderLineRequest { product_id: 1, quantity: 3 }],
//!     shipping_address: "1 Main St".to_string(),
//!     billing_address: "1 Main St".to_string(),
//! };
//!
//! let draft = build_order(&catalog, 42, &request).unwrap();
//! assert_eq!(draft.total_amount.cents(), 3000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod numbering;
pub mod pricing;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CatalogLookup, CatalogSnapshot};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{DraftLine, OrderDraft};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single order.
///
/// ## Business Reason
/// Keeps a single order-creation transaction bounded.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Prefix of every human-facing order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD";
