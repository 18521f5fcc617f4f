//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Malformed input                                │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError          - Storage / transaction failures                 │
//! │                                                                         │
//! │  storefront-orders errors                                              │
//! │  └── ServiceError     - Classified for the HTTP layer                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                           DbError ──┴→ ServiceError → ErrorResponse    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::{OrderId, OrderStatus, ProductId};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant carries enough context for the client to retry differently
/// (which product, how much stock, which status).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A referenced product id does not resolve in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The product exists but is not active for sale.
    #[error("Product {product_id} is not available")]
    ProductUnavailable { product_id: ProductId },

    /// Requested quantity exceeds the stock on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (qty: 6)
    ///      │
    ///      ▼
    /// Check stock: available=5
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// Client shows: "Only 5 left in stock"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The requester does not own the order.
    ///
    /// Kept distinct from [`CoreError::OrderNotFound`] so the HTTP layer can
    /// answer 403 rather than 404.
    #[error("Unauthorized access to order {order_id}")]
    Unauthorized { order_id: OrderId },

    /// Status value outside the known set.
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    /// The lifecycle does not allow moving between these two statuses.
    #[error("Order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Payment was requested for an order that is no longer awaiting one.
    #[error("Order {order_id} is {status} and cannot be paid")]
    OrderNotPayable {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// The order changed underneath a status update (concurrent writer).
    #[error("Order {order_id} was modified concurrently, retry the request")]
    ConcurrentModification { order_id: OrderId },

    /// The product is not in the user's cart.
    #[error("Product {product_id} is not in the cart")]
    CartItemNotFound { product_id: ProductId },

    /// A money computation left the representable range.
    #[error("Amount overflow while pricing product {product_id}")]
    AmountOverflow { product_id: ProductId },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
