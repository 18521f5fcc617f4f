//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Kinds of Repository Method                       │
//! │                                                                         │
//! │  Pool-backed (reads, single-statement writes)                          │
//! │       db.orders().list_for_user(42)                                    │
//! │       db.carts().add(42, product_id, 1)                                │
//! │                                                                         │
//! │  Connection-backed (building blocks for one transaction)               │
//! │       let mut tx = db.begin().await?;                                  │
//! │       db.orders().next_order_number(&mut tx)                           │
//! │       db.products().reserve_stock(&mut tx, product_id, qty)            │
//! │       db.payments().insert_pending(&mut tx, order_id, "card", total)   │
//! │       commit(tx)                                                       │
//! │                                                                         │
//! │  SQL lives only here; the service layer picks the transaction scope.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog lookups and stock reservation
//! - [`OrderRepository`](order::OrderRepository) - Orders, items, order numbers, status
//! - [`PaymentRepository`](payment::PaymentRepository) - Settlement attempts
//! - [`CartRepository`](cart::CartRepository) - Per-user cart rows

pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
