//! # Stock Guard
//!
//! Availability check shared by cart mutation and order creation.
//!
//! ```text
//! check_availability(product, qty)
//!      │
//!      ├── id does not resolve?      → ProductNotFound
//!      ├── is_active == false?       → ProductUnavailable
//!      ├── stock_quantity < qty?     → InsufficientStock
//!      └── OK
//! ```
//!
//! The guard only reads. Reservation happens in the database layer as a
//! conditional decrement inside the order-creation transaction, so a passing
//! check here is advisory until that transaction commits.

use crate::catalog::CatalogLookup;
use crate::error::{CoreError, CoreResult};
use crate::types::{CatalogProduct, ProductId};

/// Checks that `requested` units of `product_id` can be sold right now.
pub fn check_availability<C: CatalogLookup + ?Sized>(
    catalog: &C,
    product_id: ProductId,
    requested: i64,
) -> CoreResult<()> {
    let product = catalog
        .get_product(product_id)
        .ok_or(CoreError::ProductNotFound(product_id))?;

    check_product(product, requested)
}

/// Same as [`check_availability`] for an already-resolved product.
pub fn check_product(product: &CatalogProduct, requested: i64) -> CoreResult<()> {
    if !product.is_active {
        return Err(CoreError::ProductUnavailable {
            product_id: product.id,
        });
    }

    if product.stock_quantity < requested {
        return Err(CoreError::InsufficientStock {
            product_id: product.id,
            available: product.stock_quantity,
            requested,
        });
    }

    Ok(())
}
