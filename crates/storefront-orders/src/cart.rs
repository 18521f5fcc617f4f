//! # Cart Service
//!
//! Per-user carts gated by the stock guard, and checkout of a cart into an
//! order.
//!
//! Cart quantities are checked against stock when they change, never
//! reserved. The reservation happens when the cart is checked out.

use tracing::{info, warn};

use storefront_core::stock::check_availability;
use storefront_core::validation::validate_quantity;
use storefront_core::{
    CartItem, CartLine, CartSummary, CatalogLookup, CoreError, CreateOrderRequest, Money, Order,
    OrderLineRequest, ProductId, UserId,
};
use storefront_db::Database;

use crate::checkout::Checkout;
use crate::error::ServiceResult;

/// Cart operations for authenticated users.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
    checkout: Checkout,
}

impl CartService {
    pub fn new(db: Database, checkout: Checkout) -> Self {
        CartService { db, checkout }
    }

    /// Adds `quantity` units to the cart.
    ///
    /// Stock is checked against the quantity the cart will hold afterwards,
    /// not just the units being added.
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> ServiceResult<CartItem> {
        validate_quantity(quantity)?;

        let carts = self.db.carts();
        let in_cart = carts
            .get(user_id, product_id)
            .await?
            .map_or(0, |item| item.quantity);
        let wanted = in_cart + quantity;
        validate_quantity(wanted)?;

        self.check_stock(product_id, wanted).await?;

        let item = carts.add(user_id, product_id, quantity).await?;
        info!(user_id, product_id, quantity = item.quantity, "Cart item added");
        Ok(item)
    }

    /// Replaces the quantity of a product already in the cart.
    pub async fn update_cart_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> ServiceResult<CartItem> {
        validate_quantity(quantity)?;
        self.check_stock(product_id, quantity).await?;

        let item = self
            .db
            .carts()
            .set_quantity(user_id, product_id, quantity)
            .await?
            .ok_or(CoreError::CartItemNotFound { product_id })?;

        info!(user_id, product_id, quantity, "Cart item updated");
        Ok(item)
    }

    /// Removes a product from the cart.
    pub async fn remove_from_cart(&self, user_id: UserId, product_id: ProductId) -> ServiceResult<()> {
        if !self.db.carts().remove(user_id, product_id).await? {
            return Err(CoreError::CartItemNotFound { product_id }.into());
        }

        info!(user_id, product_id, "Cart item removed");
        Ok(())
    }

    /// Empties the cart. Returns how many products were removed.
    pub async fn clear_cart(&self, user_id: UserId) -> ServiceResult<u64> {
        Ok(self.db.carts().clear(user_id).await?)
    }

    /// The cart priced at current catalog prices.
    ///
    /// Products that no longer exist are left out of the summary.
    pub async fn get_cart(&self, user_id: UserId) -> ServiceResult<CartSummary> {
        let items = self.db.carts().list_for_user(user_id).await?;
        let ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
        let catalog = self.db.products().load_catalog(&ids).await?;

        let mut lines = Vec::with_capacity(items.len());
        let mut total_items = 0;
        let mut total_price = Money::zero();

        for item in items {
            let Some(product) = catalog.get_product(item.product_id) else {
                warn!(user_id, product_id = item.product_id, "Cart refers to a missing product");
                continue;
            };

            let overflow = || CoreError::AmountOverflow {
                product_id: item.product_id,
            };
            let unit_price = product.price();
            let line_total = unit_price
                .checked_multiply_quantity(item.quantity)
                .ok_or_else(overflow)?;
            total_price = total_price.checked_add(line_total).ok_or_else(overflow)?;
            total_items += item.quantity;

            lines.push(CartLine {
                item,
                unit_price,
                line_total,
            });
        }

        Ok(CartSummary {
            lines,
            total_items,
            total_price,
        })
    }

    /// Places an order for everything in the cart, then empties it.
    ///
    /// Emptying the cart is a separate step: if it fails the order stands
    /// and the failure is only logged.
    pub async fn checkout(
        &self,
        user_id: UserId,
        shipping_address: &str,
        billing_address: &str,
    ) -> ServiceResult<Order> {
        let items = self.db.carts().list_for_user(user_id).await?;

        let request = CreateOrderRequest {
            items: items
                .iter()
                .map(|item| OrderLineRequest {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
            shipping_address: shipping_address.to_string(),
            billing_address: billing_address.to_string(),
        };

        let order = self.checkout.place_order(user_id, &request).await?;

        if let Err(err) = self.db.carts().clear(user_id).await {
            warn!(user_id, order_id = order.id, error = %err, "Order placed but cart not cleared");
        }

        Ok(order)
    }

    async fn check_stock(&self, product_id: ProductId, quantity: i64) -> ServiceResult<()> {
        let catalog = self.db.products().load_catalog(&[product_id]).await?;

        check_availability(&catalog, product_id, quantity).map_err(|err| {
            warn!(product_id, quantity, error = %err, "Cart change refused");
            err.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::OrderLedger;
    use crate::ServiceError;
    use storefront_core::TransitionPolicy;
    use storefront_db::{DbConfig, NewProduct};

    async fn service() -> (Database, CartService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ledger = OrderLedger::new(db.clone(), TransitionPolicy::Strict);
        let checkout = Checkout::new(db.clone(), ledger);
        (db.clone(), CartService::new(db, checkout))
    }

    #[tokio::test]
    async fn test_add_checks_cumulative_stock() {
        let (db, carts) = service().await;
        let mug = db
            .products()
            .insert(&NewProduct::new("MUG-1", "Mug", 1000, 5))
            .await
            .unwrap();

        carts.add_to_cart(1, mug.id, 3).await.unwrap();
        let err = carts.add_to_cart(1, mug.id, 3).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Domain(CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            })
        ));
        assert_eq!(carts.add_to_cart(1, mug.id, 2).await.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_update_and_remove_missing_item() {
        let (db, carts) = service().await;
        let mug = db
            .products()
            .insert(&NewProduct::new("MUG-1", "Mug", 1000, 5))
            .await
            .unwrap();

        assert!(matches!(
            carts.update_cart_item(1, mug.id, 2).await.unwrap_err(),
            ServiceError::Domain(CoreError::CartItemNotFound { .. })
        ));
        assert!(matches!(
            carts.remove_from_cart(1, mug.id).await.unwrap_err(),
            ServiceError::Domain(CoreError::CartItemNotFound { .. })
        ));
        assert!(matches!(
            carts.update_cart_item(1, mug.id, 0).await.unwrap_err(),
            ServiceError::Domain(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_summary_uses_current_price() {
        let (db, carts) = service().await;
        let products = db.products();
        let mug = products
            .insert(&NewProduct::new("MUG-1", "Mug", 1000, 5))
            .await
            .unwrap();
        let pen = products
            .insert(&NewProduct::new("PEN-1", "Pen", 199, 50))
            .await
            .unwrap();

        carts.add_to_cart(1, mug.id, 2).await.unwrap();
        carts.add_to_cart(1, pen.id, 3).await.unwrap();
        products.set_price(mug.id, 1250).await.unwrap();

        let summary = carts.get_cart(1).await.unwrap();
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.total_items, 5);
        assert_eq!(summary.total_price, Money::from_cents(2 * 1250 + 3 * 199));
    }

    #[tokio::test]
    async fn test_checkout_empties_cart() {
        let (db, carts) = service().await;
        let mug = db
            .products()
            .insert(&NewProduct::new("MUG-1", "Mug", 1000, 5))
            .await
            .unwrap();
        carts.add_to_cart(1, mug.id, 2).await.unwrap();

        let order = carts.checkout(1, "1 Main St", "1 Main St").await.unwrap();

        assert_eq!(order.total_amount_cents, 2000);
        assert_eq!(carts.get_cart(1).await.unwrap().lines.len(), 0);
        assert!(matches!(
            carts.checkout(1, "1 Main St", "1 Main St").await.unwrap_err(),
            ServiceError::Domain(CoreError::Validation(_))
        ));
    }
}
