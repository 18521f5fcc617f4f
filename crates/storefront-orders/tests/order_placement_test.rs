mod common;

use std::collections::HashSet;

use storefront_core::{CoreError, Money, OrderStatus};
use storefront_orders::{ErrorKind, ServiceError};

use common::{request, TestStore, ADDRESS};

#[tokio::test]
async fn quantity_three_at_ten_dollars() {
    let t = TestStore::new().await;
    let p = t.product("P", 1000, 5).await;

    let order = t.store.checkout().place_order(1, &request(&[(p.id, 3)])).await.unwrap();

    assert_eq!(order.total_amount(), Money::from_major_minor(30, 0));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].unit_price_cents, 1000);
    assert_eq!(order.items[0].total_price_cents, 3000);
    assert_eq!(order.shipping_address, ADDRESS);
    assert_eq!(t.stock(p.id).await, 2);
}

#[tokio::test]
async fn total_is_exact_sum_of_items() {
    let t = TestStore::new().await;
    let prices = [1, 10, 33, 99, 333, 1999, 4999, 12_345];

    let mut lines = Vec::new();
    let mut expected = 0;
    for (i, price) in prices.iter().enumerate() {
        let p = t.product(&format!("SKU-{i}"), *price, 1000).await;
        let qty = (i as i64) * 7 + 3;
        expected += price * qty;
        lines.push((p.id, qty));
    }

    let order = t.store.checkout().place_order(1, &request(&lines)).await.unwrap();

    let items_sum: i64 = order.items.iter().map(|item| item.total_price_cents).sum();
    assert_eq!(order.items.len(), prices.len());
    assert_eq!(order.total_amount_cents, items_sum);
    assert_eq!(order.total_amount_cents, expected);
    for item in &order.items {
        assert_eq!(item.total_price_cents, item.unit_price_cents * item.quantity);
    }
}

#[tokio::test]
async fn unknown_product_creates_nothing() {
    let t = TestStore::new().await;
    let ledger = t.store.ledger();
    let before = ledger.list_orders_for_user(1).await.unwrap();

    let err = t
        .store
        .checkout()
        .place_order(1, &request(&[(999, 1)]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Domain(CoreError::ProductNotFound(999))));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(ledger.list_orders_for_user(1).await.unwrap(), before);
    assert!(ledger.list_all_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn quantity_above_stock_creates_nothing() {
    let t = TestStore::new().await;
    let p = t.product("P", 1000, 5).await;

    let err = t
        .store
        .checkout()
        .place_order(1, &request(&[(p.id, 6)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(CoreError::InsufficientStock {
            available: 5,
            requested: 6,
            ..
        })
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.kind().http_status(), 409);
    assert!(t.store.ledger().list_all_orders().await.unwrap().is_empty());
    assert_eq!(t.stock(p.id).await, 5);
}

#[tokio::test]
async fn inactive_product_is_unavailable() {
    let t = TestStore::new().await;
    let p = t.product("P", 1000, 5).await;
    t.store.database().products().set_active(p.id, false).await.unwrap();

    let err = t
        .store
        .checkout()
        .place_order(1, &request(&[(p.id, 1)]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Domain(CoreError::ProductUnavailable { .. })));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn malformed_requests_are_validation_errors() {
    let t = TestStore::new().await;
    let p = t.product("P", 1000, 5).await;
    let checkout = t.store.checkout();

    let mut blank_address = request(&[(p.id, 1)]);
    blank_address.shipping_address = "   ".to_string();

    for bad in [request(&[]), request(&[(p.id, 0)]), request(&[(p.id, -2)]), blank_address] {
        let err = checkout.place_order(1, &bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{err}");
    }

    assert_eq!(t.stock(p.id).await, 5);
}

#[tokio::test]
async fn line_prices_are_frozen_at_creation() {
    let t = TestStore::new().await;
    let p = t.product("P", 1000, 5).await;
    let order = t.store.checkout().place_order(1, &request(&[(p.id, 2)])).await.unwrap();

    t.store.database().products().set_price(p.id, 1500).await.unwrap();

    let stored = t.store.ledger().get_order(order.id, 1).await.unwrap();
    assert_eq!(stored.total_amount_cents, 2000);
    assert_eq!(stored.items[0].unit_price_cents, 1000);

    let next = t.store.checkout().place_order(1, &request(&[(p.id, 1)])).await.unwrap();
    assert_eq!(next.total_amount_cents, 1500);
}

#[tokio::test]
async fn listing_is_stable_and_newest_first() {
    let t = TestStore::new().await;
    let p = t.product("P", 250, 100).await;
    let checkout = t.store.checkout();

    let mut placed = Vec::new();
    for qty in 1..=5 {
        placed.push(checkout.place_order(1, &request(&[(p.id, qty)])).await.unwrap().id);
    }
    checkout.place_order(2, &request(&[(p.id, 1)])).await.unwrap();

    let ledger = t.store.ledger();
    let first = ledger.list_orders_for_user(1).await.unwrap();
    let second = ledger.list_orders_for_user(1).await.unwrap();

    assert_eq!(first, second);
    placed.reverse();
    assert_eq!(first.iter().map(|o| o.id).collect::<Vec<_>>(), placed);

    let numbers: HashSet<String> = ledger
        .list_all_orders()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.order_number)
        .collect();
    assert_eq!(numbers.len(), 6);
    assert!(numbers.iter().all(|n| n.starts_with("ORD-") && n.len() == "ORD-YYYYMMDD-NNNNNN".len()));
}

#[tokio::test]
async fn orders_are_private_to_their_owner() {
    let t = TestStore::new().await;
    let p = t.product("P", 1000, 5).await;
    let order = t.store.checkout().place_order(1, &request(&[(p.id, 1)])).await.unwrap();

    let ledger = t.store.ledger();
    assert_eq!(ledger.get_order(order.id, 1).await.unwrap().id, order.id);

    let err = ledger.get_order(order.id, 2).await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(CoreError::Unauthorized { .. })));
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let missing = ledger.get_order(order.id + 100, 2).await.unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
}
