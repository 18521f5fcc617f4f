//! Concurrent checkouts and payments must never oversell stock or settle an
//! order twice.

mod common;

use storefront_core::{CoreError, OrderStatus};
use storefront_orders::ServiceError;

use common::{request, TestStore};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_unit_is_sold_once() {
    let t = TestStore::new().await;
    let id = t.product("LAST", 1000, 1).await.id;

    let a = t.store.checkout();
    let b = t.store.checkout();
    let (first, second) = tokio::join!(
        tokio::spawn(async move { a.place_order(1, &request(&[(id, 1)])).await }),
        tokio::spawn(async move { b.place_order(2, &request(&[(id, 1)])).await }),
    );
    let results = [first.unwrap(), second.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(ServiceError::Domain(CoreError::InsufficientStock { .. }))
    )));
    assert_eq!(t.stock(id).await, 0);
    assert_eq!(t.store.ledger().list_all_orders().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pooled_connections_do_not_oversell() {
    let t = TestStore::file_backed(4).await;
    let id = t.product("SCARCE", 500, 3).await.id;

    let tasks: Vec<_> = (0..8)
        .map(|user| {
            let checkout = t.store.checkout();
            tokio::spawn(async move { checkout.place_order(user, &request(&[(id, 1)])).await })
        })
        .collect();

    let mut sold = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => sold += 1,
            Err(err) => assert!(
                matches!(err, ServiceError::Domain(CoreError::InsufficientStock { .. })),
                "unexpected error: {err}"
            ),
        }
    }

    assert_eq!(sold, 3);
    assert_eq!(t.stock(id).await, 0);
    assert_eq!(t.store.ledger().list_all_orders().await.unwrap().len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn order_is_settled_once() {
    let t = TestStore::file_backed(4).await;
    let p = t.product("P", 1000, 5).await;
    let order_id = t.store.checkout().place_order(1, &request(&[(p.id, 1)])).await.unwrap().id;

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let payments = t.store.payments();
            tokio::spawn(async move { payments.process_payment(order_id, "card").await })
        })
        .collect();

    let mut settled = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            settled += 1;
        }
    }

    assert_eq!(settled, 1);
    assert_eq!(t.store.payments().payments_for_order(order_id).await.unwrap().len(), 1);
    assert_eq!(
        t.store.ledger().get_order(order_id, 1).await.unwrap().status,
        OrderStatus::Confirmed
    );
}

#[tokio::test]
async fn stale_snapshot_is_caught_by_reservation() {
    let t = TestStore::new().await;
    let p = t.product("P", 1000, 2).await;

    // Price and check against a snapshot, then lose the stock before writing.
    let catalog = t.store.database().products().load_catalog(&[p.id]).await.unwrap();
    let draft = storefront_core::pricing::build_order(&catalog, 1, &request(&[(p.id, 2)])).unwrap();
    t.store.checkout().place_order(2, &request(&[(p.id, 1)])).await.unwrap();

    let err = t.store.ledger().create_order(&draft).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(CoreError::InsufficientStock {
            available: 1,
            requested: 2,
            ..
        })
    ));
    assert_eq!(t.stock(p.id).await, 1);
    assert!(t.store.ledger().list_orders_for_user(1).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn creation_time_follows_order_number() {
    let t = TestStore::file_backed(4).await;
    let id = t.product("BULK", 100, 100).await.id;

    let tasks: Vec<_> = (0..12)
        .map(|user| {
            let checkout = t.store.checkout();
            tokio::spawn(async move { checkout.place_order(user, &request(&[(id, 1)])).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let listed: Vec<String> = t
        .store
        .ledger()
        .list_all_orders()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.order_number)
        .collect();
    let mut by_number = listed.clone();
    by_number.sort_by(|a, b| b.cmp(a));

    assert_eq!(listed.len(), 12);
    assert_eq!(listed, by_number);
}
