//! Order Lifecycle Integration Tests
//!
//! Walks an order from cart to history through the public surface, and
//! checks that a file-backed origin survives a full restart.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use rust_decimal_macros::dec;
use serde_json::{Map, json};

use cart_mirror::{
    ActiveOrder, CartItem, FileBackend, ItemId, MemoryBackend, Money, OrderDraft, OriginHub,
    SharedStore,
};

fn store_on(hub: &Arc<OriginHub>) -> SharedStore {
    let ctx = Arc::new(hub.context());
    SharedStore::new(ctx.clone(), ctx)
}

fn cart_item(id: i64, name: &str, price: &str, qty: u64) -> CartItem {
    CartItem {
        id: Some(ItemId::Int(id)),
        name: Some(name.to_string()),
        price: Money::parse_lenient(price),
        qty: Some(qty),
        ..CartItem::default()
    }
}

#[test]
fn checkout_flow_from_cart_to_history() {
    let hub = OriginHub::new(Arc::new(MemoryBackend::new()));
    let store = store_on(&hub);

    store.add_item(cart_item(1, "Espresso", "10.50", 2)).unwrap();
    store.add_item(cart_item(2, "Cornetto", "3", 1)).unwrap();
    assert_eq!(store.total(), Money::new(dec!(24.00)));
    assert_eq!(store.count(), 3);

    // Place the order: history entry plus the active slot.
    let receipt = store
        .add_to_order_history(OrderDraft {
            customer_name: Some("Ada Lovelace".to_string()),
            payment_method: Some("card".to_string()),
            total_amount: Some(store.total()),
            ..OrderDraft::default()
        })
        .unwrap();
    assert_eq!(receipt.order_id, 1);

    store
        .save_active_order(&ActiveOrder {
            status: Some("preparing".to_string()),
            ..ActiveOrder::default()
        })
        .unwrap();
    store.clear_cart().unwrap();

    assert!(store.has_active_order());
    assert!(store.cart().is_empty());

    // The kitchen marks it ready.
    let mut patch = Map::new();
    patch.insert("status".to_string(), json!("ready"));
    let updated = store.update_order(receipt.order_id, &patch).unwrap().unwrap();
    assert_eq!(updated.status.as_deref(), Some("ready"));

    store
        .save_active_order(&ActiveOrder {
            status: Some("ready".to_string()),
            ..ActiveOrder::default()
        })
        .unwrap();
    assert!(!store.has_active_order());

    // The admin dashboard queries.
    assert_eq!(store.search_orders("ada").len(), 1);
    assert_eq!(store.search_orders("").len(), 1);

    let today = cart_mirror::Timestamp::now().local_day();
    assert_eq!(
        store.filter_orders_by_date(Some(today), Some(today)).len(),
        1
    );

    let stats = store.order_stats();
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_revenue, Money::new(dec!(24.00)));
    assert_eq!(stats.avg_order_value, Money::new(dec!(24.00)));
    assert_eq!(stats.today_orders, 1);

    // Cleanup paths.
    store.delete_from_history(receipt.order_id).unwrap();
    assert!(store.order_history().is_empty());
    store.clear_active_order().unwrap();
    assert!(store.active_order().is_none());
}

#[test]
fn second_order_numbers_from_the_existing_maximum() {
    let hub = OriginHub::new(Arc::new(MemoryBackend::new()));
    let store = store_on(&hub);

    let first = store.add_to_order_history(OrderDraft::default()).unwrap();
    let second = store.add_to_order_history(OrderDraft::default()).unwrap();
    assert_eq!(first.order_id, 1);
    assert_eq!(second.order_id, 2);

    store.delete_from_history(1).unwrap();
    let third = store.add_to_order_history(OrderDraft::default()).unwrap();
    assert_eq!(third.order_id, 3);
}

#[test]
fn file_backed_origin_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("origin.json");

    {
        let hub = OriginHub::new(Arc::new(FileBackend::open(&path).unwrap()));
        let store = store_on(&hub);
        store.add_item(cart_item(1, "Espresso", "10.50", 2)).unwrap();
        store
            .add_to_order_history(OrderDraft {
                customer_name: Some("Ada Lovelace".to_string()),
                total_amount: Some(Money::new(dec!(21.00))),
                ..OrderDraft::default()
            })
            .unwrap();
    }

    // A fresh process over the same file sees everything.
    let hub = OriginHub::new(Arc::new(FileBackend::open(&path).unwrap()));
    let store = store_on(&hub);

    assert_eq!(store.count(), 2);
    assert_eq!(store.total(), Money::new(dec!(21.00)));
    assert_eq!(store.order_history().len(), 1);

    let receipt = store.add_to_order_history(OrderDraft::default()).unwrap();
    assert_eq!(receipt.order_id, 2);
}
