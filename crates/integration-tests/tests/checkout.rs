//! Checkout against a file-backed store.

#![allow(clippy::unwrap_used)]

use tienda_core::{OrderStatus, Price, ProductId};
use tienda_integration_tests::{TestContext, new_order, read_document, test_now};
use tienda_store::{StockPolicy, StoreError, StoreKey};

// ============================================================================
// Order creation
// ============================================================================

#[test]
fn test_checkout_snapshots_price_and_decrements_stock() {
    let mut ctx = TestContext::new().unwrap();
    let shop = ctx.open(StockPolicy::Reject).unwrap();

    let order = shop.orders().create_order(new_order("prod1", 2)).unwrap();
    assert_eq!(order.total, Price::from_units(9000));
    assert_eq!(order.status, OrderStatus::EnEspera);
    assert_eq!(order.product_name, "Smartphone Galaxy S23");
    assert_eq!(order.created_at, test_now());

    let phone = shop
        .catalog()
        .find_product(&ProductId::new("prod1"))
        .unwrap()
        .unwrap();
    assert_eq!(phone.stock, 8);
    assert_eq!(
        shop.orders().find_order(order.id.as_str()).unwrap(),
        Some(order)
    );
}

#[test]
fn test_checkout_writes_both_collections_to_disk() {
    let mut ctx = TestContext::new().unwrap();
    let shop = ctx.open(StockPolicy::Reject).unwrap();
    shop.orders().create_order(new_order("prod3", 1)).unwrap();
    shop.close().unwrap();

    let document = read_document(&ctx.data_path()).unwrap();
    let products: serde_json::Value = serde_json::from_str(
        document[StoreKey::Products.as_str()].as_str().unwrap(),
    )
    .unwrap();
    let orders: serde_json::Value =
        serde_json::from_str(document[StoreKey::Orders.as_str()].as_str().unwrap()).unwrap();

    assert_eq!(products[2]["stock"], 14);
    assert_eq!(orders[0]["productId"], "prod3");
    assert_eq!(orders[0]["status"], "en_espera");
    assert_eq!(orders[0]["customerWhatsApp"], "59170000000");
}

#[test]
fn test_newest_order_first() {
    let mut ctx = TestContext::new().unwrap();
    let shop = ctx.open(StockPolicy::Reject).unwrap();

    let first = shop.orders().create_order(new_order("prod1", 1)).unwrap();
    let second = shop.orders().create_order(new_order("prod2", 1)).unwrap();

    let ids: Vec<_> = shop
        .orders()
        .list_orders()
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

// ============================================================================
// Failure leaves state unchanged
// ============================================================================

#[test]
fn test_unknown_product_changes_nothing() {
    let mut ctx = TestContext::new().unwrap();
    let shop = ctx.open(StockPolicy::Reject).unwrap();
    shop.store().persist_seed().unwrap();
    let before = std::fs::read_to_string(ctx.data_path()).unwrap();

    let err = shop
        .orders()
        .create_order(new_order("prod404", 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::ProductNotFound(_)));

    let after = std::fs::read_to_string(ctx.data_path()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_short_stock_rejected_by_default() {
    let mut ctx = TestContext::new().unwrap();
    let shop = ctx.open(StockPolicy::Reject).unwrap();

    let err = shop
        .orders()
        .create_order(new_order("prod2", 6))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::InsufficientStock {
            requested: 6,
            available: 5,
            ..
        }
    ));
    assert!(shop.orders().list_orders().unwrap().is_empty());
    assert!(!shop.store().is_persisted(StoreKey::Products).unwrap());
}

#[test]
fn test_oversell_policy_allows_negative_stock() {
    let mut ctx = TestContext::new().unwrap();
    let shop = ctx.open(StockPolicy::AllowOversell).unwrap();

    let order = shop.orders().create_order(new_order("prod2", 7)).unwrap();
    assert_eq!(order.total, Price::from_units(8400));

    let coffee = shop
        .catalog()
        .find_product(&ProductId::new("prod2"))
        .unwrap()
        .unwrap();
    assert_eq!(coffee.stock, -2);
}

// ============================================================================
// WhatsApp handoff
// ============================================================================

#[test]
fn test_contact_link_for_reference_order() {
    let mut ctx = TestContext::new().unwrap();
    let shop = ctx.open(StockPolicy::Reject).unwrap();
    let order = shop.orders().create_order(new_order("prod1", 2)).unwrap();

    let link = shop.contact_link(order.id.as_str()).unwrap();
    assert!(link.starts_with("https://wa.me/59170000000?text="));
    assert!(link.contains(order.id.as_str()));
    assert!(link.contains("9000"));
    assert!(link.contains("%2Ftracking%2F"));

    let plain = tienda_core::build_contact_link(&order, "+591 700-00000", "http://localhost:3000/#");
    assert_eq!(plain, link);
}

#[test]
fn test_history_survives_product_edits() {
    let mut ctx = TestContext::new().unwrap();
    let shop = ctx.open(StockPolicy::Reject).unwrap();
    let order = shop.orders().create_order(new_order("prod1", 2)).unwrap();

    let catalog = shop.catalog();
    let mut edit: tienda_store::ProductDraft = catalog
        .find_product(&ProductId::new("prod1"))
        .unwrap()
        .unwrap()
        .into();
    edit.name = "Smartphone Galaxy S24".to_owned();
    edit.price = Price::from_units(5000);
    catalog.save_product(edit).unwrap();
    catalog.delete_product(&ProductId::new("prod1")).unwrap();

    let stored = shop.orders().find_order(order.id.as_str()).unwrap().unwrap();
    assert_eq!(stored.product_name, "Smartphone Galaxy S23");
    assert_eq!(stored.total, Price::from_units(9000));
}
