//! Integration tests for the cart ledger.
//!
//! Exercises the full add/adjust/remove lifecycle against the in-memory
//! store, including the stored document shape other services read.

#![allow(clippy::unwrap_used)]

use chrono::TimeDelta;
use rust_decimal::Decimal;
use serde_json::json;

use helper_buddy_core::{Price, ProviderId, Quantity, ServiceId, UserId};
use helper_buddy_integration_tests::TestContext;
use helper_buddy_marketplace::CartLedger;
use helper_buddy_marketplace::models::NewCartItem;

fn item(id: &str, name: &str) -> NewCartItem {
    NewCartItem {
        id: ServiceId::new(id),
        name: name.to_owned(),
        price: Price::new(Decimal::new(4500, 2)).unwrap(),
        image_url: format!("https://img.example/{id}.jpg"),
        service_provider: None,
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_add_adjust_remove_lifecycle() {
    let ctx = TestContext::new();
    let ledger = CartLedger::new(&ctx.store, &ctx.clock);
    let user = UserId::new("user-1");

    // First add creates the cart at quantity one.
    let cart = ledger.add_item(&user, &item("svc-milk", "Milk Delivery")).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, Quantity::ONE);
    assert_eq!(cart.updated_at, TestContext::start());

    // Repeat add merges into the existing line.
    ctx.clock.advance(TimeDelta::minutes(1));
    let cart = ledger.add_item(&user, &item("svc-milk", "Milk Delivery")).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity.get(), 2);
    assert_eq!(cart.updated_at, TestContext::start() + TimeDelta::minutes(1));
    // addedAt keeps the original instant.
    assert_eq!(cart.items[0].added_at, TestContext::start());

    // A different service appends a second line.
    let cart = ledger.add_item(&user, &item("svc-clean", "House Cleaning")).await.unwrap();
    assert_eq!(cart.items.len(), 2);

    // Direct quantity set.
    let cart = ledger
        .update_quantity(&user, &ServiceId::new("svc-milk"), 5)
        .await
        .unwrap();
    assert_eq!(cart.line(&ServiceId::new("svc-milk")).unwrap().quantity.get(), 5);

    // Zero routes through removal.
    let cart = ledger
        .update_quantity(&user, &ServiceId::new("svc-milk"), 0)
        .await
        .unwrap();
    assert!(cart.line(&ServiceId::new("svc-milk")).is_none());
    assert_eq!(cart.items.len(), 1);

    // Explicit removal empties the cart but keeps the document.
    let cart = ledger
        .remove_item(&user, &ServiceId::new("svc-clean"))
        .await
        .unwrap();
    assert!(cart.items.is_empty());
    let stored = ctx.fetch("carts", "user-1").await;
    assert_eq!(stored["items"], json!([]));
}

#[tokio::test]
async fn test_carts_are_isolated_per_user() {
    let ctx = TestContext::new();
    let ledger = CartLedger::new(&ctx.store, &ctx.clock);

    ledger
        .add_item(&UserId::new("alice"), &item("svc-milk", "Milk Delivery"))
        .await
        .unwrap();
    ledger
        .add_item(&UserId::new("bob"), &item("svc-clean", "House Cleaning"))
        .await
        .unwrap();

    let alice = ledger.items(&UserId::new("alice")).await.unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].id, ServiceId::new("svc-milk"));

    let bob = ledger.items(&UserId::new("bob")).await.unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].id, ServiceId::new("svc-clean"));
}

#[tokio::test]
async fn test_items_for_unknown_user_is_empty() {
    let ctx = TestContext::new();
    let ledger = CartLedger::new(&ctx.store, &ctx.clock);

    let items = ledger.items(&UserId::new("nobody")).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(ctx.store.len(), 0);
}

// ============================================================================
// Stored document shape
// ============================================================================

#[tokio::test]
async fn test_stored_cart_is_camel_case() {
    let ctx = TestContext::new();
    let ledger = CartLedger::new(&ctx.store, &ctx.clock);
    let mut draft = item("svc-milk", "Milk Delivery");
    draft.service_provider = Some(ProviderId::new("prov-7"));

    ledger.add_item(&UserId::new("user-1"), &draft).await.unwrap();

    let stored = ctx.fetch("carts", "user-1").await;
    let line = &stored["items"][0];
    assert_eq!(line["id"], json!("svc-milk"));
    assert_eq!(line["price"], json!("45.00"));
    assert_eq!(line["quantity"], json!(1));
    assert_eq!(line["imageUrl"], json!("https://img.example/svc-milk.jpg"));
    assert_eq!(line["serviceProvider"], json!("prov-7"));
    assert_eq!(line["addedAt"], json!("2025-06-01T10:00:00Z"));
    assert_eq!(stored["updatedAt"], json!("2025-06-01T10:00:00Z"));
}

#[tokio::test]
async fn test_reads_cart_written_by_another_service() {
    let ctx = TestContext::new();
    ctx.seed(
        "carts",
        "user-1",
        json!({
            "items": [{
                "id": "svc-milk",
                "name": "Milk Delivery",
                "price": "45.00",
                "quantity": 3,
                "imageUrl": "https://img.example/svc-milk.jpg",
                "addedAt": "2025-05-30T08:00:00Z",
            }],
            "updatedAt": "2025-05-30T08:00:00Z",
        }),
    )
    .await;

    let ledger = CartLedger::new(&ctx.store, &ctx.clock);
    let cart = ledger
        .add_item(&UserId::new("user-1"), &item("svc-milk", "Milk Delivery"))
        .await
        .unwrap();
    assert_eq!(cart.items[0].quantity.get(), 4);
}
