//! Integration tests for order timeline reconstruction.
//!
//! Decodes order documents the way they land in the store and checks the
//! derived timeline, including its serialized display shape.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use helper_buddy_marketplace::models::Order;
use helper_buddy_marketplace::timeline::{EventCategory, reconstruct};

fn order_from(value: serde_json::Value) -> Order {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_stored_order_to_timeline() {
    let order = order_from(json!({
        "status": "completed",
        "providerResponses": {
            "prov-1": {"status": "accepted", "updatedAt": "2025-06-01T11:00:00Z"},
            "prov-2": {"status": "rejected", "updatedAt": "2025-06-01T10:30:00Z"},
        },
        "createdAt": "2025-06-01T10:00:00Z",
        "updatedAt": "2025-06-01T14:00:00Z",
        "deliveryDate": "2025-06-02",
        "deliveryTime": "10:00 AM",
    }));

    let events = reconstruct(&order);
    let categories: Vec<_> = events.iter().map(|e| e.category).collect();
    assert_eq!(
        categories,
        vec![
            EventCategory::Created,
            EventCategory::Accepted,
            EventCategory::Completed,
        ]
    );
    assert_eq!(
        events[0].description,
        "Service requested for 2025-06-02 at 10:00 AM"
    );
    // The rejected provider contributes nothing.
    assert!(events.iter().all(|e| !e.description.contains("prov-2")));
}

#[test]
fn test_fresh_order_has_single_event() {
    let order = order_from(json!({
        "status": "pending",
        "createdAt": "2025-06-01T10:00:00Z",
        "updatedAt": "2025-06-01T10:00:00Z",
    }));

    let events = reconstruct(&order);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].category, EventCategory::Created);
    assert_eq!(events[0].description, "Service requested");
}

#[test]
fn test_timeline_serializes_for_display() {
    let order = order_from(json!({
        "status": "cancelled",
        "createdAt": "2025-06-01T10:00:00Z",
        "updatedAt": "2025-06-01T12:00:00Z",
    }));

    let events = reconstruct(&order);
    let rendered = serde_json::to_value(&events).unwrap();
    assert_eq!(rendered[0]["category"], json!("created"));
    assert_eq!(rendered[1]["category"], json!("cancelled"));
    assert_eq!(rendered[1]["at"], json!("2025-06-01T12:00:00Z"));
    assert_eq!(rendered[1]["title"], json!("Order cancelled"));
}
