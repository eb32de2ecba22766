//! Cart document model.
//!
//! One cart document exists per user, keyed by the user ID. Carts are never
//! deleted; emptying one leaves an empty `items` array behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use helper_buddy_core::{Price, ProviderId, Quantity, ServiceId};

/// A service the UI wants to put in the cart.
///
/// Quantity is not part of the draft: a first add always lands at quantity
/// one, and repeat adds increment the existing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    /// Service identity; also the line identity within the cart.
    pub id: ServiceId,
    /// Display name captured at add time.
    pub name: String,
    /// Unit price captured at add time.
    pub price: Price,
    /// Image shown next to the line.
    pub image_url: String,
    /// Chosen provider, when the customer picked one up front.
    pub service_provider: Option<ProviderId>,
}

/// One line of a cart.
///
/// Line identity is the service ID; the cart invariant guarantees no two
/// lines share one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Service identity.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Quantity, 1..=99 by construction.
    pub quantity: Quantity,
    /// Image URL.
    pub image_url: String,
    /// Chosen provider, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<ProviderId>,
    /// When the line first entered the cart.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Build the initial line for a drafted item, at quantity one.
    #[must_use]
    pub fn first(item: &NewCartItem, added_at: DateTime<Utc>) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: Quantity::ONE,
            image_url: item.image_url.clone(),
            service_provider: item.service_provider.clone(),
            added_at,
        }
    }
}

/// A user's cart document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Ordered lines; no two lines share a service ID.
    #[serde(default)]
    pub items: Vec<CartLine>,
    /// Stamped on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// An empty cart stamped at `now`.
    #[must_use]
    pub const fn empty(now: DateTime<Utc>) -> Self {
        Self {
            items: Vec::new(),
            updated_at: now,
        }
    }

    /// Find a line by service ID.
    #[must_use]
    pub fn line(&self, service: &ServiceId) -> Option<&CartLine> {
        self.items.iter().find(|line| &line.id == service)
    }

    /// Find a line by service ID, mutably.
    pub fn line_mut(&mut self, service: &ServiceId) -> Option<&mut CartLine> {
        self.items.iter_mut().find(|line| &line.id == service)
    }

    /// Drop the line with the given service ID, if present.
    ///
    /// Returns whether a line was removed.
    pub fn remove_line(&mut self, service: &ServiceId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.id != service);
        self.items.len() != before
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn draft() -> NewCartItem {
        NewCartItem {
            id: ServiceId::new("svc-milk"),
            name: "Milk Delivery".to_owned(),
            price: Price::new(Decimal::new(4500, 2)).unwrap(),
            image_url: "https://img.example/milk.jpg".to_owned(),
            service_provider: None,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_first_line_starts_at_one() {
        let line = CartLine::first(&draft(), now());
        assert_eq!(line.quantity, Quantity::ONE);
        assert_eq!(line.added_at, now());
    }

    #[test]
    fn test_remove_line_reports_removal() {
        let mut cart = Cart::empty(now());
        cart.items.push(CartLine::first(&draft(), now()));

        assert!(cart.remove_line(&ServiceId::new("svc-milk")));
        assert!(!cart.remove_line(&ServiceId::new("svc-milk")));
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_document_shape_is_camel_case() {
        let mut cart = Cart::empty(now());
        cart.items.push(CartLine::first(&draft(), now()));

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            value["items"][0]["imageUrl"],
            json!("https://img.example/milk.jpg")
        );
        assert_eq!(value["items"][0]["addedAt"], json!("2025-06-01T10:00:00Z"));
        assert!(value["updatedAt"].is_string());
        // Unpicked provider is omitted, not stored as null.
        assert!(value["items"][0].get("serviceProvider").is_none());
    }

    #[test]
    fn test_decode_rejects_zero_quantity() {
        let stored = json!({
            "items": [{
                "id": "svc-milk",
                "name": "Milk Delivery",
                "price": "45.00",
                "quantity": 0,
                "imageUrl": "x",
                "addedAt": "2025-06-01T10:00:00Z",
            }],
            "updatedAt": "2025-06-01T10:00:00Z",
        });
        let decoded: Result<Cart, _> = serde_json::from_value(stored);
        assert!(decoded.is_err());
    }
}
