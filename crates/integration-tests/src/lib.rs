//! Integration tests for Helper Buddy.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p helper-buddy-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flows` - Cart ledger lifecycle tests
//! - `referral_flows` - Referral issuance and redemption tests
//! - `lockout_flows` - Login lockout counter tests
//! - `order_timeline` - Order timeline reconstruction tests
//!
//! Everything runs against the in-memory store and a manual clock; no
//! external services are required.

use chrono::{DateTime, Utc};
use serde_json::Value;

use helper_buddy_marketplace::clock::ManualClock;
use helper_buddy_marketplace::config::MarketplaceConfig;
use helper_buddy_marketplace::store::{DocumentStore, Fields, MemoryStore, SetMode};

/// Shared fixture: a fresh store, a pinned clock, and default policies.
pub struct TestContext {
    pub store: MemoryStore,
    pub clock: ManualClock,
    pub config: MarketplaceConfig,
}

impl TestContext {
    /// A context pinned at a fixed, readable start instant.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded start timestamp fails to parse.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            clock: ManualClock::new(Self::start()),
            config: MarketplaceConfig::default(),
        }
    }

    /// The instant every context starts at.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse.
    #[must_use]
    pub fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T10:00:00Z")
            .expect("valid rfc3339 literal")
            .with_timezone(&Utc)
    }

    /// Seed a raw document, replacing anything already stored.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a JSON object or the write fails.
    pub async fn seed(&self, collection: &str, id: &str, value: Value) {
        self.store
            .set(collection, id, as_fields(value), SetMode::Replace)
            .await
            .expect("seed write");
    }

    /// Read a stored document back as a JSON value.
    ///
    /// # Panics
    ///
    /// Panics if the document does not exist or the read fails.
    pub async fn fetch(&self, collection: &str, id: &str) -> Value {
        let doc = self
            .store
            .get(collection, id)
            .await
            .expect("fetch read")
            .expect("document exists");
        Value::Object(doc.fields)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unwrap a JSON value into a document field map.
///
/// # Panics
///
/// Panics if `value` is not a JSON object.
#[must_use]
pub fn as_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
