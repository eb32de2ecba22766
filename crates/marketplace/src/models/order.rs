//! Order document model.
//!
//! Orders are written by the booking flow (out of scope here); this crate
//! only reads them to reconstruct display timelines, so the model covers the
//! stored fields the reconstructor consumes.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use helper_buddy_core::{OrderStatus, ProviderId, ProviderResponseStatus};

/// One provider's answer to an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    /// Accept/reject state.
    pub status: ProviderResponseStatus,
    /// When the provider last touched the response.
    pub updated_at: DateTime<Utc>,
}

/// A service order, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Per-provider responses, keyed by provider ID.
    #[serde(default)]
    pub provider_responses: BTreeMap<ProviderId, ProviderResponse>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Stamped on every status change.
    pub updated_at: DateTime<Utc>,
    /// Requested delivery date, if the customer picked one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    /// Requested delivery time slot label, if the customer picked one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
}
