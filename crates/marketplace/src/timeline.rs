//! Order timeline reconstruction.
//!
//! Derives a display-ready event sequence from an order's stored status and
//! per-provider response map. Pure function of the [`Order`] value; nothing
//! here touches the store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use helper_buddy_core::{OrderStatus, ProviderResponseStatus};

use crate::models::Order;

/// Kind of lifecycle event a timeline entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// The order was placed.
    Created,
    /// A provider accepted the request.
    Accepted,
    /// The order was marked completed.
    Completed,
    /// The order was cancelled.
    Cancelled,
}

/// One derived, non-persisted entry in an order's display timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// What kind of state change this entry records.
    pub category: EventCategory,
    /// When the state change happened.
    pub at: DateTime<Utc>,
    /// Short display heading.
    pub title: String,
    /// One-line display detail.
    pub description: String,
}

/// Rebuild the chronological event sequence for `order`.
///
/// Always starts with a created event at `createdAt`. Every provider response
/// with accepted status contributes an accepted event at its own `updatedAt`.
/// A terminal completed or cancelled status contributes one closing event at
/// the order's `updatedAt`. The result is sorted ascending by instant; ties
/// keep emission order (created, then accepted, then the closing event).
#[must_use]
pub fn reconstruct(order: &Order) -> Vec<TimelineEvent> {
    let mut events = vec![TimelineEvent {
        category: EventCategory::Created,
        at: order.created_at,
        title: "Order placed".to_owned(),
        description: created_description(order),
    }];

    for (provider, response) in &order.provider_responses {
        if response.status == ProviderResponseStatus::Accepted {
            events.push(TimelineEvent {
                category: EventCategory::Accepted,
                at: response.updated_at,
                title: "Provider accepted".to_owned(),
                description: format!("Provider {provider} accepted your request"),
            });
        }
    }

    match order.status {
        OrderStatus::Completed => events.push(TimelineEvent {
            category: EventCategory::Completed,
            at: order.updated_at,
            title: "Service completed".to_owned(),
            description: "Your service has been completed".to_owned(),
        }),
        OrderStatus::Cancelled => events.push(TimelineEvent {
            category: EventCategory::Cancelled,
            at: order.updated_at,
            title: "Order cancelled".to_owned(),
            description: "This order was cancelled".to_owned(),
        }),
        OrderStatus::Pending
        | OrderStatus::Accepted
        | OrderStatus::Paid
        | OrderStatus::Rejected => {}
    }

    events.sort_by_key(|event| event.at);
    events
}

fn created_description(order: &Order) -> String {
    match (&order.delivery_date, &order.delivery_time) {
        (Some(date), Some(time)) => {
            format!("Service requested for {date} at {time}")
        }
        (Some(date), None) => format!("Service requested for {date}"),
        _ => "Service requested".to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{NaiveDate, TimeDelta};

    use helper_buddy_core::ProviderId;

    use super::*;
    use crate::models::ProviderResponse;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn order(status: OrderStatus) -> Order {
        Order {
            status,
            provider_responses: BTreeMap::new(),
            created_at: t0(),
            updated_at: t0(),
            delivery_date: None,
            delivery_time: None,
        }
    }

    fn categories(events: &[TimelineEvent]) -> Vec<EventCategory> {
        events.iter().map(|e| e.category).collect()
    }

    #[test]
    fn test_pending_order_yields_created_only() {
        let events = reconstruct(&order(OrderStatus::Pending));
        assert_eq!(categories(&events), vec![EventCategory::Created]);
        assert_eq!(events.first().unwrap().at, t0());
    }

    #[test]
    fn test_full_lifecycle_orders_by_instant() {
        let t1 = t0() + TimeDelta::hours(1);
        let t2 = t0() + TimeDelta::hours(2);
        let mut order = order(OrderStatus::Completed);
        order.updated_at = t2;
        order.provider_responses.insert(
            ProviderId::new("prov-1"),
            ProviderResponse {
                status: ProviderResponseStatus::Accepted,
                updated_at: t1,
            },
        );

        let events = reconstruct(&order);
        assert_eq!(
            categories(&events),
            vec![
                EventCategory::Created,
                EventCategory::Accepted,
                EventCategory::Completed,
            ]
        );
        assert_eq!(events[1].at, t1);
        assert_eq!(events[2].at, t2);
    }

    #[test]
    fn test_rejected_responses_emit_nothing() {
        let mut order = order(OrderStatus::Pending);
        order.provider_responses.insert(
            ProviderId::new("prov-1"),
            ProviderResponse {
                status: ProviderResponseStatus::Rejected,
                updated_at: t0() + TimeDelta::hours(1),
            },
        );
        order.provider_responses.insert(
            ProviderId::new("prov-2"),
            ProviderResponse {
                status: ProviderResponseStatus::Pending,
                updated_at: t0() + TimeDelta::hours(1),
            },
        );

        let events = reconstruct(&order);
        assert_eq!(categories(&events), vec![EventCategory::Created]);
    }

    #[test]
    fn test_multiple_accepted_providers_each_appear() {
        let mut order = order(OrderStatus::Accepted);
        for (id, hours) in [("prov-b", 2), ("prov-a", 1)] {
            order.provider_responses.insert(
                ProviderId::new(id),
                ProviderResponse {
                    status: ProviderResponseStatus::Accepted,
                    updated_at: t0() + TimeDelta::hours(hours),
                },
            );
        }

        let events = reconstruct(&order);
        assert_eq!(
            categories(&events),
            vec![
                EventCategory::Created,
                EventCategory::Accepted,
                EventCategory::Accepted,
            ]
        );
        // Sorted by instant, not provider id.
        assert!(events[1].description.contains("prov-a"));
        assert!(events[2].description.contains("prov-b"));
    }

    #[test]
    fn test_cancelled_order_closes_the_timeline() {
        let t1 = t0() + TimeDelta::minutes(30);
        let mut order = order(OrderStatus::Cancelled);
        order.updated_at = t1;

        let events = reconstruct(&order);
        assert_eq!(
            categories(&events),
            vec![EventCategory::Created, EventCategory::Cancelled]
        );
        assert_eq!(events[1].at, t1);
    }

    #[test]
    fn test_created_description_mentions_delivery_slot() {
        let mut order = order(OrderStatus::Pending);
        order.delivery_date = NaiveDate::from_ymd_opt(2025, 6, 2);
        order.delivery_time = Some("10:00 AM".to_owned());

        let events = reconstruct(&order);
        assert_eq!(
            events.first().unwrap().description,
            "Service requested for 2025-06-02 at 10:00 AM"
        );
    }

    #[test]
    fn test_tie_keeps_emission_order() {
        // Everything at the same instant: created stays first.
        let mut order = order(OrderStatus::Completed);
        order.provider_responses.insert(
            ProviderId::new("prov-1"),
            ProviderResponse {
                status: ProviderResponseStatus::Accepted,
                updated_at: t0(),
            },
        );

        let events = reconstruct(&order);
        assert_eq!(
            categories(&events),
            vec![
                EventCategory::Created,
                EventCategory::Accepted,
                EventCategory::Completed,
            ]
        );
    }
}
