//! Login attempt document model.
//!
//! One document per email, keyed by the normalized address. Purely advisory
//! bookkeeping: the lockout counter records and reports, the auth caller
//! enforces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failed-login bookkeeping for one email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempt {
    /// Consecutive failed attempts since the last success or expiry reset.
    #[serde(default)]
    pub attempts: u32,
    /// When the last attempt (success or failure) was recorded.
    pub last_attempt: DateTime<Utc>,
    /// End of the active lockout window, if one is in force.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,
}

impl LoginAttempt {
    /// A cleared record stamped at `now`: zero attempts, no lock.
    #[must_use]
    pub const fn cleared(now: DateTime<Utc>) -> Self {
        Self {
            attempts: 0,
            last_attempt: now,
            locked_until: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_document_shape_is_camel_case() {
        let now = DateTime::parse_from_rfc3339("2025-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = LoginAttempt {
            attempts: 3,
            last_attempt: now,
            locked_until: None,
        };

        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["attempts"], json!(3));
        assert_eq!(value["lastAttempt"], json!("2025-06-01T10:00:00Z"));
        // No active lock: the field is omitted, not null.
        assert!(value.get("lockedUntil").is_none());
    }
}
