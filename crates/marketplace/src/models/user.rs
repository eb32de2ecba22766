//! User document model (referral-relevant subset).
//!
//! The auth provider owns identity; this model only covers the fields the
//! referral ledger reads and writes on the user document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use helper_buddy_core::{Email, ReferralCode};

/// One credited referral, as stored in `referralHistory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralRecord {
    /// Email of the referred signup.
    pub referred_email: Email,
    /// When the bonus was credited.
    pub referral_date: DateTime<Utc>,
}

/// Referral-relevant subset of a user document.
///
/// Other services store their own fields on the same document (profile
/// details, addresses); those land in `extra` and are written back untouched
/// whenever the referral ledger rewrites the document.
///
/// Invariants maintained by the referral ledger:
/// - an email appears in at most one user's `referredEmails`
/// - `timesBeenReferred` never exceeds the policy cap
/// - `referralHistory` grows in lockstep with `referredEmails`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account email, unique across users.
    pub email: Email,
    /// Bonus currency balance; credits only, never negative.
    #[serde(default)]
    pub coins: i64,
    /// This user's shareable code, once issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<ReferralCode>,
    /// Emails already credited to this user as referrer.
    #[serde(default)]
    pub referred_emails: Vec<Email>,
    /// Ordered credit history for this user as referrer.
    #[serde(default)]
    pub referral_history: Vec<ReferralRecord>,
    /// How many times this account has been the referred party.
    #[serde(default)]
    pub times_been_referred: u32,
    /// Fields owned by other services, round-tripped as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// A fresh profile with no referral activity.
    #[must_use]
    pub fn new(email: Email) -> Self {
        Self {
            email,
            coins: 0,
            referral_code: None,
            referred_emails: Vec::new(),
            referral_history: Vec::new(),
            times_been_referred: 0,
            extra: serde_json::Map::new(),
        }
    }

    /// Whether `email` has already credited this user as referrer.
    #[must_use]
    pub fn has_referred(&self, email: &Email) -> bool {
        self.referred_emails.contains(email)
    }
}
