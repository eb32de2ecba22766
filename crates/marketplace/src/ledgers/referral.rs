//! Referral ledger.
//!
//! Issues referral codes, validates and redeems them once per
//! referring/referred pair, credits bonus coins, and caps how many times one
//! account can be the referred party.
//!
//! Redemption touches two user documents without a cross-document
//! transaction. At-most-once crediting is guaranteed by the idempotency key
//! (the referred email in the referrer's `referredEmails`) combined with a
//! conditional write: the referrer document is replaced only if it still
//! carries the version read before the checks ran, so a concurrent duplicate
//! redemption re-runs its checks against the credited document and lands on
//! [`ReferralOutcome::AlreadyRedeemed`].

use rand::Rng;
use tracing::instrument;

use helper_buddy_core::{Email, ReferralCode, UserId};

use super::{LedgerError, MAX_WRITE_ATTEMPTS};
use crate::clock::Clock;
use crate::config::ReferralPolicy;
use crate::models::{ReferralRecord, UserProfile};
use crate::store::{Document, DocumentStore, FieldOp, Filter, StoreError, encode};

/// Collection holding one document per user, keyed by user ID.
const USERS: &str = "users";
/// Collection holding singleton configuration documents.
const SETTINGS: &str = "settings";
/// Settings document carrying the referral bonus amount.
const SETTINGS_DOC: &str = "referral";
/// Field on the settings document holding the bonus.
const BONUS_FIELD: &str = "bonusAmount";
/// Stored field name of [`UserProfile::referral_code`].
const CODE_FIELD: &str = "referralCode";
/// Candidate codes tried before giving up on minting a unique one.
const MINT_ATTEMPTS: usize = 4;

/// What a redemption attempt resolved to.
///
/// Every non-`Credited` variant is a business no-op: nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralOutcome {
    /// The referrer was credited `bonus` coins.
    Credited {
        /// Coins added to the referrer's balance.
        bonus: i64,
    },
    /// No user owns the presented code.
    InvalidCode,
    /// This email already credited the referrer once.
    AlreadyRedeemed,
    /// The referred account hit the times-been-referred cap.
    CapExceeded,
    /// The referred user's document does not exist.
    ReferredMissing,
}

impl ReferralOutcome {
    /// Whether a bonus was applied.
    #[must_use]
    pub const fn credited(self) -> bool {
        matches!(self, Self::Credited { .. })
    }
}

/// Stateless referral operations over an injected store and clock.
pub struct ReferralLedger<'a, S, C> {
    store: &'a S,
    clock: &'a C,
    policy: ReferralPolicy,
}

impl<'a, S: DocumentStore, C: Clock> ReferralLedger<'a, S, C> {
    /// Create a new referral ledger.
    #[must_use]
    pub const fn new(store: &'a S, clock: &'a C, policy: ReferralPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    /// Ensure `user` has a referral code, minting one if needed.
    ///
    /// Returns the existing code when one is already stored (issuing is
    /// idempotent). Generation itself performs no uniqueness check, so each
    /// candidate is checked against the store and regenerated on collision.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UserMissing` if the user document does not
    /// exist, `LedgerError::CodeCollision` if every candidate collided, plus
    /// store and corruption errors.
    #[instrument(skip(self, rng), fields(user = %user))]
    pub async fn issue_code<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        user: &UserId,
    ) -> Result<ReferralCode, LedgerError> {
        let doc = self
            .store
            .get(USERS, user.as_str())
            .await?
            .ok_or_else(|| LedgerError::UserMissing(user.clone()))?;
        let profile = decode_profile(user.as_str(), &doc)?;

        if let Some(code) = profile.referral_code {
            return Ok(code);
        }

        for _ in 0..MINT_ATTEMPTS {
            let candidate = ReferralCode::generate(rng, self.policy.code_length);
            let holders = self
                .store
                .query(USERS, &Filter::eq(CODE_FIELD, candidate.as_str()))
                .await?;
            if !holders.is_empty() {
                tracing::debug!(%user, "referral code collision, regenerating");
                continue;
            }

            self.store
                .update(
                    USERS,
                    user.as_str(),
                    vec![(
                        CODE_FIELD.to_owned(),
                        FieldOp::Set(candidate.as_str().into()),
                    )],
                )
                .await?;
            return Ok(candidate);
        }

        Err(LedgerError::CodeCollision {
            attempts: MINT_ATTEMPTS,
        })
    }

    /// Redeem `code` on behalf of a new signup.
    ///
    /// On success the referrer's coins grow by the configured bonus, the new
    /// email joins `referredEmails`, a record is appended to
    /// `referralHistory`, and the new user's `timesBeenReferred` is
    /// incremented. Every rejection reason is reported as its own
    /// [`ReferralOutcome`] variant; none of them writes anything.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` on store failure, `LedgerError::Corrupt`
    /// if a user document does not decode, and `LedgerError::Conflict` if
    /// concurrent redemptions exhaust the retry budget.
    #[instrument(skip(self), fields(code = %code, new_user = %new_user))]
    pub async fn process_referral(
        &self,
        code: &ReferralCode,
        new_user: &UserId,
        new_email: &Email,
    ) -> Result<ReferralOutcome, LedgerError> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            // Find the referrer by code.
            let mut holders = self
                .store
                .query(USERS, &Filter::eq(CODE_FIELD, code.as_str()))
                .await?;
            let Some((referrer_id, referrer_doc)) = holders.pop() else {
                tracing::debug!(%code, "referral code matches no user");
                return Ok(ReferralOutcome::InvalidCode);
            };
            let referrer = decode_profile(&referrer_id, &referrer_doc)?;

            // One credit per referring/referred pair, ever.
            if referrer.has_referred(new_email) {
                return Ok(ReferralOutcome::AlreadyRedeemed);
            }

            // The referred account must exist and sit under the cap.
            let Some(new_doc) = self.store.get(USERS, new_user.as_str()).await? else {
                return Ok(ReferralOutcome::ReferredMissing);
            };
            let new_profile = decode_profile(new_user.as_str(), &new_doc)?;
            if new_profile.times_been_referred >= self.policy.max_times_referred {
                tracing::warn!(%new_user, "referral cap exceeded");
                return Ok(ReferralOutcome::CapExceeded);
            }

            let bonus = self.bonus_amount().await?;

            // Credit the referrer, conditional on the version the checks saw.
            let mut credited = referrer;
            credited.coins += bonus;
            credited.referred_emails.push(new_email.clone());
            credited.referral_history.push(ReferralRecord {
                referred_email: new_email.clone(),
                referral_date: self.clock.now(),
            });
            let fields = encode(&credited)
                .map_err(|e| LedgerError::Corrupt(format!("user {referrer_id}: {e}")))?;

            match self
                .store
                .set_if(USERS, &referrer_id, fields, Some(referrer_doc.version))
                .await
            {
                Ok(_) => {
                    self.store
                        .update(
                            USERS,
                            new_user.as_str(),
                            vec![("timesBeenReferred".to_owned(), FieldOp::Increment(1))],
                        )
                        .await?;
                    tracing::info!(referrer = %referrer_id, %new_user, bonus, "referral credited");
                    return Ok(ReferralOutcome::Credited { bonus });
                }
                Err(StoreError::VersionMismatch { .. }) => {
                    tracing::debug!(%code, attempt, "referrer changed mid-redemption, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(LedgerError::Conflict(format!(
            "referral redemption for code {code} kept losing to concurrent writers"
        )))
    }

    /// The bonus per credited referral: the settings document's
    /// `bonusAmount`, or the policy default when absent.
    async fn bonus_amount(&self) -> Result<i64, LedgerError> {
        let bonus = self
            .store
            .get(SETTINGS, SETTINGS_DOC)
            .await?
            .and_then(|doc| doc.fields.get(BONUS_FIELD).and_then(serde_json::Value::as_i64))
            .unwrap_or(self.policy.default_bonus);
        Ok(bonus)
    }
}

/// Decode a user document, mapping failures to corruption errors.
fn decode_profile(id: &str, doc: &Document) -> Result<UserProfile, LedgerError> {
    doc.decode()
        .map_err(|e| LedgerError::Corrupt(format!("user {id}: {e}")))
}
