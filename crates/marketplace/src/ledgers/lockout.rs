//! Login lockout counter.
//!
//! Tracks consecutive failed logins per email and reports when a lockout
//! window is in force. The counter is advisory: callers decide whether to let
//! the login proceed, this module only keeps the books.
//!
//! Writes are plain replacements. Attempt records tolerate last-writer-wins
//! races: the worst a lost race can do is over- or under-count by one, and
//! the counter resets on the next successful login anyway.

use tracing::instrument;

use helper_buddy_core::Email;

use super::LedgerError;
use crate::clock::Clock;
use crate::config::LockoutPolicy;
use crate::models::LoginAttempt;
use crate::store::{DocumentStore, SetMode, encode};

/// Collection holding one attempt record per email, keyed by the normalized
/// address.
const LOGIN_ATTEMPTS: &str = "loginAttempts";

/// Where an email stands with respect to lockout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutState {
    /// No failed attempts on the books.
    Clear,
    /// Some failures recorded, but below the threshold.
    Accumulating {
        /// Consecutive failures so far.
        attempts: u32,
    },
    /// A lockout window is in force.
    Locked {
        /// Time left until the window expires.
        remaining: chrono::TimeDelta,
    },
}

impl LockoutState {
    /// Whether a login should be refused right now.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}

/// Stateless lockout bookkeeping over an injected store and clock.
pub struct LockoutCounter<'a, S, C> {
    store: &'a S,
    clock: &'a C,
    policy: LockoutPolicy,
}

impl<'a, S: DocumentStore, C: Clock> LockoutCounter<'a, S, C> {
    /// Create a new lockout counter.
    #[must_use]
    pub const fn new(store: &'a S, clock: &'a C, policy: LockoutPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    /// Report where `email` currently stands.
    ///
    /// An expired lockout window is cleared on sight: the record is rewritten
    /// to zero attempts so the next failure starts a fresh count.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` on store failure and
    /// `LedgerError::Corrupt` if the stored record does not decode.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn check(&self, email: &Email) -> Result<LockoutState, LedgerError> {
        let Some(doc) = self.store.get(LOGIN_ATTEMPTS, email.as_str()).await? else {
            return Ok(LockoutState::Clear);
        };
        let record: LoginAttempt = doc
            .decode()
            .map_err(|e| LedgerError::Corrupt(format!("login attempts {email}: {e}")))?;

        let now = self.clock.now();
        if let Some(until) = record.locked_until {
            if until > now {
                return Ok(LockoutState::Locked {
                    remaining: until - now,
                });
            }
            // Window elapsed: reset so stale locks never linger.
            self.write(email, LoginAttempt::cleared(now)).await?;
            return Ok(LockoutState::Clear);
        }

        if record.attempts == 0 {
            Ok(LockoutState::Clear)
        } else {
            Ok(LockoutState::Accumulating {
                attempts: record.attempts,
            })
        }
    }

    /// Record the outcome of a login attempt and return the resulting state.
    ///
    /// A success wipes the record. A failure increments the count and, at the
    /// policy threshold, starts a lockout window. Failures reported while a
    /// window is already in force do not extend it or grow the count.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` on store failure and
    /// `LedgerError::Corrupt` if the stored record does not decode.
    #[instrument(skip(self), fields(email = %email, success))]
    pub async fn record_attempt(
        &self,
        email: &Email,
        success: bool,
    ) -> Result<LockoutState, LedgerError> {
        let now = self.clock.now();

        if success {
            self.write(email, LoginAttempt::cleared(now)).await?;
            return Ok(LockoutState::Clear);
        }

        let previous = match self.store.get(LOGIN_ATTEMPTS, email.as_str()).await? {
            Some(doc) => doc
                .decode()
                .map_err(|e| LedgerError::Corrupt(format!("login attempts {email}: {e}")))?,
            None => LoginAttempt::cleared(now),
        };

        // An active lock absorbs further failures without counting them.
        if let Some(until) = previous.locked_until {
            if until > now {
                return Ok(LockoutState::Locked {
                    remaining: until - now,
                });
            }
        }

        // Expired locks count from zero again.
        let prior = if previous.locked_until.is_some() {
            0
        } else {
            previous.attempts
        };
        let attempts = prior.saturating_add(1);

        if attempts >= self.policy.max_attempts {
            let record = LoginAttempt {
                attempts,
                last_attempt: now,
                locked_until: Some(now + self.policy.window),
            };
            self.write(email, record).await?;
            tracing::warn!(%email, attempts, "login lockout triggered");
            return Ok(LockoutState::Locked {
                remaining: self.policy.window,
            });
        }

        let record = LoginAttempt {
            attempts,
            last_attempt: now,
            locked_until: None,
        };
        self.write(email, record).await?;
        Ok(LockoutState::Accumulating { attempts })
    }

    async fn write(&self, email: &Email, record: LoginAttempt) -> Result<(), LedgerError> {
        let fields = encode(&record)
            .map_err(|e| LedgerError::Corrupt(format!("login attempts {email}: {e}")))?;
        self.store
            .set(LOGIN_ATTEMPTS, email.as_str(), fields, SetMode::Replace)
            .await?;
        Ok(())
    }
}
