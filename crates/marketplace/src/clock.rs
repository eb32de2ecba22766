//! Wall-clock abstraction.
//!
//! Every timestamp the ledgers write (`updatedAt`, `addedAt`, `lastAttempt`,
//! `lockedUntil`, `referralDate`) comes from an injected [`Clock`], so tests
//! can pin and advance time instead of sleeping through lockout windows.

use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// The current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock pinned at `start`.
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock to an absolute instant.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }

    /// Advance the clock by a delta.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Clock for ManualClock {
    #[allow(clippy::unwrap_used)]
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
