//! Ledger operations.
//!
//! A ledger is a stateless operation set over one logical document
//! collection. Every operation is one read-modify-write cycle against the
//! injected [`DocumentStore`](crate::store::DocumentStore); no operation
//! spans multiple ledgers atomically.

mod cart;
mod lockout;
mod referral;

pub use cart::{CartError, CartLedger};
pub use lockout::{LockoutCounter, LockoutState};
pub use referral::{ReferralLedger, ReferralOutcome};

use thiserror::Error;

use helper_buddy_core::UserId;

use crate::store::StoreError;

/// How many times a conditional write is retried after losing to a
/// concurrent writer before the operation gives up.
pub(crate) const MAX_WRITE_ATTEMPTS: usize = 3;

/// Errors shared by the referral ledger and lockout counter.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Document store failure, propagated unchanged.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A stored document did not decode into its model.
    #[error("corrupt document: {0}")]
    Corrupt(String),

    /// A user document the operation requires does not exist.
    #[error("user document missing: {0}")]
    UserMissing(UserId),

    /// Conditional writes kept losing to concurrent writers.
    #[error("write conflict: {0}")]
    Conflict(String),

    /// Code minting kept colliding with existing codes.
    #[error("could not mint a unique referral code after {attempts} attempts")]
    CodeCollision {
        /// How many candidates were tried.
        attempts: usize,
    },
}
