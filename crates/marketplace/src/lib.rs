//! Helper Buddy Marketplace - business-rule layer.
//!
//! This crate implements the bookkeeping behind the Helper Buddy
//! home-services marketplace: the cart ledger, the referral ledger, the
//! login lockout counter, and the order timeline reconstructor. The managed
//! document database is abstracted behind [`store::DocumentStore`]; UI,
//! routing, authentication flows, and the payment gateway live elsewhere and
//! call into this crate one operation at a time.
//!
//! # Architecture
//!
//! - [`store`] - Document-store trait, field-level update ops, and the
//!   in-memory backend used by tests and local development
//! - [`models`] - Typed document shapes with validating constructors
//! - [`ledgers`] - Cart, referral, and lockout operations (one
//!   read-modify-write cycle each)
//! - [`timeline`] - Pure reconstruction of an order's display timeline
//! - [`clock`] - Wall-clock abstraction so tests can control time
//! - [`config`] - Environment-driven policy knobs
//!
//! No operation spans multiple ledgers atomically; each document write is
//! atomic on its own and cross-document sequences are guarded by the
//! idempotency rules documented on the individual ledgers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod config;
pub mod ledgers;
pub mod models;
pub mod store;
pub mod timeline;

pub use clock::{Clock, SystemClock};
pub use config::MarketplaceConfig;
pub use ledgers::{CartLedger, LockoutCounter, LockoutState, ReferralLedger, ReferralOutcome};
