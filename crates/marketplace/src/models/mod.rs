//! Typed document models.
//!
//! Each struct mirrors the stored shape of one document collection
//! (`camelCase` field names) and encodes its invariants in the types:
//! quantities are 1..=99 by construction, prices are non-negative, emails
//! are normalized. A document that fails to decode into its model surfaces
//! as a corruption error in the owning ledger rather than a panic.

mod cart;
mod login_attempt;
mod order;
mod user;

pub use cart::{Cart, CartLine, NewCartItem};
pub use login_attempt::LoginAttempt;
pub use order::{Order, ProviderResponse};
pub use user::{ReferralRecord, UserProfile};
