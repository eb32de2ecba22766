//! Core type definitions.
//!
//! All entity references in the marketplace go through the newtypes defined
//! here rather than raw strings, so a `UserId` can never be handed to an
//! operation expecting a `ServiceId`.

mod email;
mod id;
mod price;
mod quantity;
mod referral_code;
mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, ProviderId, ServiceId, UserId};
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
pub use referral_code::{ReferralCode, ReferralCodeError};
pub use status::{OrderStatus, ProviderResponseStatus};
