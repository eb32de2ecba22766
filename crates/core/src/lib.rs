//! Helper Buddy Core - Shared types library.
//!
//! This crate provides common types used across all Helper Buddy components:
//! - `marketplace` - Cart, referral, lockout, and order-timeline business rules
//! - `integration-tests` - End-to-end flows over the in-memory store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no document-store access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, referral codes,
//!   quantities, prices, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
