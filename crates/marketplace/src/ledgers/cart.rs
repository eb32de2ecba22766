//! Cart ledger.
//!
//! Maintains one cart document per user in the `carts` collection, keyed by
//! user ID. Lines merge by service identity; quantities stay within 1..=99;
//! a line that would drop to zero is removed rather than stored.
//!
//! Writes are conditional on the version read at the start of the cycle, so
//! two tabs mutating the same cart cannot silently overwrite each other: the
//! loser re-reads and re-applies, and only after repeated losses does the
//! operation surface [`CartError::Conflict`].

use thiserror::Error;
use tracing::instrument;

use helper_buddy_core::{Quantity, QuantityError, ServiceId, UserId};

use super::MAX_WRITE_ATTEMPTS;
use crate::clock::Clock;
use crate::models::{Cart, CartLine, NewCartItem};
use crate::store::{DocumentStore, SetMode, StoreError, Version, encode};

/// Collection holding one cart document per user.
const CARTS: &str = "carts";

/// Errors surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Document store failure, propagated unchanged.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The stored cart did not decode into the cart model.
    #[error("corrupt cart document: {0}")]
    Corrupt(String),

    /// The requested quantity is outside 1..=99.
    #[error(transparent)]
    QuantityOutOfRange(#[from] QuantityError),

    /// No line with the given service ID exists in the cart.
    #[error("no cart line for service {service}")]
    LineNotFound {
        /// The service that was addressed.
        service: ServiceId,
    },

    /// Conditional writes kept losing to concurrent writers.
    #[error("cart write conflict for user {user}")]
    Conflict {
        /// The cart owner.
        user: UserId,
    },
}

/// Stateless cart operations over an injected store and clock.
pub struct CartLedger<'a, S, C> {
    store: &'a S,
    clock: &'a C,
}

impl<'a, S: DocumentStore, C: Clock> CartLedger<'a, S, C> {
    /// Create a new cart ledger.
    #[must_use]
    pub const fn new(store: &'a S, clock: &'a C) -> Self {
        Self { store, clock }
    }

    /// Add a service to the user's cart.
    ///
    /// Creates the cart document on first add. If a line for the same
    /// service already exists its quantity is incremented by one, saturating
    /// at 99; otherwise a new line is appended at quantity one. `updatedAt`
    /// is stamped on every write.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` on store failure, `CartError::Corrupt` if
    /// the stored cart does not decode, and `CartError::Conflict` if
    /// concurrent writers exhaust the retry budget.
    #[instrument(skip(self, item), fields(user = %user, service = %item.id))]
    pub async fn add_item(&self, user: &UserId, item: &NewCartItem) -> Result<Cart, CartError> {
        self.write_cycle(user, |cart, now| {
            if let Some(line) = cart.line_mut(&item.id) {
                line.quantity = line.quantity.saturating_increment();
            } else {
                cart.items.push(CartLine::first(item, now));
            }
            Ok(())
        })
        .await
    }

    /// Replace the quantity of an existing line.
    ///
    /// A quantity of zero removes the line - a cart never stores a zero
    /// line. All other line fields are preserved.
    ///
    /// # Errors
    ///
    /// Returns `CartError::QuantityOutOfRange` for quantities above 99,
    /// `CartError::LineNotFound` if no line matches the service, plus the
    /// store/corruption/conflict errors of every cart write.
    #[instrument(skip(self), fields(user = %user, service = %service))]
    pub async fn update_quantity(
        &self,
        user: &UserId,
        service: &ServiceId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        if quantity == 0 {
            return self.remove_item(user, service).await;
        }
        let quantity = Quantity::new(quantity)?;

        self.write_cycle(user, |cart, _now| {
            let line = cart.line_mut(service).ok_or(CartError::LineNotFound {
                service: service.clone(),
            })?;
            line.quantity = quantity;
            Ok(())
        })
        .await
    }

    /// Remove a line from the user's cart.
    ///
    /// Removing a service that is not in the cart is a no-op; a missing cart
    /// document stays missing.
    ///
    /// # Errors
    ///
    /// Returns the store/corruption/conflict errors of every cart write.
    #[instrument(skip(self), fields(user = %user, service = %service))]
    pub async fn remove_item(&self, user: &UserId, service: &ServiceId) -> Result<Cart, CartError> {
        self.write_cycle(user, |cart, _now| {
            cart.remove_line(service);
            Ok(())
        })
        .await
    }

    /// The user's current cart lines, or an empty sequence if no cart
    /// document exists.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` on store failure and `CartError::Corrupt`
    /// if the stored cart does not decode.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn items(&self, user: &UserId) -> Result<Vec<CartLine>, CartError> {
        match self.store.get(CARTS, user.as_str()).await? {
            Some(doc) => {
                let cart: Cart = doc
                    .decode()
                    .map_err(|e| CartError::Corrupt(format!("cart for {user}: {e}")))?;
                Ok(cart.items)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Run one read-mutate-write cycle with conditional-write retry.
    ///
    /// `mutate` receives the decoded cart (empty if no document exists yet)
    /// and the current instant; on success the cart is stamped and written
    /// back conditional on the version that was read.
    async fn write_cycle<F>(&self, user: &UserId, mutate: F) -> Result<Cart, CartError>
    where
        F: Fn(&mut Cart, chrono::DateTime<chrono::Utc>) -> Result<(), CartError>,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let now = self.clock.now();
            let (mut cart, expected): (Cart, Option<Version>) =
                match self.store.get(CARTS, user.as_str()).await? {
                    Some(doc) => {
                        let cart = doc
                            .decode()
                            .map_err(|e| CartError::Corrupt(format!("cart for {user}: {e}")))?;
                        (cart, Some(doc.version))
                    }
                    None => (Cart::empty(now), None),
                };

            mutate(&mut cart, now)?;
            cart.updated_at = now;

            // Carts are created on first add; a no-op against a missing
            // document must not materialize an empty cart.
            if expected.is_none() && cart.items.is_empty() {
                return Ok(cart);
            }

            let fields = encode(&cart)
                .map_err(|e| CartError::Corrupt(format!("cart for {user}: {e}")))?;

            match self
                .store
                .set_if(CARTS, user.as_str(), fields, expected)
                .await
            {
                Ok(_) => return Ok(cart),
                Err(StoreError::VersionMismatch { .. }) => {
                    tracing::debug!(%user, attempt, "cart write lost to concurrent writer, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CartError::Conflict { user: user.clone() })
    }
}
