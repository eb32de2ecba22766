//! Cart line quantity with enforced bounds.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// The value is outside the allowed 1..=99 range.
    #[error("quantity must be between {min} and {max}, got {got}", min = Quantity::MIN, max = Quantity::MAX)]
    OutOfRange {
        /// The rejected value.
        got: u32,
    },
}

/// A cart line quantity, always within 1..=99.
///
/// A line that would drop to zero is removed from the cart rather than stored
/// with a zero quantity, so zero is not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Smallest storable quantity.
    pub const MIN: u32 = 1;
    /// Largest storable quantity.
    pub const MAX: u32 = 99;
    /// Quantity of one, the value every new cart line starts at.
    pub const ONE: Self = Self(1);

    /// Create a quantity, validating the 1..=99 bound.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::OutOfRange`] for zero or anything above 99.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value >= Self::MIN && value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(QuantityError::OutOfRange { got: value })
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Add one, saturating at [`Quantity::MAX`].
    #[must_use]
    pub const fn saturating_increment(self) -> Self {
        if self.0 >= Self::MAX {
            Self(Self::MAX)
        } else {
            Self(self.0 + 1)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}
