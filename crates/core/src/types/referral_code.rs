//! Referral code type and generator.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Alphabet referral codes are drawn from: 26 uppercase letters + 10 digits.
const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors that can occur when parsing a [`ReferralCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferralCodeError {
    /// The code length is outside the accepted range.
    #[error("referral code must be {min}-{max} characters, got {got}", min = ReferralCode::MIN_LENGTH, max = ReferralCode::MAX_LENGTH)]
    BadLength {
        /// The rejected length.
        got: usize,
    },
    /// The code contains a character outside A-Z and 0-9.
    #[error("referral code may only contain A-Z and 0-9")]
    BadCharacter,
}

/// A fixed-length code a user shares to earn bonus coins when a new signup
/// redeems it.
///
/// Codes are uppercase alphanumeric. Generation draws uniformly from the
/// 36-character alphabet and performs no uniqueness check; callers that need
/// uniqueness retry against the store (see `ReferralLedger::issue_code`) or
/// accept birthday-bound collision risk at the chosen length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Default generated length.
    pub const DEFAULT_LENGTH: usize = 8;
    /// Shortest accepted code.
    pub const MIN_LENGTH: usize = 4;
    /// Longest accepted code.
    pub const MAX_LENGTH: usize = 16;

    /// Parse a code, uppercasing the input.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is outside 4..=16 or any character is
    /// not alphanumeric ASCII.
    pub fn parse(s: &str) -> Result<Self, ReferralCodeError> {
        let s = s.trim().to_ascii_uppercase();

        if s.len() < Self::MIN_LENGTH || s.len() > Self::MAX_LENGTH {
            return Err(ReferralCodeError::BadLength { got: s.len() });
        }

        if !s.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(ReferralCodeError::BadCharacter);
        }

        Ok(Self(s))
    }

    /// Generate a random code of `length` characters.
    ///
    /// Each character is drawn uniformly from the 36-character uppercase
    /// alphanumeric alphabet. Lengths outside the accepted parse range are
    /// clamped into it.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Self {
        let length = length.clamp(Self::MIN_LENGTH, Self::MAX_LENGTH);
        let code = (0..length)
            .map(|_| {
                let idx = rng.random_range(0..ALPHABET.len());
                char::from(ALPHABET[idx])
            })
            .collect();
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ReferralCode {
    type Err = ReferralCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReferralCode {
    type Error = ReferralCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ReferralCode> for String {
    fn from(code: ReferralCode) -> Self {
        code.0
    }
}

impl AsRef<str> for ReferralCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
