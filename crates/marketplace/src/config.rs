//! Marketplace policy configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; every knob has a production default.
//!
//! - `HB_LOCKOUT_MAX_ATTEMPTS` - Failed logins before lockout (default: 5)
//! - `HB_LOCKOUT_WINDOW_SECS` - Lockout duration in seconds (default: 300)
//! - `HB_REFERRAL_CODE_LENGTH` - Generated referral code length (default: 8)
//! - `HB_REFERRAL_DEFAULT_BONUS` - Coins credited per referral when the
//!   settings document has no `bonusAmount` (default: 100)
//! - `HB_REFERRAL_MAX_TIMES_REFERRED` - Times one account may be the
//!   referred party, across all codes (default: 10)

use chrono::TimeDelta;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Login lockout policy.
///
/// The window is linear by design - repeated lockouts do not back off
/// exponentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Failed attempts that trigger a lockout.
    pub max_attempts: u32,
    /// How long a lockout lasts once triggered.
    pub window: TimeDelta,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window: TimeDelta::minutes(5),
        }
    }
}

/// Referral issuance and redemption policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferralPolicy {
    /// Length of generated referral codes.
    pub code_length: usize,
    /// Bonus coins per credited referral when the settings document is
    /// absent or has no `bonusAmount` field.
    pub default_bonus: i64,
    /// Anti-abuse cap on how many times one account can be referred.
    pub max_times_referred: u32,
}

impl Default for ReferralPolicy {
    fn default() -> Self {
        Self {
            code_length: 8,
            default_bonus: 100,
            max_times_referred: 10,
        }
    }
}

/// Marketplace business-rule configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketplaceConfig {
    /// Login lockout policy.
    pub lockout: LockoutPolicy,
    /// Referral policy.
    pub referral: ReferralPolicy,
}

impl MarketplaceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. Unset
    /// variables fall back to the documented defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let max_attempts =
            parse_env_or("HB_LOCKOUT_MAX_ATTEMPTS", defaults.lockout.max_attempts)?;
        let window_secs = parse_env_or(
            "HB_LOCKOUT_WINDOW_SECS",
            defaults.lockout.window.num_seconds(),
        )?;
        let code_length =
            parse_env_or("HB_REFERRAL_CODE_LENGTH", defaults.referral.code_length)?;
        let default_bonus =
            parse_env_or("HB_REFERRAL_DEFAULT_BONUS", defaults.referral.default_bonus)?;
        let max_times_referred = parse_env_or(
            "HB_REFERRAL_MAX_TIMES_REFERRED",
            defaults.referral.max_times_referred,
        )?;

        Ok(Self {
            lockout: LockoutPolicy {
                max_attempts,
                window: TimeDelta::seconds(window_secs),
            },
            referral: ReferralPolicy {
                code_length,
                default_bonus,
                max_times_referred,
            },
        })
    }
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}
