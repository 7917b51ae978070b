//! # Retry configuration.
//!
//! Provides [`Config`], plain settings that can be embedded in an application's
//! own configuration and turned into a validated [`RetryPolicy`](crate::RetryPolicy).
//!
//! Config is used in two ways:
//! 1. **Policy creation**: `RetryPolicy::from_config(&config)`
//! 2. **Builder defaults**: `RetryPolicy::builder(..).with_config(&config)`
//!
//! ## Sentinel values
//! - `max_attempts = 0` → unlimited attempts

use std::time::Duration;

use crate::policies::Attempts;

/// Retry settings with public fields and documented defaults.
///
/// ## Field semantics
/// - `max_attempts`: Total invocations allowed (`0` = unlimited)
/// - `base_delay`: Delay before the first retry
/// - `max_delay`: Cap for every delay (must be `>= base_delay`)
/// - `multiplier`: Growth factor per failed attempt (must be `>= 1.0`)
/// - `jitter`: Randomized fraction of each delay (must be within `[0, 1]`)
///
/// ## Notes
/// Values are not checked here; validation happens when the policy is built.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Maximum number of invocations, first try included (`0` = unlimited).
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Upper bound for every computed delay.
    pub max_delay: Duration,

    /// Exponential growth factor.
    pub multiplier: f64,

    /// Fraction of each delay randomized away (`0.0` = deterministic).
    pub jitter: f64,
}

impl Config {
    /// Returns the attempt budget with the `0` sentinel translated.
    ///
    /// - `Attempts::Unlimited` → `max_attempts == 0`
    /// - `Attempts::Limited(n)` → otherwise
    #[inline]
    pub fn attempts(&self) -> Attempts {
        if self.max_attempts == 0 {
            Attempts::Unlimited
        } else {
            Attempts::Limited(self.max_attempts)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_attempts = 3`
    /// - `base_delay = 100ms`
    /// - `max_delay = 30s`
    /// - `multiplier = 2.0`
    /// - `jitter = 0.0`
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.0,
        }
    }
}
