//! # Jitter policy for retry delays.
//!
//! [`JitterPolicy`] randomizes a computed backoff delay so that callers sharing one
//! policy do not retry in lockstep (thundering herd).
//!
//! The policy holds a single `fraction` in `[0, 1]`. For a clamped delay `d` the
//! jittered delay is drawn uniformly from `[d - fraction·d, d + fraction·d]` and then
//! clamped to `[0, max]`.
//!
//! - `fraction = 0.0` → no randomization, the delay is returned unchanged
//! - `fraction = 0.5` → delay varies within ±50% of the backoff value
//! - `fraction = 1.0` → delay varies within `[0, 2·d]` (still capped at `max`)
//!
//! Random values come from the thread-local generator (`rand::rng()`), so
//! concurrent invocations never share generator state.

use rand::Rng;
use std::time::Duration;

use crate::error::PolicyError;

/// Proportional jitter applied on top of a backoff delay.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct JitterPolicy {
    fraction: f64,
}

impl JitterPolicy {
    /// No jitter: use the exact backoff delay.
    ///
    /// Use when:
    /// - Only one caller retries (no herd risk)
    /// - Predictable timing is required
    /// - Testing/debugging
    pub const NONE: JitterPolicy = JitterPolicy { fraction: 0.0 };

    /// Creates a jitter policy from a fraction in `[0, 1]`.
    ///
    /// # Errors
    /// Returns [`PolicyError::InvalidJitter`] for values outside the range or NaN.
    pub fn new(fraction: f64) -> Result<Self, PolicyError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(PolicyError::InvalidJitter { jitter: fraction });
        }
        Ok(Self { fraction })
    }

    /// Fraction of the delay that is randomized away.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// True if this policy leaves delays untouched.
    pub fn is_none(&self) -> bool {
        self.fraction == 0.0
    }

    /// Applies jitter to `delay`, keeping the result within `[0, max]`.
    pub fn apply(&self, delay: Duration, max: Duration) -> Duration {
        let delay = delay.min(max);
        if self.is_none() || delay.is_zero() {
            return delay;
        }

        let secs = delay.as_secs_f64();
        let spread = secs * self.fraction;
        let offset = rand::rng().random_range(-spread..=spread);

        let jittered = (secs + offset).clamp(0.0, max.as_secs_f64());
        Duration::try_from_secs_f64(jittered).map_or(max, |d| d.min(max))
    }
}
