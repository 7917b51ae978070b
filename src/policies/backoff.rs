//! # Backoff policy for retrying operations.
//!
//! [`BackoffPolicy`] controls how retry delays grow after repeated failures.
//! It is parameterized by:
//! - [`BackoffPolicy::base`] the delay before the first retry;
//! - [`BackoffPolicy::max`] the maximum delay cap;
//! - [`BackoffPolicy::multiplier`] the multiplicative growth factor;
//! - [`BackoffPolicy::jitter`] the proportional randomization.
//!
//! The delay after failed attempt `n` (1-based) is `base × multiplier^(n-1)`, clamped
//! to `max`, then jitter is applied. The nominal value is derived purely from the
//! attempt number, so jitter output never feeds back into later calculations.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy::new(
//!     Duration::from_millis(100),
//!     Duration::from_secs(10),
//!     2.0,
//!     JitterPolicy::NONE,
//! )
//! .unwrap();
//!
//! // Attempt 1 failed → first retry waits `base` (100ms)
//! assert_eq!(backoff.delay(1), Duration::from_millis(100));
//!
//! // Attempt 2 failed → base × 2^1 = 200ms
//! assert_eq!(backoff.delay(2), Duration::from_millis(200));
//!
//! // Attempt 11 failed → 100ms × 2^10 = 102_400ms → capped at max=10s
//! assert_eq!(backoff.delay(11), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::error::PolicyError;
use crate::policies::jitter::JitterPolicy;

/// Exponential backoff with a cap and proportional jitter.
///
/// Always valid once constructed: `multiplier >= 1.0`, `max >= base`, jitter in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    base: Duration,
    max: Duration,
    multiplier: f64,
    jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `base = 100ms`;
    /// - `max = 30s`;
    /// - `multiplier = 2.0`;
    /// - no jitter.
    fn default() -> Self {
        Self {
            base: Duration::from_millis(100),
            max: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: JitterPolicy::NONE,
        }
    }
}

impl BackoffPolicy {
    /// Creates a validated backoff policy.
    ///
    /// # Errors
    /// - [`PolicyError::InvalidMultiplier`] if `multiplier < 1.0` or not finite;
    /// - [`PolicyError::InvertedDelayBounds`] if `max < base`.
    pub fn new(
        base: Duration,
        max: Duration,
        multiplier: f64,
        jitter: JitterPolicy,
    ) -> Result<Self, PolicyError> {
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(PolicyError::InvalidMultiplier { multiplier });
        }
        if max < base {
            return Err(PolicyError::InvertedDelayBounds { base, max });
        }
        Ok(Self {
            base,
            max,
            multiplier,
            jitter,
        })
    }

    /// Delay before the first retry.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// Upper bound for every computed delay.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Growth factor applied per failed attempt.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Jitter applied on top of the nominal delay.
    pub fn jitter(&self) -> JitterPolicy {
        self.jitter
    }

    /// Deterministic delay after failed attempt `attempt` (1-based), before jitter.
    ///
    /// `attempt = 0` is treated like `1`. Overflowing or non-finite values clamp to `max`.
    pub fn nominal(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let unclamped_secs = self.base.as_secs_f64() * self.multiplier.powi(exp);

        if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs >= max_secs {
            return self.max;
        }
        // `max_secs` rounds up for caps near `Duration::MAX`; the conversion can still overflow.
        Duration::try_from_secs_f64(unclamped_secs).map_or(self.max, |d| d.min(self.max))
    }

    /// Delay to wait after failed attempt `attempt` (1-based), jitter included.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.jitter.apply(self.nominal(attempt), self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn exp(base_ms: u64, max: Duration, multiplier: f64) -> BackoffPolicy {
        BackoffPolicy::new(
            Duration::from_millis(base_ms),
            max,
            multiplier,
            JitterPolicy::NONE,
        )
        .unwrap()
    }

    #[test]
    fn test_first_retry_uses_base() {
        let policy = exp(100, Duration::from_secs(30), 2.0);
        assert_eq!(policy.delay(1), Duration::from_millis(100));
    }

    #[test]
    fn test_exponential_growth_no_jitter() {
        let policy = exp(100, Duration::from_secs(30), 2.0);

        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(400));
        assert_eq!(policy.delay(4), Duration::from_millis(800));
        assert_eq!(policy.delay(5), Duration::from_millis(1600));
    }

    #[test]
    fn test_constant_multiplier() {
        let policy = exp(500, Duration::from_secs(30), 1.0);
        for attempt in 1..10 {
            assert_eq!(
                policy.delay(attempt),
                Duration::from_millis(500),
                "attempt {} should be constant at 500ms",
                attempt
            );
        }
    }

    #[test]
    fn test_clamped_to_max() {
        let policy = exp(100, Duration::from_secs(1), 2.0);
        assert_eq!(policy.delay(11), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_jitter_matches_formula() {
        let policy = exp(30, Duration::from_millis(5_000), 1.5);
        for attempt in 1..20u32 {
            let expected_ms = (30.0 * 1.5f64.powi(attempt as i32 - 1)).min(5_000.0);
            let got = policy.delay(attempt).as_secs_f64() * 1000.0;
            assert!(
                (got - expected_ms).abs() < 1e-3,
                "attempt {}: got {}ms expected {}ms",
                attempt,
                got,
                expected_ms
            );
        }
    }

    #[test]
    fn test_jitter_within_band() {
        let policy = BackoffPolicy::new(
            Duration::from_millis(100),
            Duration::from_secs(2),
            2.0,
            JitterPolicy::new(0.3).unwrap(),
        )
        .unwrap();

        for attempt in 1..8u32 {
            let clamped = policy.nominal(attempt);
            let lo = clamped.mul_f64(0.7).saturating_sub(Duration::from_micros(1));
            let hi = (clamped.mul_f64(1.3) + Duration::from_micros(1)).min(policy.max());
            for _ in 0..100 {
                let delay = policy.delay(attempt);
                assert!(delay >= lo, "attempt {}: {:?} < {:?}", attempt, delay, lo);
                assert!(delay <= hi, "attempt {}: {:?} > {:?}", attempt, delay, hi);
            }
        }
    }

    #[test]
    fn test_rejects_small_multiplier() {
        let err = BackoffPolicy::new(
            Duration::from_millis(100),
            Duration::from_secs(1),
            0.5,
            JitterPolicy::NONE,
        )
        .unwrap_err();
        assert_eq!(err, PolicyError::InvalidMultiplier { multiplier: 0.5 });
    }

    #[test]
    fn test_rejects_non_finite_multiplier() {
        let res = BackoffPolicy::new(
            Duration::from_millis(100),
            Duration::from_secs(1),
            f64::INFINITY,
            JitterPolicy::NONE,
        );
        assert!(matches!(res, Err(PolicyError::InvalidMultiplier { .. })));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let res = BackoffPolicy::new(
            Duration::from_secs(10),
            Duration::from_secs(5),
            2.0,
            JitterPolicy::NONE,
        );
        assert!(matches!(res, Err(PolicyError::InvertedDelayBounds { .. })));
    }

    #[test]
    fn test_zero_base_stays_zero() {
        let policy = exp(0, Duration::from_secs(1), 3.0);
        assert_eq!(policy.delay(1), Duration::ZERO);
        assert_eq!(policy.delay(50), Duration::ZERO);
    }

    #[test]
    fn test_huge_attempt_clamps_to_max() {
        let policy = exp(100, Duration::from_secs(60), 2.0);
        assert_eq!(policy.delay(100), Duration::from_secs(60));
    }

    #[test]
    fn test_non_finite_overflow_clamps_to_max() {
        let policy = exp(100, Duration::from_secs(10), 2.0);
        assert_eq!(policy.delay(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_uncapped_max_never_panics() {
        let flat =
            BackoffPolicy::new(Duration::MAX, Duration::MAX, 1.0, JitterPolicy::NONE).unwrap();
        assert_eq!(flat.delay(1), Duration::MAX);
        assert_eq!(flat.delay(7), Duration::MAX);

        let growing =
            BackoffPolicy::new(Duration::from_secs(1), Duration::MAX, 2.0, JitterPolicy::NONE)
                .unwrap();
        assert_eq!(growing.delay(1), Duration::from_secs(1));
        assert_eq!(growing.delay(65), Duration::MAX);
        assert_eq!(growing.delay(u32::MAX), Duration::MAX);

        let jittered = BackoffPolicy::new(
            Duration::from_secs(1),
            Duration::MAX,
            2.0,
            JitterPolicy::new(1.0).unwrap(),
        )
        .unwrap();
        for attempt in [60, 64, 65, 1000] {
            assert!(jittered.delay(attempt) <= Duration::MAX);
        }
    }
}
