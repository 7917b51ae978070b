use std::time::Duration;

use crate::core::Config;
use crate::error::PolicyError;
use crate::policies::{Attempts, BackoffPolicy, JitterPolicy, RetryAll, RetryPolicy};

/// Builder for [`RetryPolicy`] with fluent API.
///
/// Setters only record values; later calls override earlier ones.
/// All validation happens once, in [`RetryPolicyBuilder::build`].
#[derive(Clone, Debug)]
pub struct RetryPolicyBuilder<C = RetryAll> {
    attempts: Attempts,
    base_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
    classifier: C,
}

impl RetryPolicyBuilder {
    /// Creates a new builder with the given attempt budget.
    pub fn new(attempts: Attempts) -> Self {
        let backoff = BackoffPolicy::default();
        Self {
            attempts,
            base_delay: backoff.base(),
            max_delay: backoff.max(),
            multiplier: backoff.multiplier(),
            jitter: backoff.jitter().fraction(),
            classifier: RetryAll,
        }
    }
}

impl<C> RetryPolicyBuilder<C> {
    pub fn with_attempts(mut self, attempts: Attempts) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter fraction (`0.0` = none, `1.0` = ±100%).
    pub fn with_jitter(mut self, fraction: f64) -> Self {
        self.jitter = fraction;
        self
    }

    /// Copies every field of an already validated backoff policy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.base_delay = backoff.base();
        self.max_delay = backoff.max();
        self.multiplier = backoff.multiplier();
        self.jitter = backoff.jitter().fraction();
        self
    }

    /// Overrides attempts and backoff fields from a [`Config`].
    pub fn with_config(mut self, config: &Config) -> Self {
        self.attempts = config.attempts();
        self.base_delay = config.base_delay;
        self.max_delay = config.max_delay;
        self.multiplier = config.multiplier;
        self.jitter = config.jitter;
        self
    }

    /// Replaces the classifier. Accepts any `Fn(&E) -> bool` or [`Classify`](crate::Classify) type.
    pub fn retry_if<C2>(self, classifier: C2) -> RetryPolicyBuilder<C2> {
        RetryPolicyBuilder {
            attempts: self.attempts,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            multiplier: self.multiplier,
            jitter: self.jitter,
            classifier,
        }
    }

    /// Validates the collected values and builds the policy.
    ///
    /// # Errors
    /// - [`PolicyError::ZeroAttempts`] for `Attempts::Limited(0)`;
    /// - [`PolicyError::InvalidJitter`] for a fraction outside `[0, 1]`;
    /// - [`PolicyError::InvalidMultiplier`] for a multiplier below 1.0 or non-finite;
    /// - [`PolicyError::InvertedDelayBounds`] when `max_delay < base_delay`.
    pub fn build(self) -> Result<RetryPolicy<C>, PolicyError> {
        if self.attempts == Attempts::Limited(0) {
            return Err(PolicyError::ZeroAttempts);
        }
        let jitter = JitterPolicy::new(self.jitter)?;
        let backoff = BackoffPolicy::new(self.base_delay, self.max_delay, self.multiplier, jitter)?;
        Ok(RetryPolicy::from_parts(self.attempts, backoff, self.classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Classify;

    #[test]
    fn test_last_writer_wins() {
        let policy = RetryPolicy::builder(Attempts::Limited(2))
            .with_base_delay(Duration::from_millis(10))
            .with_base_delay(Duration::from_millis(20))
            .with_attempts(Attempts::Limited(7))
            .with_jitter(0.5)
            .with_jitter(0.0)
            .build()
            .unwrap();

        assert_eq!(policy.attempts(), Attempts::Limited(7));
        assert_eq!(policy.backoff().base(), Duration::from_millis(20));
        assert!(policy.backoff().jitter().is_none());
    }

    #[test]
    fn test_invalid_value_overridden_later_is_fine() {
        let res = RetryPolicy::builder(Attempts::Limited(1))
            .with_multiplier(0.1)
            .with_multiplier(1.5)
            .build();
        assert!(res.is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let res = RetryPolicy::builder(Attempts::Limited(0)).build();
        assert_eq!(res.unwrap_err(), PolicyError::ZeroAttempts);
    }

    #[test]
    fn test_jitter_out_of_range_rejected() {
        let res = RetryPolicy::builder(Attempts::Limited(3))
            .with_jitter(1.5)
            .build();
        assert_eq!(res.unwrap_err(), PolicyError::InvalidJitter { jitter: 1.5 });
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let res = RetryPolicy::builder(Attempts::Unlimited)
            .with_base_delay(Duration::from_secs(3))
            .with_max_delay(Duration::from_secs(1))
            .build();
        assert!(matches!(res, Err(PolicyError::InvertedDelayBounds { .. })));
    }

    #[test]
    fn test_retry_if_swaps_classifier() {
        let policy = RetryPolicy::builder(Attempts::Limited(3))
            .retry_if(|code: &u16| *code >= 500)
            .build()
            .unwrap();
        assert!(policy.classifier().is_retryable(&503u16));
        assert!(!policy.is_retryable(&404u16));
    }

    #[test]
    fn test_with_backoff_copies_fields() {
        let backoff = BackoffPolicy::new(
            Duration::from_millis(5),
            Duration::from_millis(80),
            3.0,
            JitterPolicy::new(0.1).unwrap(),
        )
        .unwrap();
        let policy = RetryPolicy::builder(Attempts::default())
            .with_backoff(backoff)
            .build()
            .unwrap();
        assert_eq!(policy.backoff(), &backoff);
        assert_eq!(policy.attempts(), Attempts::default());
    }
}
