//! # Retry policy: attempt budget, backoff and error classification.
//!
//! [`RetryPolicy`] bundles everything the attempt loop needs to decide **whether**
//! to try again and **how long** to wait first:
//! - [`Attempts`]: bounded or unbounded budget;
//! - [`BackoffPolicy`]: exponential delays with cap and jitter;
//! - a classifier ([`Classify`]): which errors are worth retrying.
//!
//! A policy is immutable once built and holds no mutable state, so one instance
//! can drive any number of concurrent invocations.
//!
//! ## Quick wiring
//! ```text
//! RetryPolicy::builder(Attempts) ─► with_* setters ─► build() ─► RetryPolicy
//!      └─► Runner::new(&policy).run(&token, action)
//!           - attempts.is_exhausted(n) to stop
//!           - classifier.is_retryable(&e) to stop early
//!           - backoff.delay(n) to schedule the next attempt
//! ```

use std::fmt;
use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::core::{Config, Runner};
use crate::error::{PolicyError, RetryError};
use crate::policies::builder::RetryPolicyBuilder;
use crate::policies::{Attempts, BackoffPolicy, Classify, RetryAll};

/// Immutable retry configuration.
///
/// Built through [`RetryPolicy::builder`] (validated) or taken from
/// [`RetryPolicy::default`] / [`RetryPolicy::unbounded`].
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use retryvisor::{Attempts, RetryPolicy};
///
/// let policy = RetryPolicy::builder(Attempts::Limited(5))
///     .with_base_delay(Duration::from_millis(50))
///     .with_max_delay(Duration::from_secs(2))
///     .with_multiplier(2.0)
///     .with_jitter(0.2)
///     .retry_if(|e: &std::io::Error| e.kind() != std::io::ErrorKind::NotFound)
///     .build()
///     .unwrap();
///
/// assert_eq!(policy.attempts(), Attempts::Limited(5));
/// assert_eq!(policy.backoff().base(), Duration::from_millis(50));
/// ```
#[derive(Clone)]
pub struct RetryPolicy<C = RetryAll> {
    attempts: Attempts,
    backoff: BackoffPolicy,
    classifier: C,
}

impl Default for RetryPolicy {
    /// Returns a policy with:
    /// - `attempts = 3`;
    /// - `BackoffPolicy::default()` (100ms base, ×2.0, 30s cap, no jitter);
    /// - every error retryable.
    fn default() -> Self {
        Self {
            attempts: Attempts::default(),
            backoff: BackoffPolicy::default(),
            classifier: RetryAll,
        }
    }
}

impl RetryPolicy {
    /// Starts a builder with the given attempt budget and default everything else.
    pub fn builder(attempts: Attempts) -> RetryPolicyBuilder {
        RetryPolicyBuilder::new(attempts)
    }

    /// Default backoff with no attempt limit.
    pub fn unbounded() -> Self {
        Self {
            attempts: Attempts::Unlimited,
            ..Self::default()
        }
    }

    /// Builds a policy from a [`Config`], validating it the same way as the builder.
    ///
    /// # Errors
    /// Any [`PolicyError`] the configured values trigger.
    pub fn from_config(config: &Config) -> Result<Self, PolicyError> {
        RetryPolicyBuilder::new(config.attempts())
            .with_config(config)
            .build()
    }
}

impl<C> RetryPolicy<C> {
    pub(crate) fn from_parts(attempts: Attempts, backoff: BackoffPolicy, classifier: C) -> Self {
        Self {
            attempts,
            backoff,
            classifier,
        }
    }

    /// Attempt budget.
    pub fn attempts(&self) -> Attempts {
        self.attempts
    }

    /// Backoff used between attempts.
    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    /// Error classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Asks the classifier whether `error` may be retried.
    #[inline]
    pub fn is_retryable<E: ?Sized>(&self, error: &E) -> bool
    where
        C: Classify<E>,
    {
        self.classifier.is_retryable(error)
    }

    /// Runs `action` under this policy without subscribers.
    ///
    /// Shorthand for `Runner::new(self).run(token, action)`.
    pub async fn run<T, E, F, Fut>(
        &self,
        token: &CancellationToken,
        action: F,
    ) -> Result<T, RetryError<E>>
    where
        C: Classify<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        Runner::new(self).run(token, action).await
    }
}

impl<C> fmt::Debug for RetryPolicy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("attempts", &self.attempts)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_is_bounded() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), Attempts::Limited(3));
        assert_eq!(policy.backoff().base(), Duration::from_millis(100));
        assert!(policy.is_retryable("anything"));
    }

    #[test]
    fn test_unbounded_keeps_default_backoff() {
        let policy = RetryPolicy::unbounded();
        assert_eq!(policy.attempts(), Attempts::Unlimited);
        assert_eq!(policy.backoff(), &BackoffPolicy::default());
    }

    #[test]
    fn test_from_config_sentinel_zero_is_unbounded() {
        let cfg = Config {
            max_attempts: 0,
            ..Config::default()
        };
        let policy = RetryPolicy::from_config(&cfg).unwrap();
        assert_eq!(policy.attempts(), Attempts::Unlimited);
    }

    #[test]
    fn test_from_config_rejects_bad_values() {
        let cfg = Config {
            multiplier: 0.9,
            ..Config::default()
        };
        assert!(matches!(
            RetryPolicy::from_config(&cfg),
            Err(PolicyError::InvalidMultiplier { .. })
        ));
    }

    #[test]
    fn test_debug_omits_classifier() {
        let policy = RetryPolicy::builder(Attempts::Limited(2))
            .retry_if(|_: &str| false)
            .build()
            .unwrap();
        let dbg = format!("{policy:?}");
        assert!(dbg.starts_with("RetryPolicy"));
        assert!(dbg.contains("Limited(2)"));
    }
}
