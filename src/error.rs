//! Error types used by retry policies and the attempt loop.
//!
//! This module defines two main error enums:
//!
//! - [`PolicyError`]: invalid policy configuration, raised when a policy is built.
//! - [`RetryError`]: the single terminal error of one retry invocation.
//!
//! Both types provide `as_label` for logging/metrics. [`RetryError`] always keeps the
//! original action error (except for cancellation), so callers can match on it,
//! borrow it via [`RetryError::inner`] or reach it through [`std::error::Error::source`].

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while building a retry policy.
///
/// Misconfiguration is rejected up front, before any attempt is made.
/// Values are never silently clamped into range.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// A bounded attempt budget of zero would never invoke the action.
    #[error("attempt limit must be at least 1")]
    ZeroAttempts,

    /// Backoff multiplier is below 1.0 or not a finite number.
    #[error("backoff multiplier must be a finite number >= 1.0, got {multiplier}")]
    InvalidMultiplier {
        /// The rejected multiplier.
        multiplier: f64,
    },

    /// Jitter fraction is outside `[0, 1]` or not a number.
    #[error("jitter fraction must be within [0, 1], got {jitter}")]
    InvalidJitter {
        /// The rejected jitter fraction.
        jitter: f64,
    },

    /// Maximum delay is smaller than the base delay.
    #[error("max delay {max:?} is smaller than base delay {base:?}")]
    InvertedDelayBounds {
        /// Configured base delay.
        base: Duration,
        /// Configured maximum delay.
        max: Duration,
    },
}

impl PolicyError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retryvisor::PolicyError;
    ///
    /// let err = PolicyError::InvalidJitter { jitter: 1.5 };
    /// assert_eq!(err.as_label(), "policy_invalid_jitter");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PolicyError::ZeroAttempts => "policy_zero_attempts",
            PolicyError::InvalidMultiplier { .. } => "policy_invalid_multiplier",
            PolicyError::InvalidJitter { .. } => "policy_invalid_jitter",
            PolicyError::InvertedDelayBounds { .. } => "policy_inverted_delay_bounds",
        }
    }
}

/// # Terminal error of one retry invocation.
///
/// Exactly one of three outcomes:
/// - [`RetryError::Exhausted`]: the attempt budget ran out; carries the last action error.
/// - [`RetryError::Rejected`]: the classifier refused to retry; carries that error.
/// - [`RetryError::Canceled`]: the cancellation token fired before the next attempt.
///
/// The attempt count is additive metadata. The action's own error stays intact and is
/// exposed as the [`source`](std::error::Error::source) of this error.
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// Every allowed attempt failed with a retryable error.
    #[error("gave up after {attempts} attempt(s): {error}")]
    Exhausted {
        /// Error returned by the last attempt.
        #[source]
        error: E,
        /// Number of attempts made.
        attempts: u32,
    },

    /// The classifier marked the error as non-retryable.
    #[error("non-retryable error on attempt {attempts}: {error}")]
    Rejected {
        /// Error returned by the rejected attempt.
        #[source]
        error: E,
        /// Number of attempts made (including the rejected one).
        attempts: u32,
    },

    /// The cancellation token fired before or while waiting for the next attempt.
    #[error("retry canceled after {attempts} attempt(s)")]
    Canceled {
        /// Number of attempts completed before cancellation was observed.
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Number of times the action was invoked.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. }
            | RetryError::Rejected { attempts, .. }
            | RetryError::Canceled { attempts } => *attempts,
        }
    }

    /// Borrows the action error, if this outcome carries one.
    pub fn inner(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { error, .. } | RetryError::Rejected { error, .. } => Some(error),
            RetryError::Canceled { .. } => None,
        }
    }

    /// Consumes the error and returns the action error, if any.
    ///
    /// # Example
    /// ```
    /// use retryvisor::RetryError;
    ///
    /// let err = RetryError::Exhausted { error: "boom", attempts: 3 };
    /// assert_eq!(err.into_inner(), Some("boom"));
    ///
    /// let canceled: RetryError<&str> = RetryError::Canceled { attempts: 1 };
    /// assert_eq!(canceled.into_inner(), None);
    /// ```
    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::Exhausted { error, .. } | RetryError::Rejected { error, .. } => Some(error),
            RetryError::Canceled { .. } => None,
        }
    }

    /// True if the invocation stopped because of external cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RetryError::Canceled { .. })
    }

    /// True if the attempt budget was exhausted.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// True if the classifier refused to retry.
    pub fn is_rejected(&self) -> bool {
        matches!(self, RetryError::Rejected { .. })
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Exhausted { .. } => "retry_exhausted",
            RetryError::Rejected { .. } => "retry_rejected",
            RetryError::Canceled { .. } => "retry_canceled",
        }
    }
}
