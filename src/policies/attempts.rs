//! # Attempt budget.
//!
//! [`Attempts`] decides whether another invocation of the action is allowed.
//!
//! - [`Attempts::Limited`] caps the **total** number of invocations (first try included).
//! - [`Attempts::Unlimited`] never exhausts; the loop only stops on success,
//!   a non-retryable error or cancellation.

/// Attempt budget of a retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attempts {
    /// At most `n` invocations in total (`n >= 1`, enforced when the policy is built).
    Limited(u32),
    /// No limit.
    Unlimited,
}

impl Default for Attempts {
    /// Returns [`Attempts::Limited`] with 3 invocations.
    fn default() -> Self {
        Attempts::Limited(3)
    }
}

impl Attempts {
    /// Maximum number of invocations, or `None` when unlimited.
    pub fn limit(&self) -> Option<u32> {
        match self {
            Attempts::Limited(n) => Some(*n),
            Attempts::Unlimited => None,
        }
    }

    /// True if no further invocation is allowed after `attempt` invocations.
    #[inline]
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        match self {
            Attempts::Limited(n) => attempt >= *n,
            Attempts::Unlimited => false,
        }
    }
}
