//! # Runner: drives one retry invocation.
//!
//! Invokes a fallible action under a [`RetryPolicy`]:
//! - stops per [`Attempts`](crate::Attempts) budget,
//! - stops early when the classifier rejects an error,
//! - waits per [`BackoffPolicy`](crate::BackoffPolicy) between attempts,
//! - cooperative cancellation via [`CancellationToken`].
//!
//! ## State machine
//! ```text
//!   Ready ──► Invoking ──► Ok ─────────────────────────────► Success
//!                ▲          │
//!                │          └─► Err(e) ─► Evaluating
//!                │                          ├─ budget reached ──► Failed(Exhausted { e })
//!                │                          ├─ !retryable(e) ───► Failed(Rejected { e })
//!                │                          └─ otherwise ───────► Retrying
//!                │                                                  │
//!                │              delay = backoff.delay(attempt)       │
//!                │              select! { cancelled, sleep(delay) }  │
//!                └──────────────────────── sleep elapsed ◄──────────┤
//!                                          cancelled ─► Failed(Canceled)
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially** within one invocation (never parallel)
//! - Attempt counter **increments before each invocation** (1-based)
//! - Cancellation is checked **before each invocation** and **during every wait**
//! - An in-flight action is **never aborted**; cancellation only prevents the next one
//! - The delay wait is the **only** suspension point besides the action itself
//! - Events are emitted without awaiting subscribers

use std::fmt;
use std::future::Future;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    error::RetryError,
    events::{Event, EventKind, next_invocation},
    policies::{Classify, RetryAll, RetryPolicy},
    subscribers::SubscriberSet,
};

/// Drives the attempt loop for a borrowed [`RetryPolicy`].
///
/// A runner is cheap to create; it borrows the policy and, optionally, a
/// [`SubscriberSet`] that receives lifecycle events.
///
/// # Example
/// ```rust
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use retryvisor::{Attempts, RetryPolicy, Runner};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let policy = RetryPolicy::builder(Attempts::Limited(4))
///     .with_base_delay(Duration::from_millis(1))
///     .build()
///     .unwrap();
/// let token = CancellationToken::new();
/// let calls = AtomicU32::new(0);
/// let calls = &calls;
///
/// let res = Runner::new(&policy)
///     .run(&token, move || async move {
///         let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
///         if n < 3 { Err(format!("attempt {n} failed")) } else { Ok(n) }
///     })
///     .await;
///
/// assert_eq!(res.unwrap(), 3);
/// # }
/// ```
pub struct Runner<'a, C = RetryAll> {
    policy: &'a RetryPolicy<C>,
    subscribers: Option<&'a SubscriberSet>,
}

impl<'a, C> Runner<'a, C> {
    /// Creates a runner for `policy` without subscribers.
    pub fn new(policy: &'a RetryPolicy<C>) -> Self {
        Self {
            policy,
            subscribers: None,
        }
    }

    /// Publishes lifecycle events of every invocation to `subscribers`.
    pub fn with_subscribers(mut self, subscribers: &'a SubscriberSet) -> Self {
        self.subscribers = Some(subscribers);
        self
    }

    /// Policy driving this runner.
    pub fn policy(&self) -> &RetryPolicy<C> {
        self.policy
    }

    /// Runs `action` until it succeeds, the policy gives up, or `token` is cancelled.
    ///
    /// ### Returns
    /// - `Ok(value)` from the first successful attempt
    /// - [`RetryError::Exhausted`] with the last error once the budget is spent
    /// - [`RetryError::Rejected`] with the first error the classifier refuses
    /// - [`RetryError::Canceled`] when `token` fires before or between attempts
    ///
    /// ### Cancellation semantics
    /// - Checked before each invocation (a cancelled token means zero further calls)
    /// - Races the backoff sleep; cancellation wins ties
    /// - Never interrupts an action that is already running
    pub async fn run<T, E, F, Fut>(
        &self,
        token: &CancellationToken,
        mut action: F,
    ) -> Result<T, RetryError<E>>
    where
        C: Classify<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let invocation = next_invocation();
        let mut attempt: u32 = 0;

        loop {
            if token.is_cancelled() {
                self.publish(invocation, || Event::new(EventKind::Canceled).with_attempt(attempt));
                return Err(RetryError::Canceled { attempts: attempt });
            }

            attempt = attempt.saturating_add(1);
            self.publish(invocation, || {
                Event::new(EventKind::AttemptStarting).with_attempt(attempt)
            });

            let error = match action().await {
                Ok(value) => {
                    self.publish(invocation, || {
                        Event::new(EventKind::Succeeded).with_attempt(attempt)
                    });
                    return Ok(value);
                }
                Err(e) => e,
            };
            self.publish(invocation, || failure(EventKind::AttemptFailed, attempt, &error));

            if self.policy.attempts().is_exhausted(attempt) {
                self.publish(invocation, || failure(EventKind::Exhausted, attempt, &error));
                return Err(RetryError::Exhausted {
                    error,
                    attempts: attempt,
                });
            }
            if !self.policy.is_retryable(&error) {
                self.publish(invocation, || failure(EventKind::Rejected, attempt, &error));
                return Err(RetryError::Rejected {
                    error,
                    attempts: attempt,
                });
            }

            let delay = self.policy.backoff().delay(attempt);
            self.publish(invocation, || {
                failure(EventKind::BackoffScheduled, attempt, &error).with_delay(delay)
            });

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                biased;
                _ = token.cancelled() => {
                    self.publish(invocation, || {
                        Event::new(EventKind::Canceled).with_attempt(attempt)
                    });
                    return Err(RetryError::Canceled { attempts: attempt });
                }
                _ = &mut sleep => {}
            }
        }
    }

    /// Builds, tags and emits an event only when someone listens.
    #[inline]
    fn publish(&self, invocation: u64, event: impl FnOnce() -> Event) {
        if let Some(subs) = self.subscribers.filter(|s| !s.is_empty()) {
            subs.emit(event().with_invocation(invocation));
        }
    }
}

/// Event for a failed attempt, carrying the error message as reason.
fn failure<E: fmt::Display>(kind: EventKind, attempt: u32, error: &E) -> Event {
    Event::new(kind)
        .with_attempt(attempt)
        .with_reason(error.to_string())
}

/// Retries `action` with [`RetryPolicy::default`]: 3 attempts, 100ms base delay,
/// ×2.0 growth, 30s cap, no jitter, every error retryable.
///
/// # Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let value = retryvisor::retry(&token, || async { Ok::<_, std::io::Error>(42) })
///     .await
///     .unwrap();
/// assert_eq!(value, 42);
/// # }
/// ```
pub async fn retry<T, E, F, Fut>(token: &CancellationToken, action: F) -> Result<T, RetryError<E>>
where
    E: fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let policy = RetryPolicy::default();
    policy.run(token, action).await
}

/// Retries `action` without an attempt limit, using the default backoff.
///
/// Stops only on success or when `token` is cancelled, since every error is
/// retryable under the default classifier. To stop on permanent errors, build a
/// policy with [`Attempts::Unlimited`](crate::Attempts::Unlimited) and `retry_if`.
pub async fn retry_forever<T, E, F, Fut>(
    token: &CancellationToken,
    action: F,
) -> Result<T, RetryError<E>>
where
    E: fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let policy = RetryPolicy::unbounded();
    policy.run(token, action).await
}
