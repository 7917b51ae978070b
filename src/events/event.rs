//! # Events emitted by the attempt loop.
//!
//! The [`EventKind`] enum classifies event types in two groups:
//! - **Progress events**: one attempt's flow (starting, failed, backoff scheduled)
//! - **Terminal events**: how the invocation ended (succeeded, exhausted, rejected, canceled)
//!
//! The [`Event`] struct carries metadata such as timestamps, attempt number, the
//! scheduled delay and a failure reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Correlation
//! Every [`Runner::run`](crate::Runner::run) call draws a fresh `invocation` id and stamps
//! it on all of its events, so one subscriber set shared by concurrent invocations can
//! still split the stream per call. Events built by hand carry `invocation = 0`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::BackoffScheduled)
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(200))
//!     .with_reason("connection reset");
//!
//! assert_eq!(ev.kind, EventKind::BackoffScheduled);
//! assert_eq!(ev.delay, Some(Duration::from_millis(200)));
//! assert_eq!(ev.reason.as_deref(), Some("connection reset"));
//! assert!(!ev.is_terminal());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Invocation ids start at 1; `0` marks events not tied to a runner call.
static INVOCATION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Allocates the id shared by all events of one invocation.
pub(crate) fn next_invocation() -> u64 {
    INVOCATION_SEQ.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Classification of attempt-loop events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Progress events ===
    /// An attempt is about to invoke the action.
    ///
    /// Sets:
    /// - `attempt`: attempt number (1-based)
    AttemptStarting,

    /// The action returned an error for this attempt.
    ///
    /// Sets:
    /// - `attempt`: attempt number
    /// - `reason`: error message
    AttemptFailed,

    /// The next attempt was scheduled after a retryable failure.
    ///
    /// Sets:
    /// - `attempt`: the attempt that just failed
    /// - `delay`: wait before the next attempt
    /// - `reason`: error message of the failed attempt
    BackoffScheduled,

    // === Terminal events ===
    /// The action succeeded.
    ///
    /// Sets:
    /// - `attempt`: the successful attempt number
    Succeeded,

    /// The attempt budget ran out.
    ///
    /// Sets:
    /// - `attempt`: last attempt number
    /// - `reason`: last error message
    Exhausted,

    /// The classifier rejected the error; no further attempts.
    ///
    /// Sets:
    /// - `attempt`: rejected attempt number
    /// - `reason`: rejected error message
    Rejected,

    /// The cancellation token fired before the next attempt.
    ///
    /// Sets:
    /// - `attempt`: number of attempts completed
    Canceled,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::AttemptStarting => "attempt_starting",
            EventKind::AttemptFailed => "attempt_failed",
            EventKind::BackoffScheduled => "backoff_scheduled",
            EventKind::Succeeded => "succeeded",
            EventKind::Exhausted => "exhausted",
            EventKind::Rejected => "rejected",
            EventKind::Canceled => "canceled",
        }
    }
}

/// Attempt-loop event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `invocation`: id of the runner call that produced the event
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Runner call this event belongs to (`0` when built outside a runner).
    pub invocation: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Attempt number (starting from 1; `0` if cancelled before the first attempt).
    pub attempt: Option<u32>,
    /// Delay before the next attempt.
    pub delay: Option<Duration>,
    /// Human-readable reason (usually the action's error message).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            invocation: 0,
            at: SystemTime::now(),
            kind,
            attempt: None,
            delay: None,
            reason: None,
        }
    }

    /// Tags the event with the invocation it belongs to.
    #[inline]
    pub fn with_invocation(mut self, id: u64) -> Self {
        self.invocation = id;
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a backoff delay.
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for events that end an invocation.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::Succeeded | EventKind::Exhausted | EventKind::Rejected | EventKind::Canceled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::AttemptStarting);
        let b = Event::new(EventKind::AttemptFailed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_invocation_ids_are_distinct_and_non_zero() {
        let a = next_invocation();
        let b = next_invocation();
        assert_ne!(a, 0);
        assert!(b > a);

        assert_eq!(Event::new(EventKind::Succeeded).invocation, 0);
        assert_eq!(Event::new(EventKind::Succeeded).with_invocation(a).invocation, a);
    }

    #[test]
    fn test_terminal_kinds() {
        assert!(Event::new(EventKind::Exhausted).is_terminal());
        assert!(Event::new(EventKind::Canceled).is_terminal());
        assert!(!Event::new(EventKind::BackoffScheduled).is_terminal());
    }
}
