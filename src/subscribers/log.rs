//! # Logging subscriber backed by `tracing`.
//!
//! [`LogWriter`] turns every retry event into a structured `tracing` record.
//! Install any `tracing` subscriber (e.g. `tracing-subscriber`'s `fmt`) to see them.
//!
//! ## Output (with the `fmt` subscriber)
//! ```text
//! DEBUG retryvisor: attempt starting invocation=1 attempt=1
//! DEBUG retryvisor: attempt failed invocation=1 attempt=1 reason="connection refused"
//! DEBUG retryvisor: backoff scheduled invocation=1 attempt=1 delay_ms=100 reason="connection refused"
//!  INFO retryvisor: succeeded invocation=1 attempt=2
//!  WARN retryvisor: retries exhausted invocation=2 attempt=3 reason="connection refused"
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use retryvisor::{LogWriter, SubscriberSet};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let subs = SubscriberSet::new(vec![Arc::new(LogWriter) as Arc<dyn retryvisor::Subscribe>]);
//! // pass `&subs` to `Runner::with_subscribers`
//! subs.shutdown().await;
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;

use crate::Subscribe;
use crate::events::{Event, EventKind};

/// Subscriber that forwards events to `tracing`.
///
/// Progress events are logged at `DEBUG`, success at `INFO`, and
/// unsuccessful terminal events at `WARN`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let invocation = e.invocation;
        let attempt = e.attempt.unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::AttemptStarting => {
                tracing::debug!(target: "retryvisor", invocation, attempt, "attempt starting");
            }
            EventKind::AttemptFailed => {
                tracing::debug!(target: "retryvisor", invocation, attempt, reason, "attempt failed");
            }
            EventKind::BackoffScheduled => {
                let delay_ms = delay_millis(e.delay);
                tracing::debug!(
                    target: "retryvisor",
                    invocation,
                    attempt,
                    delay_ms,
                    reason,
                    "backoff scheduled"
                );
            }
            EventKind::Succeeded => {
                tracing::info!(target: "retryvisor", invocation, attempt, "succeeded");
            }
            EventKind::Exhausted => {
                tracing::warn!(
                    target: "retryvisor",
                    invocation,
                    attempt,
                    reason,
                    "retries exhausted"
                );
            }
            EventKind::Rejected => {
                tracing::warn!(
                    target: "retryvisor",
                    invocation,
                    attempt,
                    reason,
                    "non-retryable error"
                );
            }
            EventKind::Canceled => {
                tracing::warn!(target: "retryvisor", invocation, attempt, "retry canceled");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

/// Delay in whole milliseconds, saturating for delays beyond `u64::MAX` ms.
fn delay_millis(delay: Option<Duration>) -> u64 {
    delay.map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubscriberSet;
    use std::sync::Arc;

    #[test]
    fn test_delay_millis_saturates() {
        assert_eq!(delay_millis(None), 0);
        assert_eq!(delay_millis(Some(Duration::from_millis(250))), 250);
        assert_eq!(delay_millis(Some(Duration::MAX)), u64::MAX);
    }

    #[tokio::test]
    async fn test_handles_every_kind() {
        let set = SubscriberSet::new(vec![Arc::new(LogWriter) as Arc<dyn Subscribe>]);
        for kind in [
            EventKind::AttemptStarting,
            EventKind::AttemptFailed,
            EventKind::Succeeded,
            EventKind::Exhausted,
            EventKind::Rejected,
            EventKind::Canceled,
        ] {
            set.emit(Event::new(kind).with_attempt(1).with_reason("boom"));
        }
        set.emit(
            Event::new(EventKind::BackoffScheduled)
                .with_attempt(1)
                .with_delay(Duration::MAX),
        );
        assert_eq!(set.dropped(), 0);
        set.shutdown().await;
    }
}
