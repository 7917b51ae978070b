//! # Observer hook for retry invocations.
//!
//! Implement [`Subscribe`] to watch what the attempt loop does: count failures,
//! export delays as metrics, keep an audit trail per invocation.
//!
//! Delivery runs on a worker task owned by [`SubscriberSet`](crate::SubscriberSet),
//! never on the task that is retrying. A subscriber therefore pays for its own
//! slowness: once its queue is full, further events for it are discarded and
//! counted in [`SubscriberSet::dropped`](crate::SubscriberSet::dropped).
//!
//! [`Subscribe::accepts`] is evaluated on the emitting side, before anything is
//! queued. Use it to narrow a subscriber to terminal events or to a single
//! `invocation`.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use async_trait::async_trait;
//! use retryvisor::{Event, EventKind, Subscribe};
//!
//! /// Counts how often a retry loop gave up.
//! #[derive(Default)]
//! struct GaveUp(AtomicU64);
//!
//! #[async_trait]
//! impl Subscribe for GaveUp {
//!     async fn on_event(&self, _ev: &Event) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn accepts(&self, ev: &Event) -> bool {
//!         matches!(ev.kind, EventKind::Exhausted | EventKind::Rejected)
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "gave-up"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receiver of attempt-loop events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes one accepted event. Panics are caught by the owning set.
    async fn on_event(&self, event: &Event);

    /// Filter applied before queueing; rejected events cost no queue slot.
    fn accepts(&self, _event: &Event) -> bool {
        true
    }

    /// Label used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Bound of the queue feeding this subscriber (minimum 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
