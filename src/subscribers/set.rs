//! # SubscriberSet: event delivery off the retry path.
//!
//! Every subscriber gets a **lane**: a bounded queue plus one worker task that
//! calls [`Subscribe::on_event`] in queue order. [`SubscriberSet::emit`] only
//! pushes into lanes, so a runner attached to the set never awaits an observer.
//!
//! ```text
//!   Runner(invocation 7) ─┐
//!   Runner(invocation 8) ─┼─► emit ─► accepts? ─► lane "log-writer" ─► worker
//!   Runner(invocation 9) ─┘                   └─► lane "metrics"    ─► worker
//! ```
//!
//! One set may serve many concurrent invocations; events stay tagged with their
//! `invocation` id, and each lane preserves the per-invocation order because a
//! runner emits sequentially.
//!
//! A lane that cannot keep up loses events: they are counted in
//! [`SubscriberSet::dropped`] and reported through `tracing`. A panicking
//! subscriber is logged and its lane keeps running.
//!
//! Construction spawns tasks and must happen inside a Tokio runtime. Await
//! [`SubscriberSet::shutdown`] to deliver what is still queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Subscribe;

/// Queue and worker serving one subscriber.
struct Lane {
    subscriber: Arc<dyn Subscribe>,
    queue: mpsc::Sender<Arc<Event>>,
    worker: JoinHandle<()>,
}

/// Non-blocking fan-out of events to a fixed group of subscribers.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    dropped: AtomicU64,
}

impl SubscriberSet {
    /// Spawns one lane per subscriber.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let lanes = subscribers
            .into_iter()
            .map(|subscriber| {
                let (queue, rx) = mpsc::channel(subscriber.queue_capacity().max(1));
                let worker = tokio::spawn(deliver(Arc::clone(&subscriber), rx));
                Lane {
                    subscriber,
                    queue,
                    worker,
                }
            })
            .collect();

        Self {
            lanes,
            dropped: AtomicU64::new(0),
        }
    }

    /// Offers `event` to every subscriber whose filter accepts it. Never waits.
    pub fn emit(&self, event: Event) {
        if self.lanes.is_empty() {
            return;
        }
        let event = Arc::new(event);

        for lane in &self.lanes {
            if !lane.subscriber.accepts(&event) {
                continue;
            }
            if let Err(err) = lane.queue.try_send(Arc::clone(&event)) {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                let cause = match err {
                    mpsc::error::TrySendError::Full(_) => "queue full",
                    mpsc::error::TrySendError::Closed(_) => "worker gone",
                };
                tracing::warn!(
                    subscriber = lane.subscriber.name(),
                    invocation = event.invocation,
                    kind = event.kind.as_label(),
                    cause,
                    "event not delivered"
                );
            }
        }
    }

    /// Events discarded so far because a lane was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Closes every lane and waits until queued events are delivered.
    pub async fn shutdown(self) {
        let workers: Vec<JoinHandle<()>> = self
            .lanes
            .into_iter()
            .map(|lane| lane.worker)
            .collect();
        for worker in workers {
            let _ = worker.await;
        }
    }

    /// True if no subscriber is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }
}

/// Worker loop of one lane; ends when the sending side is dropped.
async fn deliver(subscriber: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>) {
    while let Some(ev) = rx.recv().await {
        let handled = std::panic::AssertUnwindSafe(subscriber.on_event(&ev))
            .catch_unwind()
            .await;
        if handled.is_err() {
            tracing::error!(
                subscriber = subscriber.name(),
                invocation = ev.invocation,
                seq = ev.seq,
                "subscriber panicked while handling event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder(Arc<Mutex<Vec<EventKind>>>);

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.0.lock().unwrap().push(event.kind);
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct TerminalOnly(Arc<Mutex<Vec<EventKind>>>);

    #[async_trait]
    impl Subscribe for TerminalOnly {
        async fn on_event(&self, event: &Event) {
            self.0.lock().unwrap().push(event.kind);
        }
        fn accepts(&self, event: &Event) -> bool {
            event.is_terminal()
        }
    }

    struct Tiny;

    #[async_trait]
    impl Subscribe for Tiny {
        async fn on_event(&self, _event: &Event) {}
        fn queue_capacity(&self) -> usize {
            1
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _event: &Event) {
            panic!("subscriber blew up");
        }
    }

    #[tokio::test]
    async fn test_lane_preserves_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let set = SubscriberSet::new(vec![Arc::new(Recorder(seen.clone())) as Arc<dyn Subscribe>]);
        assert_eq!(set.len(), 1);

        set.emit(Event::new(EventKind::AttemptStarting));
        set.emit(Event::new(EventKind::AttemptFailed));
        set.emit(Event::new(EventKind::Exhausted));
        set.shutdown().await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                EventKind::AttemptStarting,
                EventKind::AttemptFailed,
                EventKind::Exhausted
            ]
        );
    }

    #[tokio::test]
    async fn test_filter_skips_rejected_events() {
        let all = Arc::new(Mutex::new(Vec::new()));
        let terminal = Arc::new(Mutex::new(Vec::new()));
        let set = SubscriberSet::new(vec![
            Arc::new(Recorder(all.clone())) as Arc<dyn Subscribe>,
            Arc::new(TerminalOnly(terminal.clone())) as Arc<dyn Subscribe>,
        ]);

        set.emit(Event::new(EventKind::AttemptStarting));
        set.emit(Event::new(EventKind::BackoffScheduled));
        set.emit(Event::new(EventKind::Rejected));
        assert_eq!(set.dropped(), 0);
        set.shutdown().await;

        assert_eq!(all.lock().unwrap().len(), 3);
        assert_eq!(*terminal.lock().unwrap(), vec![EventKind::Rejected]);
    }

    #[tokio::test]
    async fn test_full_lane_counts_drops() {
        let set = SubscriberSet::new(vec![Arc::new(Tiny) as Arc<dyn Subscribe>]);

        // Current-thread runtime: the worker cannot drain before we yield.
        set.emit(Event::new(EventKind::AttemptStarting));
        set.emit(Event::new(EventKind::AttemptFailed));
        set.emit(Event::new(EventKind::Exhausted));

        assert_eq!(set.dropped(), 2);
        set.shutdown().await;
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_isolated() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let set = SubscriberSet::new(vec![
            Arc::new(Panicker) as Arc<dyn Subscribe>,
            Arc::new(Recorder(seen.clone())) as Arc<dyn Subscribe>,
        ]);

        set.emit(Event::new(EventKind::AttemptStarting));
        set.emit(Event::new(EventKind::Succeeded));
        set.shutdown().await;

        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_set_is_noop() {
        let set = SubscriberSet::new(Vec::new());
        assert!(set.is_empty());
        set.emit(Event::new(EventKind::Succeeded));
        assert_eq!(set.dropped(), 0);
        set.shutdown().await;
    }
}
