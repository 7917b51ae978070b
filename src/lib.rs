//! # retryvisor
//!
//! **Retryvisor** is a small, runtime-friendly retry engine for async Rust.
//!
//! It invokes a fallible async action repeatedly under a [`RetryPolicy`]:
//! bounded or unbounded attempts, exponential backoff with optional jitter,
//! a caller-supplied classifier for permanent errors, and cooperative
//! cancellation through a [`CancellationToken`](tokio_util::sync::CancellationToken).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Config ──► RetryPolicyBuilder ──► RetryPolicy (immutable, shareable)
//!                                          │
//!                        ┌─────────────────┼─────────────────┐
//!                        ▼                 ▼                 ▼
//!                     Runner            Runner            Runner     (one per invocation)
//!                  (attempt loop)    (attempt loop)    (attempt loop)
//!                        │
//!                        │ emits Events (non-blocking):
//!                        │ - AttemptStarting / AttemptFailed
//!                        │ - BackoffScheduled
//!                        │ - Succeeded / Exhausted / Rejected / Canceled
//!                        ▼
//!               ┌───────────────────┐
//!               │   SubscriberSet   │
//!               │ (per-sub queues)  │
//!               └───┬──────────┬────┘
//!                   ▼          ▼
//!               LogWriter   custom Subscribe impls
//! ```
//!
//! ### Lifecycle
//! ```text
//! loop {
//!   ├─► token cancelled?            ─► Err(Canceled { attempts })
//!   ├─► attempt += 1
//!   ├─► publish AttemptStarting{ attempt }
//!   ├─► action().await
//!   │       ├─ Ok(v)  ─► publish Succeeded, return Ok(v)
//!   │       └─ Err(e) ─► publish AttemptFailed{ attempt, reason }
//!   │                    ├─ attempt == limit   ─► Err(Exhausted { e, attempts })
//!   │                    ├─ !classifier(e)     ─► Err(Rejected { e, attempts })
//!   │                    └─ otherwise:
//!   │                         ├─ delay = backoff.delay(attempt)
//!   │                         ├─ publish BackoffScheduled{ delay, attempt }
//!   │                         └─ select! { cancelled ─► Err(Canceled), sleep(delay) ─► continue }
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                                  |
//! |-------------------|-----------------------------------------------------------------|-----------------------------------------------------|
//! | **Policies**      | Attempt budget, backoff and jitter, retry classification.       | [`RetryPolicy`], [`BackoffPolicy`], [`Classify`]    |
//! | **Execution**     | Attempt loop and convenience entry points.                      | [`Runner`], [`retry`], [`retry_forever`]            |
//! | **Errors**        | Typed validation and terminal errors.                           | [`PolicyError`], [`RetryError`]                     |
//! | **Configuration** | Plain settings with sentinel values.                            | [`Config`]                                          |
//! | **Subscriber API**| Observe retry lifecycle events (logging, metrics).              | [`Subscribe`], [`SubscriberSet`], [`LogWriter`]     |
//! | **Collections**   | Thread-safe list, map and set with snapshot iteration.          | [`SyncList`], [`SyncMap`], [`SyncSet`]              |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{Attempts, RetryError, RetryPolicy};
//!
//! #[derive(Debug)]
//! enum FetchError { Timeout, NotFound }
//!
//! impl std::fmt::Display for FetchError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "{self:?}")
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let policy = RetryPolicy::builder(Attempts::Limited(5))
//!         .with_base_delay(Duration::from_millis(1))
//!         .with_max_delay(Duration::from_millis(10))
//!         .with_jitter(0.2)
//!         .retry_if(|e: &FetchError| matches!(e, FetchError::Timeout))
//!         .build()
//!         .expect("valid policy");
//!
//!     let token = CancellationToken::new();
//!     let res: Result<(), _> = policy
//!         .run(&token, || async { Err(FetchError::NotFound) })
//!         .await;
//!
//!     // NotFound is permanent: a single attempt, no waiting.
//!     assert!(matches!(res, Err(RetryError::Rejected { attempts: 1, .. })));
//! }
//! ```
mod collections;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use collections::{SyncList, SyncMap, SyncSet};
pub use core::{Config, Runner, retry, retry_forever};
pub use error::{PolicyError, RetryError};
pub use events::{Event, EventKind};
pub use policies::{
    Attempts, BackoffPolicy, Classify, JitterPolicy, RetryAll, RetryPolicy, RetryPolicyBuilder,
    Retryable, UseRetryable,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
