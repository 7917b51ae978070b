//! Retry policies.
//!
//! This module groups the knobs that control **if** an action is retried
//! and **how long** to wait between attempts.
//!
//! ## Contents
//! - [`Attempts`]          how many invocations are allowed (limited / unlimited)
//! - [`BackoffPolicy`]     how retry delays evolve (base / multiplier / max + jitter)
//! - [`JitterPolicy`]      proportional randomization to avoid thundering herd
//! - [`Classify`]          which errors are worth another attempt
//! - [`RetryPolicy`]       the immutable bundle consumed by the runner
//!
//! ## Defaults
//! - `Attempts::Limited(3)`.
//! - `BackoffPolicy::default()` → base=100ms, multiplier=2.0, max=30s, no jitter.
//! - [`RetryAll`] classifier: every error is retryable.

mod attempts;
mod backoff;
mod builder;
mod classify;
mod jitter;
mod retry;

pub use attempts::Attempts;
pub use backoff::BackoffPolicy;
pub use builder::RetryPolicyBuilder;
pub use classify::{Classify, RetryAll, Retryable, UseRetryable};
pub use jitter::JitterPolicy;
pub use retry::RetryPolicy;
