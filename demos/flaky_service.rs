//! # Example: flaky_service
//!
//! Demonstrates how [`RetryPolicy`] retries a flaky call with exponential backoff
//! and jitter, while [`LogWriter`] reports every step through `tracing`.
//!
//! The first call fails twice with a transient error and then succeeds.
//! The second call hits a permanent error and is rejected without waiting.
//!
//! ## Flow
//! ```text
//! Runner::run()
//!   ├─► AttemptStarting(attempt=1) ─► Err("connection reset #1")
//!   ├─► AttemptFailed ─► BackoffScheduled{delay≈100ms} ─► sleep
//!   ├─► AttemptStarting(attempt=2) ─► Err("connection reset #2")
//!   ├─► AttemptFailed ─► BackoffScheduled{delay≈200ms} ─► sleep
//!   └─► AttemptStarting(attempt=3) ─► Ok ─► Succeeded
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=retryvisor=debug cargo run --example flaky_service
//! ```

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use retryvisor::{Attempts, LogWriter, RetryPolicy, Runner, Subscribe, SubscriberSet};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ServiceError {
    ConnectionReset(u32),
    BadRequest,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::ConnectionReset(n) => write!(f, "connection reset #{n}"),
            ServiceError::BadRequest => f.write_str("bad request"),
        }
    }
}

impl std::error::Error for ServiceError {}

static CALLS: AtomicU32 = AtomicU32::new(0);

async fn fetch_quote() -> Result<&'static str, ServiceError> {
    let n = CALLS.fetch_add(1, Ordering::Relaxed) + 1;
    tokio::time::sleep(Duration::from_millis(20)).await;
    if n <= 2 {
        Err(ServiceError::ConnectionReset(n))
    } else {
        Ok("stay hungry")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Route tracing records to stdout (default: debug for this crate)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("retryvisor=debug")),
        )
        .init();

    // 2. Subscribers receive lifecycle events off the retry path
    let subs = SubscriberSet::new(vec![Arc::new(LogWriter) as Arc<dyn Subscribe>]);

    // 3. Retry transient errors only
    let policy = RetryPolicy::builder(Attempts::Limited(5))
        .with_base_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_secs(2))
        .with_multiplier(2.0)
        .with_jitter(0.2)
        .retry_if(|e: &ServiceError| matches!(e, ServiceError::ConnectionReset(_)))
        .build()?;

    let token = CancellationToken::new();
    let runner = Runner::new(&policy).with_subscribers(&subs);

    // 4. Transient failures, then success
    let quote = runner.run(&token, fetch_quote).await?;
    println!("[main] quote: {quote}");

    // 5. Permanent failure: one attempt, no backoff
    let res: Result<(), _> = runner
        .run(&token, || async { Err(ServiceError::BadRequest) })
        .await;
    if let Err(e) = res {
        println!("[main] gave up after {} attempt(s): {e}", e.attempts());
    }

    subs.shutdown().await;
    println!("[main] done.");
    Ok(())
}
