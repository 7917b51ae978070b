//! Retry core: configuration and the attempt loop.
//!
//! Internal modules:
//! - [`config`]: plain settings with sentinel values, turned into a policy;
//! - [`runner`]: drives one invocation with backoff, classification and cancellation.

mod config;
mod runner;

pub use config::Config;
pub use runner::{Runner, retry, retry_forever};
