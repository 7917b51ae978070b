//! # Error classification.
//!
//! A classifier answers one question for the attempt loop: may this error be retried?
//!
//! - Any `Fn(&E) -> bool` closure or function is a classifier.
//! - [`RetryAll`] (default) retries every error.
//! - [`UseRetryable`] defers to the error's own [`Retryable`] implementation.
//!
//! ```rust
//! use std::io;
//! use retryvisor::{Classify, RetryAll, Retryable, UseRetryable};
//!
//! let timeout = io::Error::from(io::ErrorKind::TimedOut);
//! let denied = io::Error::from(io::ErrorKind::PermissionDenied);
//!
//! assert!(RetryAll.is_retryable(&denied));
//! assert!(UseRetryable.is_retryable(&timeout));
//! assert!(!UseRetryable.is_retryable(&denied));
//!
//! let only_timeouts = |e: &io::Error| e.kind() == io::ErrorKind::TimedOut;
//! assert!(only_timeouts.is_retryable(&timeout));
//! ```

use std::io;

/// Decides whether an error is eligible for another attempt.
pub trait Classify<E: ?Sized> {
    /// Returns `true` if the loop may retry after `error`.
    fn is_retryable(&self, error: &E) -> bool;
}

impl<E, F> Classify<E> for F
where
    E: ?Sized,
    F: Fn(&E) -> bool,
{
    #[inline]
    fn is_retryable(&self, error: &E) -> bool {
        self(error)
    }
}

/// Classifier that treats every error as retryable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryAll;

impl<E: ?Sized> Classify<E> for RetryAll {
    #[inline]
    fn is_retryable(&self, _error: &E) -> bool {
        true
    }
}

/// Errors that know whether retrying them can help.
pub trait Retryable {
    /// Indicates whether the error is transient.
    fn is_retryable(&self) -> bool;
}

/// Classifier that asks the error itself via [`Retryable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UseRetryable;

impl<E: Retryable + ?Sized> Classify<E> for UseRetryable {
    #[inline]
    fn is_retryable(&self, error: &E) -> bool {
        error.is_retryable()
    }
}

impl Retryable for io::Error {
    /// Timeouts, interruptions and connection-level failures are transient;
    /// everything else (not found, permission denied, invalid data, ...) is not.
    fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            io::ErrorKind::TimedOut
                | io::ErrorKind::Interrupted
                | io::ErrorKind::WouldBlock
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof
        )
    }
}
