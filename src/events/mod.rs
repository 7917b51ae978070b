//! Attempt-loop events.
//!
//! This module holds the event **data model** published by the runner while it
//! drives an invocation.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publisher**: `core::runner::Runner`, one event stream per invocation.
//! - **Consumers**: [`SubscriberSet`](crate::SubscriberSet) fans events out to
//!   user [`Subscribe`](crate::Subscribe) implementations.

mod event;

pub(crate) use event::next_invocation;
pub use event::{Event, EventKind};
