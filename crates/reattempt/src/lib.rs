//! Retry policies with lifecycle hooks for blocking and async calls.
//!
//! Build a [`Policy`] with [`handle_result`] (work that returns a value) or
//! [`handle`] (work that returns nothing), turn it into a [`Caller`], then
//! run work through it. Every call returns a [`Context`] describing what
//! happened: errors from the work never escape the caller.
//!
//! # Example
//!
//! ```rust
//! use reattempt::prelude::*;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let caller = handle_result::<String>()
//!     .retry_and_wait([Duration::from_millis(5), Duration::from_millis(10)])
//!     .retry_only_when(|c| c.is_failure() || c.result().is_some_and(|r| r.is_empty()))
//!     .on_failure(|c| eprintln!("{} gave up after {} attempts", c.label(), c.calls()))
//!     .build_caller()
//!     .expect("valid policy");
//!
//! let ctx = caller
//!     .call_async_named("greeting", || async { Ok::<_, BoxError>("hello".to_string()) })
//!     .await;
//!
//! assert!(ctx.is_success());
//! assert_eq!(ctx.calls(), 1);
//! assert_eq!(ctx.result().map(|s| s.as_str()), Some("hello"));
//! # });
//! ```
//!
//! # Lifecycle
//!
//! For each call the caller fires `before_first_call` once, then for every
//! attempt `before_each_call`, runs the work and consults the retry
//! predicate. Retries wait for the configured delay and fire `on_retry`
//! first. When the loop ends exactly one of `on_success` or `on_failure`
//! runs.

mod adapter;
mod attempt;
mod caller;

// Re-export core types
pub use reattempt_core::*;

pub use caller::{BuildCaller, Caller};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        handle, handle_result, AttemptError, BoxError, BuildCaller, Caller, Cancelled, Context,
        HookType, NoResult, Operation, Outcome, Policy, PolicyBuilder, RetrySettings,
    };
}
