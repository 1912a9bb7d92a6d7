//! Core types for the reattempt call-resilience engine.
//!
//! This crate holds the data model without any runtime dependency. The
//! attempt loop itself lives in the `reattempt` crate.
//!
//! # Core Types
//!
//! - [`Policy`] / [`PolicyBuilder`] - Frozen retry configuration and its fluent builder
//! - [`Context`] - Per-call record handed to hooks and the retry predicate
//! - [`Outcome`] - What a single attempt produced
//! - [`NoResult`] - Marker result for work that returns nothing
//! - [`RetrySettings`] - Serializable timing configuration
//! - [`Operation`] - Struct-based unit of work
//! - [`AttemptError`], [`ConfigError`], [`Cancelled`] - Error types

mod context;
mod error;
mod operation;
mod outcome;
mod policy;
mod settings;

pub use context::Context;
pub use error::{AttemptError, BoxError, Cancelled, ConfigError};
pub use operation::Operation;
pub use outcome::{NoResult, Outcome};
pub use policy::{handle, handle_result, Hook, HookType, Policy, PolicyBuilder, RetryPredicate};
pub use settings::RetrySettings;
