//! Per-call execution context.

use crate::error::AttemptError;
use crate::outcome::Outcome;
use std::fmt;
use std::time::{Duration, Instant};

/// The record of one top-level call.
///
/// A fresh context is created for every call, updated in place after each
/// attempt, handed by reference to hooks and the retry predicate, and
/// finally returned to the caller.
///
/// # Examples
///
/// ```
/// use reattempt_core::{Context, Outcome};
///
/// let mut ctx = Context::new(Some("lookup".to_string()));
/// ctx.begin_attempt();
/// ctx.record(Outcome::from_result(Err::<u32, _>("busy"), ctx.calls()), None);
/// assert!(ctx.is_failure());
///
/// ctx.begin_attempt();
/// ctx.record(Outcome::from_result(Ok::<_, &str>(7), ctx.calls()), None);
/// assert!(ctx.is_success());
/// assert_eq!(ctx.calls(), 2);
/// assert_eq!(ctx.result(), Some(&7));
/// assert!(ctx.error().is_none());
/// ```
pub struct Context<T> {
    name: Option<String>,
    calls: u32,
    result: Option<T>,
    error: Option<AttemptError>,
    is_success: bool,
    duration: Option<Duration>,
    started_at: Instant,
}

impl<T: fmt::Debug> fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name)
            .field("calls", &self.calls)
            .field("result", &self.result)
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .field("is_success", &self.is_success)
            .field("duration", &self.duration)
            .finish()
    }
}

impl<T> Context<T> {
    /// Creates a context with no attempts made.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            calls: 0,
            result: None,
            error: None,
            is_success: false,
            duration: None,
            started_at: Instant::now(),
        }
    }

    /// Returns the correlation label given to the call.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the name, or `<unnamed>` when none was given.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Returns the number of attempts made so far.
    pub fn calls(&self) -> u32 {
        self.calls
    }

    /// Returns the value of the most recent successful attempt.
    ///
    /// A failed attempt leaves the previous value in place.
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Consumes the context, returning the last successful value.
    pub fn into_result(self) -> Option<T> {
        self.result
    }

    /// Returns the error of the most recent attempt, if it failed.
    pub fn error(&self) -> Option<&AttemptError> {
        self.error.as_ref()
    }

    /// Removes and returns the error of the most recent attempt.
    pub fn take_error(&mut self) -> Option<AttemptError> {
        self.error.take()
    }

    /// Returns `true` if the call is currently considered successful.
    pub fn is_success(&self) -> bool {
        self.is_success
    }

    /// Returns `true` if the call is currently considered failed.
    pub fn is_failure(&self) -> bool {
        !self.is_success
    }

    /// Wall-clock time of the most recent attempt, when the policy is timed.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Returns the time elapsed since the call started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Counts a new attempt.
    pub fn begin_attempt(&mut self) {
        self.calls += 1;
    }

    /// Applies the outcome of the attempt just made.
    pub fn record(&mut self, outcome: Outcome<T>, duration: Option<Duration>) {
        match outcome {
            Outcome::Success(value) => {
                self.result = Some(value);
                self.error = None;
                self.is_success = true;
            }
            Outcome::Failure(error) => {
                self.error = Some(error);
                self.is_success = false;
            }
        }
        if duration.is_some() {
            self.duration = duration;
        }
    }

    /// Marks the last attempt as unacceptable after the retry predicate asked for another one.
    pub fn reject(&mut self) {
        self.is_success = false;
    }
}
