//! Error types.

use crate::context::Context;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by a unit of work.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a single attempt did not produce a value.
///
/// Stored in [`Context::error`] and never raised by the engine itself.
///
/// # Non-Exhaustive
///
/// Always include a wildcard arm when matching:
///
/// ```
/// use reattempt_core::AttemptError;
///
/// fn describe(error: &AttemptError) -> String {
///     match error {
///         AttemptError::Failed { attempt, source } => {
///             format!("attempt {} returned {}", attempt, source)
///         }
///         AttemptError::Timeout { attempt, timeout } => {
///             format!("attempt {} ran longer than {:?}", attempt, timeout)
///         }
///         _ => error.to_string(),
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AttemptError {
    /// The work returned an error.
    #[error("Attempt {attempt} failed: {source}")]
    Failed {
        /// 1-based number of the attempt that failed
        attempt: u32,
        /// The error returned by the work
        #[source]
        source: BoxError,
    },

    /// The work did not finish within the policy's attempt timeout.
    #[error("Attempt {attempt} timed out after {timeout:?}")]
    Timeout {
        /// 1-based number of the attempt that timed out
        attempt: u32,
        /// The configured attempt timeout
        timeout: Duration,
    },
}

impl AttemptError {
    /// Wraps an error returned by the work.
    pub fn failed(attempt: u32, source: impl Into<BoxError>) -> Self {
        AttemptError::Failed {
            attempt,
            source: source.into(),
        }
    }

    /// Returns the 1-based number of the attempt this error belongs to.
    pub fn attempt(&self) -> u32 {
        match self {
            AttemptError::Failed { attempt, .. } | AttemptError::Timeout { attempt, .. } => *attempt,
        }
    }

    /// Returns `true` if the attempt was abandoned because of the attempt timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AttemptError::Timeout { .. })
    }

    /// Returns the original error if it is of type `E`.
    ///
    /// ```
    /// use reattempt_core::AttemptError;
    /// use std::io;
    ///
    /// let error = AttemptError::failed(1, io::Error::new(io::ErrorKind::Other, "disk"));
    /// let io_error = error.downcast_ref::<io::Error>().map(|e| e.kind());
    /// assert_eq!(io_error, Some(io::ErrorKind::Other));
    /// ```
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            AttemptError::Failed { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Errors raised while building a [`Policy`](crate::Policy).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The attempt timeout was set to zero.
    #[error("Invalid policy configuration: attempt timeout must be greater than zero")]
    ZeroAttemptTimeout,

    /// More delays were configured than attempts can be counted.
    #[error("Invalid policy configuration: {0} retries exceed the supported maximum")]
    TooManyRetries(usize),
}

/// Returned by a cancellable call when the cancellation future completed first.
///
/// Carries the context as it stood when the call was abandoned: attempts
/// counted so far and the outcome of the last completed attempt. Neither the
/// success nor the failure hook has fired.
pub struct Cancelled<T> {
    context: Context<T>,
}

impl<T> Cancelled<T> {
    /// Wraps the context of an abandoned call.
    pub fn new(context: Context<T>) -> Self {
        Self { context }
    }

    /// Returns the last known state of the call.
    pub fn context(&self) -> &Context<T> {
        &self.context
    }

    /// Consumes the error, returning the last known state of the call.
    pub fn into_context(self) -> Context<T> {
        self.context
    }
}

impl<T: fmt::Debug> fmt::Debug for Cancelled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cancelled")
            .field("context", &self.context)
            .finish()
    }
}

impl<T> fmt::Display for Cancelled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Call '{}' cancelled after {} attempt(s)",
            self.context.label(),
            self.context.calls()
        )
    }
}

impl<T: fmt::Debug> std::error::Error for Cancelled<T> {}
