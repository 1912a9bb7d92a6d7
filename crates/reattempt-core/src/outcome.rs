//! Result of a single attempt.

use crate::error::{AttemptError, BoxError};

/// Marker value for work that produces nothing worth keeping.
///
/// Policies built with [`handle`](crate::handle) track `NoResult` instead of
/// a real value, so a successful no-result call reports `Some(&NoResult)`
/// and nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoResult;

/// What one attempt produced.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The work returned a value.
    Success(T),
    /// The work failed or was abandoned.
    Failure(AttemptError),
}

impl<T> Outcome<T> {
    /// Converts the return value of attempt number `attempt`.
    pub fn from_result<E: Into<BoxError>>(result: Result<T, E>, attempt: u32) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::Failure(AttemptError::failed(attempt, e)),
        }
    }

    /// Returns `true` for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}
