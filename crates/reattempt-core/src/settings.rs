//! Serializable policy settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Plain-data form of a retry policy's timing, for loading from config files.
///
/// Predicates and hooks are code and are attached on the builder; settings
/// only carry the numbers.
///
/// # Examples
///
/// ```
/// use reattempt_core::RetrySettings;
/// use std::time::Duration;
///
/// let settings = RetrySettings {
///     delays_ms: vec![100, 250],
///     ..RetrySettings::default()
/// };
/// assert_eq!(
///     settings.delays(),
///     vec![Duration::from_millis(100), Duration::from_millis(250)]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Number of immediate retries. Ignored when `delays_ms` is non-empty.
    pub retries: Option<u32>,
    /// Wait before each retry, in milliseconds.
    pub delays_ms: Vec<u64>,
    /// Per-attempt timeout in milliseconds (async calls only).
    pub attempt_timeout_ms: Option<u64>,
    /// Record the duration of each attempt. `false` leaves the builder as is.
    pub track_duration: bool,
}

impl RetrySettings {
    /// Returns `delays_ms` as durations.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }

    /// Returns the attempt timeout, if any.
    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout_ms.map(Duration::from_millis)
    }
}
