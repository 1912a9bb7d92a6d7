//! Retry policy and its builder.

use crate::context::Context;
use crate::error::ConfigError;
use crate::outcome::NoResult;
use crate::settings::RetrySettings;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked at a point in the call lifecycle.
pub type Hook<T> = Arc<dyn Fn(&Context<T>) + Send + Sync>;

/// Decides after each attempt whether another attempt should be made.
pub type RetryPredicate<T> = Arc<dyn Fn(&Context<T>) -> bool + Send + Sync>;

/// A point in the call lifecycle where a hook can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    /// Once, before the first attempt.
    BeforeFirstCall,
    /// Before every attempt, including the first.
    BeforeEachCall,
    /// Before every retried attempt, after the delay.
    OnRetry,
    /// Once, when the call ends successfully.
    OnSuccess,
    /// Once, when the call ends in failure.
    OnFailure,
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookType::BeforeFirstCall => write!(f, "before_first_call"),
            HookType::BeforeEachCall => write!(f, "before_each_call"),
            HookType::OnRetry => write!(f, "on_retry"),
            HookType::OnSuccess => write!(f, "on_success"),
            HookType::OnFailure => write!(f, "on_failure"),
        }
    }
}

/// Starts a policy that tracks results of type `T`.
///
/// ```
/// use reattempt_core::handle_result;
///
/// let policy = handle_result::<String>()
///     .retry_only_when(|c| c.result().map(|r| r == "0").unwrap_or(true))
///     .retry(1)
///     .build()
///     .expect("valid policy");
/// assert_eq!(policy.total_attempts(), 2);
/// ```
pub fn handle_result<T>() -> PolicyBuilder<T> {
    PolicyBuilder::new()
}

/// Starts a policy for work with no meaningful return value.
pub fn handle() -> PolicyBuilder<NoResult> {
    PolicyBuilder::new()
}

/// How long to wait before each retry.
///
/// A plain retry count is kept as a number so large counts cost nothing
/// until `build` validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Schedule {
    Immediate(u32),
    Waits(Vec<Duration>),
}

impl Schedule {
    fn retries(&self) -> usize {
        match self {
            Schedule::Immediate(times) => *times as usize,
            Schedule::Waits(waits) => waits.len(),
        }
    }

    fn wait(&self, retry: usize) -> Duration {
        match self {
            Schedule::Immediate(_) => Duration::ZERO,
            Schedule::Waits(waits) => waits.get(retry).copied().unwrap_or(Duration::ZERO),
        }
    }
}

/// Frozen retry configuration.
///
/// Cloning is cheap; hooks and the predicate are shared. A policy never
/// changes after [`PolicyBuilder::build`], so one instance can drive any
/// number of concurrent calls.
pub struct Policy<T> {
    schedule: Schedule,
    retry_when: Option<RetryPredicate<T>>,
    before_first_call: Option<Hook<T>>,
    before_each_call: Option<Hook<T>>,
    on_retry: Option<Hook<T>>,
    on_success: Option<Hook<T>>,
    on_failure: Option<Hook<T>>,
    attempt_timeout: Option<Duration>,
    track_duration: bool,
}

impl<T> Clone for Policy<T> {
    fn clone(&self) -> Self {
        Self {
            schedule: self.schedule.clone(),
            retry_when: self.retry_when.clone(),
            before_first_call: self.before_first_call.clone(),
            before_each_call: self.before_each_call.clone(),
            on_retry: self.on_retry.clone(),
            on_success: self.on_success.clone(),
            on_failure: self.on_failure.clone(),
            attempt_timeout: self.attempt_timeout,
            track_duration: self.track_duration,
        }
    }
}

impl<T> fmt::Debug for Policy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: Vec<String> = [
            HookType::BeforeFirstCall,
            HookType::BeforeEachCall,
            HookType::OnRetry,
            HookType::OnSuccess,
            HookType::OnFailure,
        ]
        .into_iter()
        .filter(|h| self.hook(*h).is_some())
        .map(|h| h.to_string())
        .collect();

        f.debug_struct("Policy")
            .field("schedule", &self.schedule)
            .field("hooks", &hooks)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("track_duration", &self.track_duration)
            .finish()
    }
}

impl<T> Policy<T> {
    /// Creates a policy builder.
    pub fn builder() -> PolicyBuilder<T> {
        PolicyBuilder::new()
    }

    /// Returns the number of retries after the first attempt.
    pub fn retries(&self) -> u32 {
        // build() rejects schedules that do not fit
        self.schedule.retries() as u32
    }

    /// Returns the number of attempts, first call included.
    pub fn total_attempts(&self) -> u32 {
        self.retries() + 1
    }

    /// Returns the wait before attempt `attempt` (0-based). The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        match attempt.checked_sub(1) {
            Some(i) => self.schedule.wait(i as usize),
            None => Duration::ZERO,
        }
    }

    /// Evaluates the retry predicate. Without one, failed attempts are retried.
    pub fn should_retry(&self, ctx: &Context<T>) -> bool {
        match &self.retry_when {
            Some(predicate) => predicate(ctx),
            None => ctx.is_failure(),
        }
    }

    /// Returns the hook registered for `hook`.
    pub fn hook(&self, hook: HookType) -> Option<&Hook<T>> {
        match hook {
            HookType::BeforeFirstCall => self.before_first_call.as_ref(),
            HookType::BeforeEachCall => self.before_each_call.as_ref(),
            HookType::OnRetry => self.on_retry.as_ref(),
            HookType::OnSuccess => self.on_success.as_ref(),
            HookType::OnFailure => self.on_failure.as_ref(),
        }
    }

    /// Runs the hook registered for `hook`. Unset hooks do nothing.
    ///
    /// Returns `true` if a hook ran.
    pub fn fire(&self, hook: HookType, ctx: &Context<T>) -> bool {
        match self.hook(hook) {
            Some(f) => {
                f(ctx);
                true
            }
            None => false,
        }
    }

    /// Per-attempt timeout for async calls.
    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }

    /// Returns `true` if attempt durations are recorded.
    pub fn tracks_duration(&self) -> bool {
        self.track_duration
    }
}

/// Fluent builder for [`Policy`].
///
/// Setters can be called in any order; the last call for a given setting wins.
///
/// # Examples
///
/// ```
/// use reattempt_core::handle;
/// use std::time::Duration;
///
/// let policy = handle()
///     .retry_and_wait([Duration::from_millis(10), Duration::from_millis(20)])
///     .on_failure(|c| eprintln!("gave up after {} attempts", c.calls()))
///     .timed()
///     .build()
///     .expect("valid policy");
///
/// assert_eq!(policy.total_attempts(), 3);
/// assert_eq!(policy.delay_before(2), Duration::from_millis(20));
/// assert!(policy.tracks_duration());
/// ```
pub struct PolicyBuilder<T> {
    schedule: Schedule,
    retry_when: Option<RetryPredicate<T>>,
    before_first_call: Option<Hook<T>>,
    before_each_call: Option<Hook<T>>,
    on_retry: Option<Hook<T>>,
    on_success: Option<Hook<T>>,
    on_failure: Option<Hook<T>>,
    attempt_timeout: Option<Duration>,
    track_duration: bool,
}

impl<T> Default for PolicyBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PolicyBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyBuilder")
            .field("schedule", &self.schedule)
            .field("custom_predicate", &self.retry_when.is_some())
            .field("attempt_timeout", &self.attempt_timeout)
            .field("track_duration", &self.track_duration)
            .finish()
    }
}

impl<T> PolicyBuilder<T> {
    /// Creates a builder for a single attempt that retries nothing.
    pub fn new() -> Self {
        Self {
            schedule: Schedule::Immediate(0),
            retry_when: None,
            before_first_call: None,
            before_each_call: None,
            on_retry: None,
            on_success: None,
            on_failure: None,
            attempt_timeout: None,
            track_duration: false,
        }
    }

    /// Retries up to `times` times without waiting.
    pub fn retry(mut self, times: u32) -> Self {
        self.schedule = Schedule::Immediate(times);
        self
    }

    /// Retries once per entry, waiting that long before each retry.
    pub fn retry_and_wait<I>(mut self, waits: I) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        self.schedule = Schedule::Waits(waits.into_iter().collect());
        self
    }

    /// Like [`retry_and_wait`](Self::retry_and_wait); `None` means one immediate retry.
    pub fn retry_and_wait_opt<I>(self, waits: Option<I>) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        match waits {
            Some(waits) => self.retry_and_wait(waits),
            None => self.retry_and_wait([Duration::ZERO]),
        }
    }

    /// Retries once per entry, waiting that many seconds before each retry.
    pub fn retry_and_wait_in_seconds<I>(self, seconds: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        self.retry_and_wait(seconds.into_iter().map(Duration::from_secs))
    }

    /// Like [`retry_and_wait_in_seconds`](Self::retry_and_wait_in_seconds); `None` means one immediate retry.
    pub fn retry_and_wait_in_seconds_opt<I>(self, seconds: Option<I>) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        match seconds {
            Some(seconds) => self.retry_and_wait_in_seconds(seconds),
            None => self.retry_and_wait_in_seconds([0]),
        }
    }

    /// Replaces the default predicate (retry while the last attempt failed).
    ///
    /// The predicate sees the context after the attempt just made, including
    /// that attempt's result or error. Returning `true` marks the call as
    /// failed and requests another attempt.
    pub fn retry_only_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Context<T>) -> bool + Send + Sync + 'static,
    {
        self.retry_when = Some(Arc::new(predicate));
        self
    }

    /// Runs once before the first attempt.
    pub fn before_first_call<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<T>) + Send + Sync + 'static,
    {
        self.before_first_call = Some(Arc::new(hook));
        self
    }

    /// Runs before every attempt.
    pub fn before_each_call<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<T>) + Send + Sync + 'static,
    {
        self.before_each_call = Some(Arc::new(hook));
        self
    }

    /// Runs before every retry, after its delay.
    pub fn on_retry<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<T>) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(hook));
        self
    }

    /// Runs once if the call ends successfully.
    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<T>) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Runs once if the call ends in failure.
    pub fn on_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<T>) + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(hook));
        self
    }

    /// Abandons an async attempt that runs longer than `timeout`.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Records the wall-clock duration of each attempt.
    pub fn timed(mut self) -> Self {
        self.track_duration = true;
        self
    }

    /// Applies the values present in `settings`.
    ///
    /// Unset fields leave the builder alone, so settings compose with the
    /// other setters in any order. `delays_ms` wins over `retries`, and
    /// `track_duration: false` does not undo an earlier [`timed`](Self::timed).
    pub fn with_settings(mut self, settings: &RetrySettings) -> Self {
        if !settings.delays_ms.is_empty() {
            self = self.retry_and_wait(settings.delays());
        } else if let Some(times) = settings.retries {
            self = self.retry(times);
        }
        if let Some(timeout) = settings.attempt_timeout() {
            self.attempt_timeout = Some(timeout);
        }
        if settings.track_duration {
            self.track_duration = true;
        }
        self
    }

    /// Freezes the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the attempt timeout is zero or the number
    /// of retries cannot be counted in a `u32`.
    pub fn build(self) -> Result<Policy<T>, ConfigError> {
        if self.attempt_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ZeroAttemptTimeout);
        }
        let retries = self.schedule.retries();
        if retries >= u32::MAX as usize {
            return Err(ConfigError::TooManyRetries(retries));
        }

        Ok(Policy {
            schedule: self.schedule,
            retry_when: self.retry_when,
            before_first_call: self.before_first_call,
            before_each_call: self.before_each_call,
            on_retry: self.on_retry,
            on_success: self.on_success,
            on_failure: self.on_failure,
            attempt_timeout: self.attempt_timeout,
            track_duration: self.track_duration,
        })
    }
}
