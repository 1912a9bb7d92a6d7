//! Attempt loop for blocking and async calls.

use crate::attempt;
use reattempt_core::{
    BoxError, Cancelled, ConfigError, Context, HookType, Operation, Policy, PolicyBuilder,
};
use std::fmt;
use std::future::{self, Future};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Runs units of work under a [`Policy`].
///
/// Each call gets its own [`Context`]; the policy is shared read-only, so a
/// caller can be cloned and used from many tasks at once.
///
/// # Examples
///
/// ```
/// use reattempt::prelude::*;
///
/// let caller = handle_result::<u32>()
///     .retry(2)
///     .build_caller()
///     .expect("valid policy");
///
/// let mut attempts = 0;
/// let ctx = caller.call(|| {
///     attempts += 1;
///     if attempts < 2 {
///         Err("not yet")
///     } else {
///         Ok(attempts)
///     }
/// });
///
/// assert!(ctx.is_success());
/// assert_eq!(ctx.calls(), 2);
/// assert_eq!(ctx.result(), Some(&2));
/// ```
pub struct Caller<T> {
    policy: Arc<Policy<T>>,
}

impl<T> Clone for Caller<T> {
    fn clone(&self) -> Self {
        Self {
            policy: Arc::clone(&self.policy),
        }
    }
}

impl<T> fmt::Debug for Caller<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caller")
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T> From<Policy<T>> for Caller<T> {
    fn from(policy: Policy<T>) -> Self {
        Self::new(policy)
    }
}

impl<T> Caller<T> {
    /// Creates a caller for `policy`.
    pub fn new(policy: Policy<T>) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Returns the policy driving this caller.
    pub fn policy(&self) -> &Policy<T> {
        &self.policy
    }

    /// Runs `work` on the current thread, blocking it during delays.
    ///
    /// Errors returned by `work` are recorded in the context and never
    /// returned from here.
    pub fn call<F, E>(&self, work: F) -> Context<T>
    where
        F: FnMut() -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.run_blocking(None, work)
    }

    /// Like [`call`](Self::call), labelling the context with `name`.
    pub fn call_named<F, E>(&self, name: impl Into<String>, work: F) -> Context<T>
    where
        F: FnMut() -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.run_blocking(Some(name.into()), work)
    }

    /// Runs async `work`, suspending during delays and while the work runs.
    pub async fn call_async<F, Fut, E>(&self, work: F) -> Context<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        self.uncancellable(None, work).await
    }

    /// Like [`call_async`](Self::call_async), labelling the context with `name`.
    pub async fn call_async_named<F, Fut, E>(&self, name: impl Into<String>, work: F) -> Context<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        self.uncancellable(Some(name.into()), work).await
    }

    /// Runs async `work` until it settles or `cancel` completes.
    ///
    /// Cancellation is checked while waiting between attempts and while an
    /// attempt is in flight; the in-flight work is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] holding the context as of the last completed
    /// attempt. Neither `on_success` nor `on_failure` fires in that case.
    pub async fn call_async_until<F, Fut, E, C>(
        &self,
        work: F,
        cancel: C,
    ) -> Result<Context<T>, Cancelled<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
        C: Future<Output = ()>,
    {
        self.run_async(None, work, cancel).await
    }

    /// Like [`call_async_until`](Self::call_async_until), labelling the context with `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] when `cancel` completes first.
    pub async fn call_async_until_named<F, Fut, E, C>(
        &self,
        name: impl Into<String>,
        work: F,
        cancel: C,
    ) -> Result<Context<T>, Cancelled<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
        C: Future<Output = ()>,
    {
        self.run_async(Some(name.into()), work, cancel).await
    }

    /// Runs an [`Operation`], labelled with its name.
    pub async fn execute<O>(&self, operation: &O) -> Context<T>
    where
        O: Operation<Output = T> + ?Sized,
    {
        self.uncancellable(Some(operation.name()), || operation.run())
            .await
    }

    fn run_blocking<F, E>(&self, name: Option<String>, mut work: F) -> Context<T>
    where
        F: FnMut() -> Result<T, E>,
        E: Into<BoxError>,
    {
        let policy = &*self.policy;
        let mut ctx = Context::new(name);

        for attempt in 0..policy.total_attempts() {
            if attempt == 0 {
                policy.fire(HookType::BeforeFirstCall, &ctx);
            } else {
                let delay = policy.delay_before(attempt);
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                policy.fire(HookType::OnRetry, &ctx);
            }

            attempt::run_blocking(policy, &mut ctx, &mut work);

            if !self.retry_requested(&mut ctx) {
                break;
            }
        }

        self.conclude(&ctx);
        ctx
    }

    async fn uncancellable<F, Fut, E>(&self, name: Option<String>, work: F) -> Context<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        // pending() never completes, so the loop always settles
        match self.run_async(name, work, future::pending::<()>()).await {
            Ok(ctx) => ctx,
            Err(cancelled) => cancelled.into_context(),
        }
    }

    async fn run_async<F, Fut, E, C>(
        &self,
        name: Option<String>,
        mut work: F,
        cancel: C,
    ) -> Result<Context<T>, Cancelled<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
        C: Future<Output = ()>,
    {
        let policy = &*self.policy;
        let mut ctx = Context::new(name);
        tokio::pin!(cancel);

        for attempt in 0..policy.total_attempts() {
            if attempt == 0 {
                policy.fire(HookType::BeforeFirstCall, &ctx);
            } else {
                tokio::select! {
                    biased;
                    _ = &mut cancel => return Err(self.cancelled(ctx)),
                    _ = tokio::time::sleep(policy.delay_before(attempt)) => {}
                }
                policy.fire(HookType::OnRetry, &ctx);
            }

            attempt::begin(policy, &mut ctx);
            let started = Instant::now();
            let invocation = attempt::invoke(work(), policy.attempt_timeout(), ctx.calls());
            let outcome = tokio::select! {
                biased;
                _ = &mut cancel => return Err(self.cancelled(ctx)),
                outcome = invocation => outcome,
            };
            attempt::finish(policy, &mut ctx, outcome, started);

            if !self.retry_requested(&mut ctx) {
                break;
            }
        }

        self.conclude(&ctx);
        Ok(ctx)
    }

    /// Consults the retry predicate after an attempt. A positive verdict
    /// marks the call failed even when the attempt itself succeeded.
    fn retry_requested(&self, ctx: &mut Context<T>) -> bool {
        if !self.policy.should_retry(ctx) {
            return false;
        }
        ctx.reject();

        let total = self.policy.total_attempts();
        if ctx.calls() < total {
            info!(
                "Call '{}' attempt {}/{} needs a retry, waiting {:?}",
                ctx.label(),
                ctx.calls(),
                total,
                self.policy.delay_before(ctx.calls())
            );
        }
        true
    }

    fn conclude(&self, ctx: &Context<T>) {
        if ctx.is_success() {
            info!(
                "Call '{}' succeeded after {} attempt(s)",
                ctx.label(),
                ctx.calls()
            );
            self.policy.fire(HookType::OnSuccess, ctx);
        } else {
            warn!(
                "Call '{}' failed after {} attempt(s)",
                ctx.label(),
                ctx.calls()
            );
            self.policy.fire(HookType::OnFailure, ctx);
        }
    }

    fn cancelled(&self, ctx: Context<T>) -> Cancelled<T> {
        warn!(
            "Call '{}' cancelled after {} attempt(s)",
            ctx.label(),
            ctx.calls()
        );
        Cancelled::new(ctx)
    }
}

/// Builds a [`Caller`] straight from a [`PolicyBuilder`].
pub trait BuildCaller<T> {
    /// Freezes the configuration and wraps it in a caller.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the policy is invalid.
    fn build_caller(self) -> Result<Caller<T>, ConfigError>;
}

impl<T> BuildCaller<T> for PolicyBuilder<T> {
    fn build_caller(self) -> Result<Caller<T>, ConfigError> {
        self.build().map(Caller::new)
    }
}
