//! Single-attempt helpers shared by the blocking and async loops.

use reattempt_core::{AttemptError, BoxError, Context, HookType, Outcome, Policy};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

/// Fires `before_each_call` and counts the attempt that is about to run.
pub(crate) fn begin<T>(policy: &Policy<T>, ctx: &mut Context<T>) {
    policy.fire(HookType::BeforeEachCall, ctx);
    ctx.begin_attempt();
    debug!(
        "Call '{}' attempt {}/{} started",
        ctx.label(),
        ctx.calls(),
        policy.total_attempts()
    );
}

/// Records the outcome of the attempt started by [`begin`].
pub(crate) fn finish<T>(
    policy: &Policy<T>,
    ctx: &mut Context<T>,
    outcome: Outcome<T>,
    started: Instant,
) {
    let duration = policy.tracks_duration().then(|| started.elapsed());
    if let Outcome::Failure(e) = &outcome {
        debug!("Call '{}' {}", ctx.label(), e);
    }
    ctx.record(outcome, duration);
}

/// Runs one blocking attempt.
pub(crate) fn run_blocking<T, E, F>(policy: &Policy<T>, ctx: &mut Context<T>, work: &mut F)
where
    F: FnMut() -> Result<T, E>,
    E: Into<BoxError>,
{
    begin(policy, ctx);
    let started = Instant::now();
    let outcome = Outcome::from_result(work(), ctx.calls());
    finish(policy, ctx, outcome, started);
}

/// Awaits the work of attempt number `attempt`, bounded by `timeout`.
///
/// Does not touch the context, so the caller can race it against cancellation.
pub(crate) async fn invoke<T, E, Fut>(
    work: Fut,
    timeout: Option<Duration>,
    attempt: u32,
) -> Outcome<T>
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, work).await {
            Ok(result) => Outcome::from_result(result, attempt),
            Err(_) => Outcome::Failure(AttemptError::Timeout {
                attempt,
                timeout: limit,
            }),
        },
        None => Outcome::from_result(work.await, attempt),
    }
}
