//! Adapters for work that returns nothing.
//!
//! Side-effect-only work is routed through the value-returning loop with
//! [`NoResult`] as its value, so both kinds of work share one engine.

use crate::caller::Caller;
use reattempt_core::{BoxError, Context, NoResult};
use std::future::Future;

impl Caller<NoResult> {
    /// Runs side-effect-only `work`, blocking during delays.
    ///
    /// ```
    /// use reattempt::prelude::*;
    ///
    /// let caller = handle().retry(1).build_caller().expect("valid policy");
    /// let mut sent = Vec::new();
    ///
    /// let ctx = caller.call_action(|| {
    ///     sent.push("ping");
    ///     Ok::<_, BoxError>(())
    /// });
    ///
    /// assert!(ctx.is_success());
    /// assert_eq!(sent, ["ping"]);
    /// ```
    pub fn call_action<F, E>(&self, mut work: F) -> Context<NoResult>
    where
        F: FnMut() -> Result<(), E>,
        E: Into<BoxError>,
    {
        self.call(move || work().map(|()| NoResult))
    }

    /// Like [`call_action`](Self::call_action), labelling the context with `name`.
    pub fn call_action_named<F, E>(&self, name: impl Into<String>, mut work: F) -> Context<NoResult>
    where
        F: FnMut() -> Result<(), E>,
        E: Into<BoxError>,
    {
        self.call_named(name, move || work().map(|()| NoResult))
    }

    /// Runs async side-effect-only `work`.
    pub async fn call_action_async<F, Fut, E>(&self, mut work: F) -> Context<NoResult>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Into<BoxError>,
    {
        self.call_async(move || {
            let pending = work();
            async move { pending.await.map(|()| NoResult) }
        })
        .await
    }

    /// Like [`call_action_async`](Self::call_action_async), labelling the context with `name`.
    pub async fn call_action_async_named<F, Fut, E>(
        &self,
        name: impl Into<String>,
        mut work: F,
    ) -> Context<NoResult>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Into<BoxError>,
    {
        self.call_async_named(name, move || {
            let pending = work();
            async move { pending.await.map(|()| NoResult) }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::caller::BuildCaller;
    use reattempt_core::{handle, NoResult};

    #[test]
    fn test_call_action_retries_until_success() {
        let caller = handle().retry(3).build_caller().expect("valid policy");
        let mut attempts = 0;

        let ctx = caller.call_action_named("flush", || {
            attempts += 1;
            if attempts < 3 {
                Err("disk busy")
            } else {
                Ok(())
            }
        });

        assert!(ctx.is_success());
        assert_eq!(ctx.calls(), 3);
        assert_eq!(ctx.result(), Some(&NoResult));
        assert_eq!(ctx.name(), Some("flush"));
    }

    #[tokio::test]
    async fn test_call_action_async_failure_keeps_no_value() {
        let caller = handle().retry(1).build_caller().expect("valid policy");

        let ctx = caller
            .call_action_async(|| async { Err::<(), _>("offline") })
            .await;

        assert!(ctx.is_failure());
        assert_eq!(ctx.calls(), 2);
        assert_eq!(ctx.result(), None);
        assert!(ctx.error().is_some());
    }

    #[tokio::test]
    async fn test_call_action_async_named() {
        let caller = handle().build_caller().expect("valid policy");

        let ctx = caller
            .call_action_async_named("notify", || async { Ok::<(), &str>(()) })
            .await;

        assert!(ctx.is_success());
        assert_eq!(ctx.label(), "notify");
    }
}
