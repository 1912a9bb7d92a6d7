//! Flaky Endpoint.
//!
//! This example demonstrates:
//! 1. Retrying an async request with a fixed delay sequence
//! 2. Rejecting a successful but unusable response with a retry predicate
//! 3. Observing the call through lifecycle hooks and tracing output
//! 4. Loading timing from a settings block
//!
//! Run with `RUST_LOG` unset; the fmt subscriber prints info and above.

use reattempt::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Simulated endpoint: fails twice, then answers with an empty body once,
// then returns real data.
#[derive(Debug, Default)]
struct InventoryEndpoint {
    requests: AtomicU32,
}

impl InventoryEndpoint {
    async fn fetch(&self) -> Result<String, BoxError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        match self.requests.fetch_add(1, Ordering::SeqCst) {
            0 | 1 => Err("503 service unavailable".into()),
            2 => Ok(String::new()),
            n => Ok(format!("{{\"sku\":\"A-17\",\"stock\":{}}}", n * 4)),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let settings = RetrySettings {
        delays_ms: vec![50, 100, 200, 400],
        attempt_timeout_ms: Some(500),
        track_duration: true,
        ..RetrySettings::default()
    };

    let retries = Arc::new(AtomicU32::new(0));
    let retry_count = Arc::clone(&retries);

    let caller = handle_result::<String>()
        .with_settings(&settings)
        .retry_only_when(|c| c.is_failure() || c.result().is_some_and(|body| body.is_empty()))
        .on_retry(move |c| {
            retry_count.fetch_add(1, Ordering::SeqCst);
            match c.error() {
                Some(e) => println!("  retrying after error: {}", e),
                None => println!("  retrying after empty response"),
            }
        })
        .on_success(|c| println!("  fetched in {} attempt(s)", c.calls()))
        .on_failure(|c| println!("  giving up after {} attempt(s)", c.calls()))
        .build_caller()
        .expect("valid policy");

    let endpoint = InventoryEndpoint::default();
    let endpoint = &endpoint;

    println!("Fetching inventory...");
    let ctx = caller
        .call_async_named("inventory", move || endpoint.fetch())
        .await;

    println!();
    println!("success:        {}", ctx.is_success());
    println!("attempts:       {}", ctx.calls());
    println!("retries:        {}", retries.load(Ordering::SeqCst));
    println!("body:           {}", ctx.result().map(|s| s.as_str()).unwrap_or("-"));
    println!("last attempt:   {:?}", ctx.duration());
    println!("total elapsed:  {:?}", ctx.elapsed());
}
