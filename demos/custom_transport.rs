//! # Example: custom_transport
//!
//! Drives the orchestrator with an in-process [`TransportFn`] instead of HTTP.
//!
//! Shows how to:
//! - Implement a transport as a closure returning typed payloads.
//! - Observe failures through [`SourceOrchestrator::stats`] (they are never published).
//! - Connect, disconnect and reconnect explicitly.
//!
//! ## Run
//! ```bash
//! cargo run --example custom_transport
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use quotefeed::{
    FetchError, Quote, SenderId, SourceConfig, SourceOrchestrator, SubscriberFn, SubscriberRef,
    TransportFn,
};

#[derive(Debug, Clone)]
struct Tick {
    endpoint: String,
    price: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let counter = Arc::new(AtomicU64::new(0));
    let transport = TransportFn::arc(move |endpoint: String| {
        let n = counter.fetch_add(1, Ordering::Relaxed);
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            // every fifth request of the flaky source fails
            if endpoint == "mem://flaky" && n % 5 == 0 {
                return Err(FetchError::Status { status: 503 });
            }
            Ok(Tick {
                endpoint,
                price: 100 + n,
            })
        }
    });

    let orch = SourceOrchestrator::builder(transport)
        .with_sources(vec![
            SourceConfig::new("mem://steady", 300, "STEADY"),
            SourceConfig::new("mem://flaky", 100, "FLAKY"),
        ])
        .build()?;

    let printer: SubscriberRef<Quote<Tick>> =
        SubscriberFn::arc("printer", |sender: SenderId, q: &Quote<Tick>| {
            println!(
                "[{sender}] #{} {:<6} {} price={}",
                q.seq,
                q.alias(),
                q.payload.endpoint,
                q.payload.price
            );
        });
    orch.subscribe(Arc::clone(&printer));

    orch.connect();
    tokio::time::sleep(Duration::from_secs(1)).await;
    orch.disconnect();

    println!("--- disconnected, active={} ---", orch.active_fetchers());
    tokio::time::sleep(Duration::from_millis(500)).await;

    orch.unsubscribe(&printer);
    orch.connect();
    tokio::time::sleep(Duration::from_millis(500)).await;
    orch.disconnect();

    for s in orch.stats() {
        println!(
            "[stats] {:<6} state={:?} attempts={} ok={} failed={} last={:?}",
            s.alias, s.state, s.attempts, s.successes, s.failures, s.last_failure
        );
    }
    Ok(())
}
