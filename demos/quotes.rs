//! # Example: quotes
//!
//! Polls the built-in market-data sources over HTTP and logs every quote.
//!
//! Shows how to:
//! - Override one source field (`intervalMillis`) from a JSON document.
//! - Attach the built-in [`LogWriter`] and a custom subscriber.
//! - Run until SIGINT/SIGTERM with [`SourceOrchestrator::run_until_shutdown`].
//!
//! ## Flow
//! ```text
//! SourcesOverride::from_json() ──► SourceOrchestrator::builder().build()
//!     └─► run_until_shutdown()
//!           ├─► connect()  (4 fetchers, HttpTransport)
//!           │     └─► Quote ──► LogWriter.on_event()
//!           │                └─► BtcTicker.on_event()
//!           └─► signal ──► disconnect()
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example quotes --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use quotefeed::{
    HttpTransport, LogWriter, Quote, SenderId, SourceOrchestrator, SourcesOverride, Subscribe,
    SubscriberRef,
};
use serde_json::Value;

/// Prints the BTC price whenever a BTC quote arrives.
struct BtcTicker;

impl Subscribe<Quote<Value>> for BtcTicker {
    fn on_event(&self, _sender: SenderId, q: &Quote<Value>) {
        if q.alias() != "BTC" {
            return;
        }
        let price = q
            .payload
            .get(0)
            .and_then(|t| t.get("price_usd"))
            .and_then(Value::as_str)
            .unwrap_or("?");
        println!("[btc] #{} price_usd={price}", q.seq);
    }

    fn name(&self) -> &'static str {
        "btc-ticker"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    quotefeed::init_telemetry()?;

    let overrides = SourcesOverride::from_json(
        r#"{ "bitcoin": { "intervalMillis": 1000 }, "global": { "intervalMillis": 10000 } }"#,
    )?;
    let log: SubscriberRef<Quote<Value>> = Arc::new(LogWriter);
    let btc: SubscriberRef<Quote<Value>> = Arc::new(BtcTicker);

    let orch = SourceOrchestrator::builder(Arc::new(HttpTransport::with_timeout(
        Duration::from_secs(5),
    )?))
    .with_overrides(overrides)
    .with_subscribers(vec![log, btc])
    .build()?;

    orch.run_until_shutdown().await?;

    for s in orch.stats() {
        println!(
            "[stats] {:<8} attempts={} ok={} failed={}",
            s.alias, s.attempts, s.successes, s.failures
        );
    }
    Ok(())
}
