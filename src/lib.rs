//! # quotefeed
//!
//! **quotefeed** polls a fixed set of market-data endpoints on independent timers and
//! fans every successful result into one ordered, synchronous event bus.
//!
//! Each source is polled by its own [`PeriodicFetcher`] with a fixed delay between
//! the completion of one request and the start of the next. Failures are logged and
//! retried on the same cadence; subscribers only ever see successful data, tagged
//! with the alias of the source that produced it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐         ┌──────────────┐
//!     │ SourceConfig │   │ SourceConfig │   ...   │ SourceConfig │
//!     │   (global)   │   │    (BTC)     │         │  (LiteCoin)  │
//!     └──────┬───────┘   └──────┬───────┘         └──────┬───────┘
//!            ▼                  ▼                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  SourceOrchestrator                                               │
//! │  - resolved sources (defaults + SourcesOverride)                  │
//! │  - Transport (shared by every fetcher)                            │
//! │  - EventBus<Quote<Payload>>                                       │
//! │  - runtime token (parent of every fetcher token)                  │
//! └──────┬──────────────────┬────────────────────────┬────────────────┘
//!        ▼                  ▼                        ▼
//!     ┌──────────────┐   ┌──────────────┐         ┌──────────────┐
//!     │PeriodicFetch.│   │PeriodicFetch.│         │PeriodicFetch.│
//!     │(fixed delay) │   │(fixed delay) │         │(fixed delay) │
//!     └┬─────────────┘   └┬─────────────┘         └┬─────────────┘
//!      │ Ok(data)         │ Ok(data)               │ Err(e) ─► warn!, retry
//!      ▼                  ▼                        │
//! ┌───────────────────────────────────────────────────────────────────┐
//! │        EventBus::publish(sender, &Quote { alias, payload })       │
//! │           (snapshot of subscribers, called in order)              │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                     sub1.on   sub2.on   subN.on
//!                     _event()  _event()  _event()
//! ```
//!
//! ### Lifecycle
//! ```text
//! SourceOrchestrator::connect() ──► one PeriodicFetcher per source ──► start()
//!
//! loop {
//!   ├─► sleep(interval) (cancellable)
//!   ├─► transport.fetch(endpoint)
//!   │       ├─ Ok(data) ──► publish Quote { alias, payload: data }
//!   │       └─ Err(e)   ──► warn!(...), not published
//!   └─► reschedule (delay measured from completion)
//! }
//!
//! SourceOrchestrator::disconnect() ──► stop() every fetcher
//!   - pending timers are cancelled
//!   - an in-flight request finishes, its result is discarded
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                                   |
//! |-------------------|--------------------------------------------------------------|------------------------------------------------------|
//! | **Orchestration** | Own the fetchers, connect/disconnect, fan results in.        | [`SourceOrchestrator`], [`OrchestratorBuilder`]      |
//! | **Polling**       | Fixed-delay single-source loop with explicit lifecycle.      | [`PeriodicFetcher`], [`FetcherState`]                |
//! | **Events**        | Ordered synchronous observer registry.                       | [`EventBus`], [`Quote`], [`SenderId`]                |
//! | **Subscriber API**| Consume quotes.                                              | [`Subscribe`], [`SubscriberFn`]                      |
//! | **Transport**     | Pluggable one-shot request seam.                             | [`Transport`], [`TransportFn`]                       |
//! | **Configuration** | Built-in sources and per-field overrides.                    | [`SourceConfig`], [`SourcesOverride`]                |
//! | **Errors**        | Typed errors for requests, lifecycle and configuration.      | [`FetchError`], [`FetcherError`], [`ConfigError`]    |
//!
//! ## Optional features
//! - `http` _(default)_: exports [`HttpTransport`], JSON over HTTP via `reqwest`.
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use quotefeed::{HttpTransport, Quote, SenderId, SourceOrchestrator, SubscriberFn, SubscriberRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     quotefeed::init_telemetry()?;
//!
//!     let printer: SubscriberRef<Quote<serde_json::Value>> =
//!         SubscriberFn::arc("printer", |_sender: SenderId, q: &Quote<serde_json::Value>| {
//!             println!("{} {}", q.alias(), q.payload);
//!         });
//!
//!     let orch = SourceOrchestrator::builder(Arc::new(HttpTransport::new()))
//!         .with_subscribers(vec![printer])
//!         .build()?;
//!
//!     // Polls until SIGINT/SIGTERM, then stops every fetcher.
//!     orch.run_until_shutdown().await?;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod telemetry;
mod transport;

// ---- Public re-exports ----

pub use config::{
    DEFAULT_INTERVAL_MS, SourceConfig, SourceOverride, SourceSlot, SourcesOverride,
    default_sources, resolve_sources,
};
pub use core::{
    FetcherState, FetcherStats, OnFetched, OrchestratorBuilder, PeriodicFetcher,
    SourceOrchestrator, StatsSnapshot,
};
pub use error::{ConfigError, FetchError, FetcherError};
pub use events::{EventBus, Quote, SenderId};
pub use subscribers::{Subscribe, SubscriberFn, SubscriberRef};
pub use telemetry::{init_telemetry, init_telemetry_json};
pub use transport::{Transport, TransportFn};

// Optional: JSON over HTTP transport.
// Enabled by default; disable with `--no-default-features`.
#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
