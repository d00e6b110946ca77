//! # SourceOrchestrator: owns the fetchers and fans their results into one bus.
//!
//! The [`SourceOrchestrator`] holds the resolved source list, a transport, and an
//! [`EventBus`] of [`Quote`]s. `connect()` creates and starts one
//! [`PeriodicFetcher`] per source; each fetcher's callback publishes a quote tagged
//! with its source alias.
//!
//! ## High-level architecture
//! ```text
//! connect():
//!   SourceConfig[0]  SourceConfig[1]  ...  SourceConfig[N-1]      (declaration order)
//!         │                │                      │
//!         └──► PeriodicFetcher::new(source, transport, callback)   (one per source)
//!                    └──► child CancellationToken of the orchestrator token
//!                         fetcher.start()
//!
//! Event flow:
//!   fetcher tick ── Ok(data) ──► callback ──► Quote { alias, payload: data }
//!                                                  └──► EventBus::publish(self.id, &quote)
//!                                                            ├──► S1.on_event()
//!                                                            └──► SN.on_event()
//!   fetcher tick ── Err(e) ──► warn!(...) (not published)
//!
//! disconnect():
//!   every held fetcher ──► stop()    (collection is kept)
//! ```
//!
//! ## Rules
//! - One fetcher per source per `connect()`; fetchers never share timers.
//! - `connect()` is **not idempotent**: calling it again without `disconnect()` adds
//!   another full set of fetchers, so each source is polled by several loops.
//! - `disconnect()` stops fetchers but keeps them; a later `connect()` appends new ones.
//! - Dropping the orchestrator stops every fetcher it created.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::config::{SourceConfig, SourcesOverride, resolve_sources};
use crate::core::builder::OrchestratorBuilder;
use crate::core::fetcher::{OnFetched, PeriodicFetcher};
use crate::core::shutdown;
use crate::core::stats::StatsSnapshot;
use crate::error::ConfigError;
use crate::events::{EventBus, Quote, SenderId};
use crate::subscribers::SubscriberRef;
use crate::transport::Transport;

/// Coordinates per-source fetchers and quote delivery.
pub struct SourceOrchestrator<T: Transport> {
    id: SenderId,
    sources: Vec<SourceConfig>,
    transport: Arc<T>,
    bus: Arc<EventBus<Quote<T::Payload>>>,
    fetchers: Mutex<Vec<PeriodicFetcher<T>>>,
    runtime_token: CancellationToken,
}

impl<T: Transport> std::fmt::Debug for SourceOrchestrator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceOrchestrator")
            .field("id", &self.id)
            .field("sources", &self.sources)
            .field("fetchers", &self.fetcher_count())
            .finish()
    }
}

impl<T: Transport> SourceOrchestrator<T> {
    /// Creates an orchestrator for the built-in sources with `overrides` applied per field.
    pub fn new(transport: Arc<T>, overrides: &SourcesOverride) -> Result<Self, ConfigError> {
        Ok(Self::with_sources(transport, resolve_sources(overrides)?))
    }

    /// Creates an orchestrator for an explicit source list (polled in the given order).
    pub fn with_sources(transport: Arc<T>, sources: Vec<SourceConfig>) -> Self {
        Self {
            id: SenderId::next(),
            sources,
            transport,
            bus: Arc::new(EventBus::new()),
            fetchers: Mutex::new(Vec::new()),
            runtime_token: CancellationToken::new(),
        }
    }

    /// Returns a builder for the given transport.
    pub fn builder(transport: Arc<T>) -> OrchestratorBuilder<T> {
        OrchestratorBuilder::new(transport)
    }

    /// Identity passed as `sender` with every published quote.
    pub fn id(&self) -> SenderId {
        self.id
    }

    /// Resolved sources, in polling order.
    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    /// Creates and starts one fetcher per source.
    ///
    /// Must be called from within a Tokio runtime; fetchers that cannot start are
    /// logged and left idle.
    pub fn connect(&self) {
        let mut fetchers = self.lock_fetchers();
        let running = fetchers.iter().filter(|f| f.state().is_running()).count();
        if running > 0 {
            tracing::warn!(
                sender = %self.id,
                running,
                "connect called while fetchers are running; adding another set"
            );
        }

        let first_new = fetchers.len();
        for source in &self.sources {
            let fetcher = PeriodicFetcher::new(
                source.clone(),
                Arc::clone(&self.transport),
                self.publisher_for(source),
            )
            .bound_to(&self.runtime_token);
            fetchers.push(fetcher);
        }

        for fetcher in &fetchers[first_new..] {
            if let Err(e) = fetcher.start() {
                tracing::error!(
                    alias = fetcher.source().alias(),
                    label = e.as_label(),
                    error = %e,
                    "fetcher failed to start"
                );
            }
        }
        tracing::info!(sender = %self.id, sources = self.sources.len(), "connected");
    }

    /// Stops every fetcher created so far.
    pub fn disconnect(&self) {
        let fetchers = self.lock_fetchers();
        for fetcher in fetchers.iter() {
            fetcher.stop();
        }
        tracing::info!(sender = %self.id, fetchers = fetchers.len(), "disconnected");
    }

    /// Connects, waits for an OS termination signal, then disconnects.
    pub async fn run_until_shutdown(&self) -> std::io::Result<()> {
        self.connect();
        let res = shutdown::wait_for_shutdown_signal().await;
        match &res {
            Ok(signal) => tracing::info!(sender = %self.id, signal, "shutdown requested"),
            Err(e) => tracing::error!(sender = %self.id, error = %e, "cannot listen for signals"),
        }
        self.disconnect();
        res.map(|_| ())
    }

    /// Registers `handler` on the quote bus.
    pub fn subscribe(&self, handler: SubscriberRef<Quote<T::Payload>>) {
        self.bus.subscribe(handler);
    }

    /// Removes every registration of `handler`; returns how many were removed.
    pub fn unsubscribe(&self, handler: &SubscriberRef<Quote<T::Payload>>) -> usize {
        self.bus.unsubscribe(handler)
    }

    /// Number of fetchers created so far (stopped ones included).
    pub fn fetcher_count(&self) -> usize {
        self.lock_fetchers().len()
    }

    /// Number of fetchers currently holding a timer or an in-flight request.
    pub fn active_fetchers(&self) -> usize {
        self.lock_fetchers()
            .iter()
            .filter(|f| f.state().is_running())
            .count()
    }

    /// Snapshot of every fetcher, in creation order.
    pub fn stats(&self) -> Vec<StatsSnapshot> {
        self.lock_fetchers().iter().map(|f| f.snapshot()).collect()
    }

    fn publisher_for(&self, source: &SourceConfig) -> OnFetched<T::Payload> {
        let bus = Arc::clone(&self.bus);
        let sender = self.id;
        let alias: Arc<str> = Arc::from(source.alias());

        Arc::new(move |data| {
            let quote = Quote::new(Arc::clone(&alias), data);
            tracing::debug!(%sender, alias = %quote.alias, seq = quote.seq, "publish");
            bus.publish(sender, &quote);
        })
    }

    fn lock_fetchers(&self) -> MutexGuard<'_, Vec<PeriodicFetcher<T>>> {
        self.fetchers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport> Drop for SourceOrchestrator<T> {
    fn drop(&mut self) {
        self.runtime_token.cancel();
    }
}
