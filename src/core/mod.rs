//! Polling runtime: per-source fetchers and the orchestrator that owns them.
//!
//! - [`PeriodicFetcher`] fixed-delay polling loop for one source
//! - [`SourceOrchestrator`] one fetcher per source, results fanned into an [`EventBus`](crate::EventBus)
//! - [`OrchestratorBuilder`] source resolution and initial subscribers
//! - [`FetcherStats`], [`StatsSnapshot`] per-fetcher counters

mod builder;
mod fetcher;
mod orchestrator;
mod shutdown;
mod stats;

pub use builder::OrchestratorBuilder;
pub use fetcher::{FetcherState, OnFetched, PeriodicFetcher};
pub use orchestrator::SourceOrchestrator;
pub use stats::{FetcherStats, StatsSnapshot};
