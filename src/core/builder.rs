//! # Builder for [`SourceOrchestrator`].
//!
//! Collects the source list and initial subscribers, then resolves and validates
//! everything in [`build`](OrchestratorBuilder::build).
//!
//! ## Example
//! ```rust
//! use quotefeed::{FetchError, SourceOrchestrator, SourceOverride, SourceSlot, SourcesOverride, TransportFn};
//!
//! let transport = TransportFn::arc(|_endpoint: String| async { Ok::<_, FetchError>(0u32) });
//! let overrides = SourcesOverride::default()
//!     .with(SourceSlot::Bitcoin, SourceOverride::default().interval_millis(500));
//!
//! let orch = SourceOrchestrator::builder(transport)
//!     .with_overrides(overrides)
//!     .build()
//!     .unwrap();
//! assert_eq!(orch.sources()[1].interval_ms(), 500);
//! ```

use std::sync::Arc;

use crate::config::{SourceConfig, SourcesOverride, resolve_sources};
use crate::core::orchestrator::SourceOrchestrator;
use crate::error::ConfigError;
use crate::events::Quote;
use crate::subscribers::SubscriberRef;
use crate::transport::Transport;

enum Sources {
    Overrides(SourcesOverride),
    Explicit(Vec<SourceConfig>),
}

/// Builder for constructing a [`SourceOrchestrator`].
pub struct OrchestratorBuilder<T: Transport> {
    transport: Arc<T>,
    sources: Sources,
    subscribers: Vec<SubscriberRef<Quote<T::Payload>>>,
}

impl<T: Transport> OrchestratorBuilder<T> {
    /// Creates a builder using the built-in sources and no subscribers.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            sources: Sources::Overrides(SourcesOverride::default()),
            subscribers: Vec::new(),
        }
    }

    /// Applies per-field overrides on top of the built-in sources.
    pub fn with_overrides(mut self, overrides: SourcesOverride) -> Self {
        self.sources = Sources::Overrides(overrides);
        self
    }

    /// Replaces the built-in sources with an explicit list.
    pub fn with_sources(mut self, sources: Vec<SourceConfig>) -> Self {
        self.sources = Sources::Explicit(sources);
        self
    }

    /// Subscribers registered (in order) before the orchestrator is returned.
    pub fn with_subscribers(mut self, subscribers: Vec<SubscriberRef<Quote<T::Payload>>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Resolves the sources and returns the orchestrator, not yet connected.
    pub fn build(self) -> Result<Arc<SourceOrchestrator<T>>, ConfigError> {
        let sources = match self.sources {
            Sources::Overrides(ov) => resolve_sources(&ov)?,
            Sources::Explicit(list) => list,
        };
        let orch = SourceOrchestrator::with_sources(self.transport, sources);
        for sub in self.subscribers {
            orch.subscribe(sub);
        }
        Ok(Arc::new(orch))
    }
}
