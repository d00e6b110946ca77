//! # Per-fetcher counters.
//!
//! Each [`PeriodicFetcher`](crate::PeriodicFetcher) owns one [`FetcherStats`],
//! updated by its loop and read through snapshots.
//!
//! ## Rules
//! - `attempts` increments when a request is issued (entering `InFlight`)
//! - exactly one of `successes` / `failures` increments per completed request
//! - a completion discarded after `stop()` increments neither
//! - reads are **eventually consistent** (relaxed atomics)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::FetcherState;
use crate::error::FetchError;

/// Live counters of one fetcher.
#[derive(Debug, Default)]
pub struct FetcherStats {
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    last_failure: Mutex<Option<FetchError>>,
}

impl FetcherStats {
    /// Records a request being issued; returns its 1-based attempt number.
    pub(crate) fn begin_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, err: &FetchError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        *self
            .last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(err.clone());
    }

    /// Requests issued so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Requests that returned data.
    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    /// Requests that failed.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Most recent failure, if any.
    pub fn last_failure(&self) -> Option<FetchError> {
        self.last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Point-in-time view of one fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Alias of the polled source.
    pub alias: Arc<str>,
    /// Lifecycle state at snapshot time.
    pub state: FetcherState,
    /// Requests issued.
    pub attempts: u64,
    /// Requests that returned data.
    pub successes: u64,
    /// Requests that failed.
    pub failures: u64,
    /// Most recent failure, if any.
    pub last_failure: Option<FetchError>,
}
