//! # Quote events emitted by the orchestrator.
//!
//! A [`Quote`] is built once per successful tick, handed by reference to every
//! subscriber in the current snapshot and then dropped. The publishing
//! orchestrator is identified by a [`SenderId`] passed alongside it.
//!
//! ## Ordering guarantees
//! Each quote carries a globally unique sequence number (`seq`) that increases
//! monotonically across all sources. Quotes of one source are published in the
//! order their ticks complete; there is no ordering between sources.
//!
//! ## Example
//! ```rust
//! use quotefeed::Quote;
//!
//! let q = Quote::new("BTC", 42u32);
//! assert_eq!(q.alias(), "BTC");
//! assert_eq!(q.payload, 42);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for quote ordering.
static QUOTE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Counter for sender identities.
static SENDER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Identity of a publisher (one per orchestrator instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SenderId(u64);

impl SenderId {
    /// Allocates a new, process-unique identity.
    pub fn next() -> Self {
        Self(SENDER_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric value (for logs).
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SenderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sender#{}", self.0)
    }
}

/// Data produced by one source on one tick.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp of publication
/// - `alias`: label of the source that produced it
/// - `payload`: transport data, unmodified
#[derive(Debug, Clone)]
pub struct Quote<P> {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Alias of the producing source.
    pub alias: Arc<str>,
    /// Data returned by the transport for this tick.
    pub payload: P,
}

impl<P> Quote<P> {
    /// Creates a quote with current timestamp and next sequence number.
    pub fn new(alias: impl Into<Arc<str>>, payload: P) -> Self {
        Self {
            seq: QUOTE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            alias: alias.into(),
            payload,
        }
    }

    /// Alias of the producing source.
    #[inline]
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_ids_are_unique() {
        let a = SenderId::next();
        let b = SenderId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_quote_seq_is_monotonic() {
        let a = Quote::new("X", ());
        let b = Quote::new("X", ());
        assert!(b.seq > a.seq);
    }
}
