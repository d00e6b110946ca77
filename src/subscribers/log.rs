//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] logs every quote through `tracing` at `info` level.
//!
//! ## Output format
//! ```text
//! INFO quotefeed::subscribers::log: quote sender=sender#1 alias=BTC seq=12 payload=[...]
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use quotefeed::{HttpTransport, LogWriter, SourceOrchestrator, SubscriberRef, Quote};
//! # async fn demo() {
//! let orch = SourceOrchestrator::builder(Arc::new(HttpTransport::new())).build().unwrap();
//! let log: SubscriberRef<Quote<serde_json::Value>> = Arc::new(LogWriter);
//! orch.subscribe(log);
//! # }
//! ```

use std::fmt::Debug;

use crate::events::{Quote, SenderId};
use crate::subscribers::Subscribe;

/// Tracing-backed quote logger.
///
/// Enabled via the `logging` feature. Not intended for production use; implement a
/// custom [`Subscribe`] for structured sinks or metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl<P> Subscribe<Quote<P>> for LogWriter
where
    P: Debug,
{
    fn on_event(&self, sender: SenderId, q: &Quote<P>) {
        tracing::info!(
            %sender,
            alias = %q.alias,
            seq = q.seq,
            payload = ?q.payload,
            "quote"
        );
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
