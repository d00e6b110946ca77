//! # Quote subscribers.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for consuming events delivered by the [`EventBus`](crate::EventBus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   fetcher tick ── callback ──► SourceOrchestrator ──► EventBus::publish(sender, &Quote)
//!                                                            │ (snapshot, in order)
//!                                                    ┌───────┼─────────┐
//!                                                    ▼       ▼         ▼
//!                                               LogWriter  SubscriberFn  Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use quotefeed::{Quote, SenderId, Subscribe};
//! use serde_json::Value;
//!
//! struct LastPrice;
//!
//! impl Subscribe<Quote<Value>> for LastPrice {
//!     fn on_event(&self, _sender: SenderId, quote: &Quote<Value>) {
//!         if quote.alias() == "BTC" {
//!             // update a gauge, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "last-price" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::{Subscribe, SubscriberFn, SubscriberRef};
