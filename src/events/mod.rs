//! Published events: types and the synchronous bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! deliver quotes from fetchers to subscribers.
//!
//! ## Contents
//! - [`SenderId`], [`Quote`] sender identity and per-tick payload envelope
//! - [`EventBus`] ordered observer registry with snapshot dispatch
//!
//! ## Quick reference
//! - **Publisher**: the per-fetcher callback installed by `SourceOrchestrator::connect`.
//! - **Consumers**: anything implementing [`Subscribe`](crate::Subscribe), registered
//!   through `SourceOrchestrator::subscribe`.

mod bus;
mod event;

pub use bus::EventBus;
pub use event::{Quote, SenderId};
