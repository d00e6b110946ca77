//! # Synchronous event bus with snapshot dispatch.
//!
//! [`EventBus`] keeps an ordered list of subscribers and delivers each published
//! event to them **synchronously, in insertion order**.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                         Subscribers (ordered):
//!   fetcher "global" ──┐                       ┌──► S1.on_event(sender, &ev)
//!   fetcher "BTC"    ──┼──► publish(sender, &ev) ─► snapshot ──┼──► S2.on_event(sender, &ev)
//!   fetcher "ETH"    ──┘                       └──► SN.on_event(sender, &ev)
//! ```
//!
//! ## Rules
//! - **Insertion order**: dispatch follows subscription order; duplicates are kept and each is invoked.
//! - **Snapshot**: `publish()` copies the list first; (un)subscribing from inside a handler
//!   only affects later publishes.
//! - **Identity**: `unsubscribe()` removes every entry pointing at the same `Arc` allocation.
//! - **Isolation**: a panicking handler is caught and logged; the remaining handlers still run.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};

use crate::events::SenderId;
use crate::subscribers::SubscriberRef;

/// Ordered observer registry.
///
/// The list lock is held only to copy or mutate the list, never while a handler runs,
/// so handlers may call back into the bus.
pub struct EventBus<T> {
    subscribers: Mutex<Vec<SubscriberRef<T>>>,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<T: 'static> std::fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl<T: 'static> EventBus<T> {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the end of the dispatch order.
    pub fn subscribe(&self, handler: SubscriberRef<T>) {
        self.lock().push(handler);
    }

    /// Removes every registration of `handler`.
    ///
    /// Returns how many entries were removed (`0` if it was not subscribed).
    pub fn unsubscribe(&self, handler: &SubscriberRef<T>) -> usize {
        let mut subs = self.lock();
        let before = subs.len();
        subs.retain(|s| !Arc::ptr_eq(s, handler));
        before - subs.len()
    }

    /// Delivers `event` to a snapshot of the current subscribers.
    ///
    /// Returns the number of handlers that panicked.
    pub fn publish(&self, sender: SenderId, event: &T) -> usize {
        let snapshot: Vec<SubscriberRef<T>> = self.lock().clone();
        let mut faulted = 0;

        for sub in &snapshot {
            if let Err(panic_err) = catch_unwind(AssertUnwindSafe(|| sub.on_event(sender, event))) {
                faulted += 1;
                let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                };
                tracing::error!(subscriber = sub.name(), %sender, panic = %info, "subscriber panicked");
            }
        }
        faulted
    }

    /// Number of registrations (duplicates counted).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SubscriberRef<T>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
