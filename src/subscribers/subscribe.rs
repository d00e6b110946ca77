//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging handlers into an
//! [`EventBus`](crate::EventBus). Handlers run **synchronously on the publishing
//! task**, one after another in subscription order.
//!
//! ## Contract
//! - Keep handlers short; a slow handler delays the remaining handlers and the
//!   publishing fetcher's next reschedule.
//! - A panic is caught by the bus and logged; it does not reach the publisher.
//! - Identity (for unsubscribe) is the `Arc` allocation, so keep the
//!   [`SubscriberRef`] you subscribed with.

use std::sync::Arc;

use crate::events::SenderId;

/// Shared handle to a subscriber, compared by pointer identity.
pub type SubscriberRef<T> = Arc<dyn Subscribe<T>>;

/// Contract for event subscribers.
pub trait Subscribe<T>: Send + Sync + 'static {
    /// Handle a single event.
    ///
    /// # Parameters
    /// - `sender`: identity of the publisher
    /// - `event`: reference to the event (does not transfer ownership)
    fn on_event(&self, sender: SenderId, event: &T);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Function-backed subscriber.
///
/// ## Example
/// ```rust
/// use quotefeed::{Quote, SenderId, SubscriberFn, SubscriberRef};
///
/// let printer: SubscriberRef<Quote<u32>> =
///     SubscriberFn::arc("printer", |_sender: SenderId, q: &Quote<u32>| {
///         println!("{} = {}", q.alias(), q.payload);
///     });
/// # let _ = printer;
/// ```
pub struct SubscriberFn<F> {
    name: &'static str,
    f: F,
}

impl<F> SubscriberFn<F> {
    /// Creates a named function-backed subscriber.
    pub fn new<T>(name: &'static str, f: F) -> Self
    where
        F: Fn(SenderId, &T) + Send + Sync + 'static,
    {
        Self { name, f }
    }

    /// Creates the subscriber and returns it as a shared handle.
    pub fn arc<T>(name: &'static str, f: F) -> Arc<Self>
    where
        F: Fn(SenderId, &T) + Send + Sync + 'static,
    {
        Arc::new(Self::new(name, f))
    }
}

impl<F> std::fmt::Debug for SubscriberFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberFn")
            .field("name", &self.name)
            .finish()
    }
}

impl<T, F> Subscribe<T> for SubscriberFn<F>
where
    F: Fn(SenderId, &T) + Send + Sync + 'static,
{
    fn on_event(&self, sender: SenderId, event: &T) {
        (self.f)(sender, event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
