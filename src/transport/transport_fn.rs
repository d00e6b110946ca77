//! # Function-backed transport (`TransportFn`)
//!
//! [`TransportFn`] wraps a closure `F: Fn(String) -> Fut`, producing a fresh
//! future per request. Shared state between requests must be captured explicitly
//! (`Arc<...>`) inside the closure.
//!
//! ## Example
//! ```rust
//! use quotefeed::{FetchError, TransportFn};
//!
//! let t = TransportFn::arc(|endpoint: String| async move {
//!     if endpoint.ends_with("/down") {
//!         return Err(FetchError::Status { status: 503 });
//!     }
//!     Ok::<_, FetchError>(endpoint.len())
//! });
//! # let _ = t;
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::transport::Transport;

/// Function-backed transport implementation.
#[derive(Debug)]
pub struct TransportFn<F> {
    f: F,
}

impl<F> TransportFn<F> {
    /// Creates a new function-backed transport.
    ///
    /// Prefer [`TransportFn::arc`] when handing it straight to an orchestrator.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the transport and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut, P> Transport for TransportFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<P, FetchError>> + Send + 'static,
    P: Clone + Send + Sync + 'static,
{
    type Payload = P;

    async fn fetch(&self, endpoint: &str) -> Result<P, FetchError> {
        (self.f)(endpoint.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_receives_endpoint() {
        let t = TransportFn::new(|endpoint: String| async move {
            Ok::<_, FetchError>(format!("got {endpoint}"))
        });
        assert_eq!(t.fetch("A").await.unwrap(), "got A");
    }

    #[tokio::test]
    async fn test_failure_passes_through() {
        let t = TransportFn::new(|_endpoint: String| async move {
            Err::<(), _>(FetchError::Status { status: 500 })
        });
        assert_eq!(
            t.fetch("A").await,
            Err(FetchError::Status { status: 500 })
        );
    }
}
