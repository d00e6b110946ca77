//! # Transport abstraction.
//!
//! A [`Transport`] turns an endpoint address into either parsed data or a
//! [`FetchError`], exactly once per call. Fetchers hold it behind an `Arc` and
//! invoke it once per tick.

use async_trait::async_trait;

use crate::error::FetchError;

/// # Asynchronous one-shot endpoint request.
///
/// Implementations must resolve each call exactly once. No timeout is imposed by
/// the caller: a request that never resolves keeps its fetcher `InFlight`.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use quotefeed::{FetchError, Transport};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl Transport for Fixed {
///     type Payload = u64;
///
///     async fn fetch(&self, endpoint: &str) -> Result<u64, FetchError> {
///         if endpoint.is_empty() {
///             return Err(FetchError::Status { status: 404 });
///         }
///         Ok(42)
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Structured value produced by a successful request.
    type Payload: Clone + Send + Sync + 'static;

    /// Performs one request against `endpoint`.
    async fn fetch(&self, endpoint: &str) -> Result<Self::Payload, FetchError>;
}
