//! # Transport abstractions.
//!
//! This module provides the collaborator seam between fetchers and the network:
//! - [`Transport`] - trait for one-shot asynchronous endpoint requests
//! - [`TransportFn`] - function-backed transport implementation
//! - [`HttpTransport`] - JSON over HTTP via `reqwest` (feature `http`)

#[cfg(feature = "http")]
mod http;
mod transport_fn;
mod transport_trait;

#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use transport_fn::TransportFn;
pub use transport_trait::Transport;
