//! Error types used by the quotefeed runtime and transports.
//!
//! This module defines three error enums:
//!
//! - [`FetchError`]: a single transport request failed (status, network, decode).
//! - [`FetcherError`]: a [`PeriodicFetcher`](crate::PeriodicFetcher) lifecycle call was invalid.
//! - [`ConfigError`]: source overrides could not be parsed or resolved.
//!
//! Each type provides `as_label` for logs. None of them is ever fatal to a running
//! orchestrator: fetch failures are logged and retried on the same cadence.

use thiserror::Error;

use crate::config::SourceSlot;
use crate::core::FetcherState;

/// # Errors produced by a single transport request.
///
/// Fetchers never forward these to subscribers. They are logged and the fetcher
/// reschedules itself with the same fixed delay.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The endpoint answered with a non-success status code.
    #[error("unexpected status {status}")]
    Status {
        /// Status code returned by the endpoint.
        status: u16,
    },

    /// The request could not be completed (DNS, connect, reset, timeout...).
    #[error("network error: {error}")]
    Network {
        /// The underlying error message.
        error: String,
    },

    /// The response body could not be parsed into structured data.
    #[error("malformed response: {error}")]
    Decode {
        /// The underlying parse error message.
        error: String,
    },
}

impl FetchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use quotefeed::FetchError;
    ///
    /// let err = FetchError::Status { status: 503 };
    /// assert_eq!(err.as_label(), "fetch_status");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FetchError::Status { .. } => "fetch_status",
            FetchError::Network { .. } => "fetch_network",
            FetchError::Decode { .. } => "fetch_decode",
        }
    }

    /// True if the endpoint answered but with a non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }
}

/// # Errors produced by fetcher lifecycle calls.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetcherError {
    /// `start()` was called on a fetcher that already left `Idle`.
    #[error("fetcher cannot start from state {from:?}")]
    InvalidState {
        /// State the fetcher was in when the call was made.
        from: FetcherState,
    },

    /// `start()` was called outside of a Tokio runtime.
    #[error("no tokio runtime available to drive the fetcher")]
    NoRuntime,
}

impl FetcherError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FetcherError::InvalidState { .. } => "fetcher_invalid_state",
            FetcherError::NoRuntime => "fetcher_no_runtime",
        }
    }
}

/// # Errors produced while building the source configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The overrides document is not valid JSON or has unknown fields.
    #[error("cannot parse source overrides: {error}")]
    Parse {
        /// The underlying parse error message.
        error: String,
    },

    /// The resolved endpoint for a slot is empty.
    #[error("source {slot:?} has an empty endpoint")]
    EmptyEndpoint {
        /// Slot whose endpoint resolved to an empty string.
        slot: SourceSlot,
    },

    /// The resolved alias for a slot is empty.
    #[error("source {slot:?} has an empty alias")]
    EmptyAlias {
        /// Slot whose alias resolved to an empty string.
        slot: SourceSlot,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Parse { .. } => "config_parse",
            ConfigError::EmptyEndpoint { .. } => "config_empty_endpoint",
            ConfigError::EmptyAlias { .. } => "config_empty_alias",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            FetchError::Network { error: "reset".into() }.as_label(),
            "fetch_network"
        );
        assert_eq!(
            FetchError::Decode { error: "eof".into() }.as_label(),
            "fetch_decode"
        );
        assert_eq!(
            ConfigError::EmptyAlias { slot: SourceSlot::Bitcoin }.as_label(),
            "config_empty_alias"
        );
    }

    #[test]
    fn test_status_display() {
        let err = FetchError::Status { status: 404 };
        assert!(err.is_status());
        assert_eq!(err.to_string(), "unexpected status 404");
    }
}
