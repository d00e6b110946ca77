//! # JSON over HTTP transport.
//!
//! [`HttpTransport`] issues a `GET` per fetch and parses the body as JSON.
//!
//! ## Outcome mapping
//! ```text
//! send() fails            → FetchError::Network
//! status != 200           → FetchError::Status { status }
//! body is not valid JSON  → FetchError::Decode
//! otherwise               → Ok(serde_json::Value)
//! ```
//!
//! No request timeout is set unless [`HttpTransport::with_timeout`] is used.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::FetchError;
use crate::transport::Transport;

/// HTTP transport returning parsed JSON documents.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport that reuses an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Creates a transport whose requests fail with `Network` after `timeout`.
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    type Payload = Value;

    async fn fetch(&self, endpoint: &str) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                error: e.to_string(),
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| FetchError::Network {
            error: e.to_string(),
        })?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            error: e.to_string(),
        })
    }
}
