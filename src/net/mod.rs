//! Network Edge Module
//!
//! The engine only ever talks to the network through the [`Fetcher`] trait,
//! so strategies can be exercised against a scripted fetcher in tests while
//! the binary wires in the reqwest-backed implementation.

use async_trait::async_trait;

use crate::error::{EngineError, Result};
use crate::models::{Request, Response};

// == Fetcher Trait ==
/// An asynchronous network fetch: one request in, one response out.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs the fetch. Transport-level failures map to
    /// [`EngineError::Network`]; non-2xx responses are returned as-is and
    /// judged by the calling strategy.
    async fn fetch(&self, request: &Request) -> Result<Response>;
}

// == HTTP Fetcher ==
/// Production fetcher backed by a shared reqwest client.
#[derive(Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| EngineError::InvalidRequest(format!("bad method: {}", request.method)))?;

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let upstream = builder
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        let status = upstream.status();
        let headers = upstream
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = upstream
            .bytes()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?
            .to_vec();

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
