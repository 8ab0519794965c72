//! Strategy Engine
//!
//! Executes the five caching strategies over the shared store and the
//! network edge. Within one invocation the sequence cache-read →
//! network-attempt → cache-write is strictly ordered; across requests there
//! is no ordering guarantee and concurrent writes to the same key resolve
//! last-write-wins.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStore, Namespace, NamespacePrefix, NamespaceRegistry};
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::models::{Request, Response};
use crate::net::Fetcher;
use crate::strategy::{classify, RouteClass};

// == Cache Engine ==
/// The request-handling core: classification plus strategy execution.
pub struct CacheEngine {
    store: Arc<RwLock<CacheStore>>,
    fetcher: Arc<dyn Fetcher>,
    registry: NamespaceRegistry,
    config: Arc<Config>,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine over a shared store and network edge.
    pub fn new(
        store: Arc<RwLock<CacheStore>>,
        fetcher: Arc<dyn Fetcher>,
        config: Arc<Config>,
    ) -> Self {
        let registry = NamespaceRegistry::new(config.version.clone());
        Self {
            store,
            fetcher,
            registry,
            config,
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // == Handle ==
    /// Classifies and serves one intercepted request.
    pub async fn handle(&self, request: Request) -> Result<Response> {
        let route = classify(&request, &self.config);
        debug!(key = %request.cache_key(), ?route, "request classified");

        match route {
            RouteClass::Bypass => self.fetcher.fetch(&request).await,
            RouteClass::Images => self.cache_first(&request, NamespacePrefix::Images).await,
            RouteClass::StaticAsset => self.cache_first_revalidate(&request).await,
            RouteClass::Api => self.network_first_api(&request).await,
            RouteClass::Navigation => self.network_first_navigation(&request).await,
            RouteClass::Runtime => self.network_first(&request, NamespacePrefix::Runtime).await,
        }
    }

    // == Store Access ==
    async fn lookup(&self, namespace: &Namespace, key: &str) -> Option<CacheEntry> {
        self.store.write().await.get(&namespace.name, key)
    }

    /// Write-through that never fails the response: a store failure is
    /// logged and the fetched response is still returned to the caller.
    async fn write_through(&self, namespace: &Namespace, key: &str, response: &Response) {
        let result =
            self.store
                .write()
                .await
                .put(namespace, key, response.clone(), current_timestamp_ms());
        if let Err(err) = result {
            warn!(%err, namespace = %namespace.name, key, "write-through failed");
        }
    }

    // == Cache-First (images) ==
    /// Serve fresh hits directly; refresh expired hits over the network but
    /// fall back to the stale copy when the network is down; plain
    /// network-first on a miss.
    async fn cache_first(&self, request: &Request, prefix: NamespacePrefix) -> Result<Response> {
        let namespace = self.registry.get(prefix);
        let key = request.cache_key();

        let cached = self.lookup(&namespace, &key).await;
        if let Some(entry) = &cached {
            if !entry.is_expired(namespace.max_age) {
                debug!(%key, namespace = %namespace.name, "fresh hit");
                return Ok(entry.response.clone());
            }
        }

        self.fetch_and_store(request, &namespace, &key, cached).await
    }

    // == Cache-First with revalidation (static assets) ==
    /// Fresh hits are returned synchronously while a detached background
    /// fetch refreshes the entry; expired or absent entries take the
    /// cache-miss path.
    async fn cache_first_revalidate(&self, request: &Request) -> Result<Response> {
        let namespace = self.registry.get(NamespacePrefix::Static);
        let key = request.cache_key();

        let cached = self.lookup(&namespace, &key).await;
        if let Some(entry) = &cached {
            if !entry.is_expired(namespace.max_age) {
                debug!(%key, "fresh hit, revalidating in background");
                self.spawn_revalidation(request.clone(), namespace.clone(), key);
                return Ok(entry.response.clone());
            }
        }

        self.fetch_and_store(request, &namespace, &key, cached).await
    }

    /// Detached, best-effort refresh. Never awaited by the request that
    /// triggered it; failures are swallowed.
    fn spawn_revalidation(&self, request: Request, namespace: Namespace, key: String) {
        let fetcher = Arc::clone(&self.fetcher);
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            match fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    let result =
                        store
                            .write()
                            .await
                            .put(&namespace, &key, response, current_timestamp_ms());
                    if let Err(err) = result {
                        debug!(%err, %key, "revalidation write discarded");
                    }
                }
                Ok(response) => {
                    debug!(status = response.status, %key, "revalidation got non-2xx, discarded");
                }
                Err(err) => {
                    debug!(%err, %key, "revalidation fetch failed, discarded");
                }
            }
        });
    }

    // == Network-First (api) ==
    /// Bounded fetch; 2xx responses are written through. On timeout,
    /// network error or non-2xx, any cached copy is served regardless of
    /// expiry before the error is allowed to surface.
    async fn network_first_api(&self, request: &Request) -> Result<Response> {
        let namespace = self.registry.get(NamespacePrefix::Api);
        let key = request.cache_key();
        let deadline = self.config.api_timeout;

        let attempt = match tokio::time::timeout(deadline, self.fetcher.fetch(request)).await {
            Ok(Ok(response)) if response.is_success() => Ok(response),
            Ok(Ok(response)) => Err(EngineError::BadStatus(response.status)),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(EngineError::Timeout(deadline.as_millis() as u64)),
        };

        match attempt {
            Ok(response) => {
                self.write_through(&namespace, &key, &response).await;
                Ok(response)
            }
            Err(err) => match self.lookup(&namespace, &key).await {
                // Offline tolerance takes priority over freshness
                Some(entry) => {
                    debug!(%key, %err, "api fetch failed, serving cached copy");
                    Ok(entry.response.clone())
                }
                None => Err(err),
            },
        }
    }

    // == Network-First (navigation / shell fallback) ==
    /// Plain fetch; on failure the cached application shell is served so the
    /// client can always render offline. Never writes to any namespace.
    async fn network_first_navigation(&self, request: &Request) -> Result<Response> {
        match self.fetcher.fetch(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                let namespace = self.registry.get(NamespacePrefix::Static);
                let shell_key = Request::get(self.config.shell_url()).cache_key();
                match self.lookup(&namespace, &shell_key).await {
                    Some(entry) => {
                        debug!(%err, "navigation failed, serving application shell");
                        Ok(entry.response.clone())
                    }
                    None => Err(err),
                }
            }
        }
    }

    // == Network-First (runtime, generic) ==
    async fn network_first(&self, request: &Request, prefix: NamespacePrefix) -> Result<Response> {
        let namespace = self.registry.get(prefix);
        let key = request.cache_key();

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.write_through(&namespace, &key, &response).await;
                }
                Ok(response)
            }
            Err(err) => match self.lookup(&namespace, &key).await {
                Some(entry) => {
                    debug!(%key, %err, "runtime fetch failed, serving cached copy");
                    Ok(entry.response.clone())
                }
                None => Err(err),
            },
        }
    }

    // == Shared miss path ==
    /// Network attempt with write-through on 2xx; if the network fails and
    /// any cached copy exists (even expired), serve it instead of the error.
    async fn fetch_and_store(
        &self,
        request: &Request,
        namespace: &Namespace,
        key: &str,
        stale: Option<CacheEntry>,
    ) -> Result<Response> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.write_through(namespace, key, &response).await;
                }
                Ok(response)
            }
            Err(err) => match stale {
                Some(entry) => {
                    debug!(key, %err, "network failed, serving stale copy");
                    Ok(entry.response.clone())
                }
                None => Err(err),
            },
        }
    }
}
