//! Lifecycle Manager
//!
//! State machine governing when namespaces exist at all. Install pre-warms
//! the static namespace with the application shell and manifest, then
//! advances straight to activation instead of waiting for old instances to
//! finish. Activation sweeps every namespace whose name carries a known
//! prefix but a stale version tag, then takes control of all open clients.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::{current_timestamp_ms, CacheStore, NamespacePrefix, NamespaceRegistry};
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::models::Request;
use crate::net::Fetcher;

// == Lifecycle State ==
/// uninstalled → installing → activating → active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninstalled,
    Installing,
    Activating,
    Active,
}

impl LifecycleState {
    /// Lowercase wire name, used by the health endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Uninstalled => "uninstalled",
            LifecycleState::Installing => "installing",
            LifecycleState::Activating => "activating",
            LifecycleState::Active => "active",
        }
    }
}

// == Lifecycle Manager ==
/// Owns install and activate for the single engine instance. Constructed
/// once at process start and injected where needed, never ambient.
pub struct LifecycleManager {
    state: RwLock<LifecycleState>,
    store: Arc<RwLock<CacheStore>>,
    fetcher: Arc<dyn Fetcher>,
    registry: NamespaceRegistry,
    config: Arc<Config>,
}

impl LifecycleManager {
    // == Constructor ==
    pub fn new(
        store: Arc<RwLock<CacheStore>>,
        fetcher: Arc<dyn Fetcher>,
        config: Arc<Config>,
    ) -> Self {
        let registry = NamespaceRegistry::new(config.version.clone());
        Self {
            state: RwLock::new(LifecycleState::Uninstalled),
            store,
            fetcher,
            registry,
            config,
        }
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    // == Install ==
    /// Pre-warms the static namespace with the shell document and the
    /// manifest. Both must be stored before install is considered complete;
    /// any fetch failure aborts the install and reverts to Uninstalled. On
    /// success the instance advances immediately to activation (no hand-off
    /// delay).
    pub async fn install(&self) -> Result<()> {
        *self.state.write().await = LifecycleState::Installing;
        info!(version = %self.registry.version(), "install started");

        let namespace = self.registry.get(NamespacePrefix::Static);
        for url in [self.config.shell_url(), self.config.manifest_url()] {
            let request = Request::get(url);
            let key = request.cache_key();

            let response = match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => response,
                Ok(response) => {
                    warn!(%key, status = response.status, "pre-warm fetch rejected");
                    *self.state.write().await = LifecycleState::Uninstalled;
                    return Err(EngineError::BadStatus(response.status));
                }
                Err(err) => {
                    warn!(%key, %err, "pre-warm fetch failed");
                    *self.state.write().await = LifecycleState::Uninstalled;
                    return Err(err);
                }
            };

            let result =
                self.store
                    .write()
                    .await
                    .put(&namespace, &key, response, current_timestamp_ms());
            if let Err(err) = result {
                *self.state.write().await = LifecycleState::Uninstalled;
                return Err(err);
            }
        }

        info!("install complete, skipping hand-off delay");
        self.activate().await
    }

    // == Activate ==
    /// Deletes every namespace carrying a known prefix with a stale version
    /// tag, then takes control of all currently open clients. Idempotent
    /// when already active. After completion at most one namespace per
    /// prefix is live.
    pub async fn activate(&self) -> Result<()> {
        if self.state().await == LifecycleState::Active {
            return Ok(());
        }
        *self.state.write().await = LifecycleState::Activating;

        let stale: Vec<String> = {
            let store = self.store.read().await;
            store
                .namespace_names()
                .into_iter()
                .filter(|name| self.registry.is_stale(name))
                .collect()
        };

        if !stale.is_empty() {
            let mut store = self.store.write().await;
            for name in &stale {
                store.delete_namespace(name);
                info!(namespace = %name, "stale namespace deleted");
            }
        }

        *self.state.write().await = LifecycleState::Active;
        info!(version = %self.registry.version(), "active, controlling all clients");
        Ok(())
    }
}
