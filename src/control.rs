//! Remote Control Channel
//!
//! Background listener for the two out-of-band commands the foreground
//! application may send: force-activate-now and purge-all-namespaces. Both
//! are fire-and-forget with no response payload.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::lifecycle::LifecycleManager;
use crate::models::ControlMessage;

// == Controller ==
/// Applies control messages against the store and lifecycle manager.
pub struct Controller {
    store: Arc<RwLock<CacheStore>>,
    lifecycle: Arc<LifecycleManager>,
}

impl Controller {
    pub fn new(store: Arc<RwLock<CacheStore>>, lifecycle: Arc<LifecycleManager>) -> Self {
        Self { store, lifecycle }
    }

    /// Handles one message. Never fails the channel: command errors are
    /// logged and dropped, matching the fire-and-forget contract.
    pub async fn handle(&self, message: ControlMessage) {
        match message {
            ControlMessage::ActivateNow => {
                // Idempotent if already active
                if let Err(err) = self.lifecycle.activate().await {
                    warn!(%err, "activate-now failed");
                }
            }
            ControlMessage::PurgeAll => {
                let purged = self.store.write().await.purge_all();
                info!(purged, "purge-all: deleted every namespace");
            }
        }
    }
}

// == Channel Wiring ==
/// Creates the control channel endpoints.
pub fn control_channel() -> (UnboundedSender<ControlMessage>, UnboundedReceiver<ControlMessage>) {
    mpsc::unbounded_channel()
}

/// Spawns the background task that drains the control channel.
///
/// Returns a JoinHandle that can be aborted during graceful shutdown.
pub fn spawn_control_task(
    controller: Arc<Controller>,
    mut rx: UnboundedReceiver<ControlMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("control channel listener started");
        while let Some(message) = rx.recv().await {
            debug!(?message, "control message received");
            controller.handle(message).await;
        }
        info!("control channel closed");
    })
}
