//! Intercache - a request-interception and response-caching proxy
//!
//! Classifies every intercepted request, applies one of five caching
//! strategies and serves responses from versioned local namespaces when the
//! network is slow, down or simply unnecessary.

mod api;
mod cache;
mod config;
mod control;
mod error;
mod lifecycle;
mod models;
mod net;
mod strategy;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use control::spawn_control_task;
use net::HttpFetcher;

/// Main entry point for the interception proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Wire store, engine, lifecycle and control channel
/// 4. Run install (pre-warm static namespace) and activation
/// 5. Start the control channel listener
/// 6. Start HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting intercache proxy");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: version={}, app_origin={}, api_hosts={:?}, port={}",
        config.version, config.app_origin, config.api_hosts, config.server_port
    );

    let server_port = config.server_port;
    let fetcher = Arc::new(HttpFetcher::new());
    let (state, control_rx) = AppState::new(fetcher, config);

    // Pre-warm the static namespace and sweep stale versions. A failed
    // install leaves the engine uninstalled but still able to proxy.
    match state.lifecycle.install().await {
        Ok(()) => info!("install and activation complete"),
        Err(err) => warn!(%err, "install failed, continuing without pre-warmed shell"),
    }

    // Start the control channel listener
    let control_handle = spawn_control_task(state.controller(), control_rx);
    info!("control channel listener started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Proxy listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(control_handle))
        .await
        .context("server error")?;

    info!("Proxy shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the control listener and allows graceful shutdown.
async fn shutdown_signal(control_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the control listener
    control_handle.abort();
    warn!("Control listener aborted");
}
