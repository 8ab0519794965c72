//! Configuration Module
//!
//! Handles loading and managing engine configuration from environment variables.

use std::env;
use std::time::Duration;

use url::Url;

/// Engine configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Cache ceilings and max-ages are part of the namespace contract and live in
/// [`crate::cache::namespace`]; only deployment-specific knobs belong here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Global cache version tag; bumped whenever the stored-entry shape changes
    pub version: String,
    /// Origin the proxied application is served from (same-origin checks,
    /// shell and manifest pre-warm targets)
    pub app_origin: Url,
    /// Hostnames treated as API upstreams
    pub api_hosts: Vec<String>,
    /// Path segment that marks a request as an API call
    pub api_path_marker: String,
    /// Deadline for API fetches before falling back to cache
    pub api_timeout: Duration,
    /// Path of the application shell document (navigation fallback)
    pub shell_path: String,
    /// Path of the web app manifest (pre-warmed alongside the shell)
    pub manifest_path: String,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_VERSION` - Global namespace version tag (default: "v1")
    /// - `APP_ORIGIN` - Application origin URL (default: http://127.0.0.1:8080)
    /// - `API_HOSTS` - Comma-separated API hostnames (default: api.example.com)
    /// - `API_TIMEOUT_SECS` - API fetch deadline in seconds (default: 15)
    /// - `SHELL_PATH` - Application shell path (default: /)
    /// - `MANIFEST_PATH` - Manifest path (default: /manifest.json)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Self {
            version: env::var("CACHE_VERSION").unwrap_or(defaults.version),
            app_origin: env::var("APP_ORIGIN")
                .ok()
                .and_then(|v| Url::parse(&v).ok())
                .unwrap_or(defaults.app_origin),
            api_hosts: env::var("API_HOSTS")
                .map(|v| {
                    v.split(',')
                        .map(|h| h.trim().to_string())
                        .filter(|h| !h.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.api_hosts),
            api_path_marker: defaults.api_path_marker,
            api_timeout: env::var("API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.api_timeout),
            shell_path: env::var("SHELL_PATH").unwrap_or(defaults.shell_path),
            manifest_path: env::var("MANIFEST_PATH").unwrap_or(defaults.manifest_path),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Absolute URL of the application shell document.
    pub fn shell_url(&self) -> Url {
        self.app_origin
            .join(&self.shell_path)
            .unwrap_or_else(|_| self.app_origin.clone())
    }

    /// Absolute URL of the web app manifest.
    pub fn manifest_url(&self) -> Url {
        self.app_origin
            .join(&self.manifest_path)
            .unwrap_or_else(|_| self.app_origin.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "v1".to_string(),
            app_origin: Url::parse("http://127.0.0.1:8080").expect("static URL is valid"),
            api_hosts: vec!["api.example.com".to_string()],
            api_path_marker: "/api/".to_string(),
            api_timeout: Duration::from_secs(15),
            shell_path: "/".to_string(),
            manifest_path: "/manifest.json".to_string(),
            server_port: 3000,
        }
    }
}
