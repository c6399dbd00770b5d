//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Slot directory for the user store.
    /// Env: `DATA_DIR`
    /// Default: platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Base URL of the replication hub this instance pushes to and pulls
    /// from.  Unset means no replication task is spawned.
    /// Env: `HUB_URL`
    /// Default: unset.
    pub hub_url: Option<String>,

    /// Interval between reconciliation pulls from the hub.
    /// Env: `SYNC_INTERVAL_MS`
    /// Default: 1000 ms.
    pub sync_interval: Duration,

    /// Whether to seed the default admin account at startup.
    /// Env: `SEED_ADMIN` (true/false)
    /// Default: `true`
    pub seed_admin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            data_dir: None,
            hub_url: None,
            sync_interval: Duration::from_millis(1000),
            seed_admin: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Ok(path) = std::env::var("DATA_DIR") {
            config.data_dir = Some(PathBuf::from(path));
        }

        if let Ok(url) = std::env::var("HUB_URL") {
            if !url.is_empty() {
                config.hub_url = Some(url);
            }
        }

        if let Ok(val) = std::env::var("SYNC_INTERVAL_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                config.sync_interval = Duration::from_millis(ms);
            } else {
                tracing::warn!(value = %val, "Invalid SYNC_INTERVAL_MS, using default");
            }
        }

        if let Ok(val) = std::env::var("SEED_ADMIN") {
            config.seed_admin = val != "false" && val != "0";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.sync_interval, Duration::from_millis(1000));
        assert!(config.seed_admin);
        assert!(config.hub_url.is_none());
    }
}
