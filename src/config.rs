//! Environment-driven configuration, read once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "BluePulse";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outbound AI timeouts are clamped to this window.
const MIN_COLAB_TIMEOUT_MS: u64 = 15_000;
const MAX_COLAB_TIMEOUT_MS: u64 = 120_000;
const DEFAULT_COLAB_TIMEOUT_MS: u64 = 120_000;
const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub colab: ColabConfig,
}

#[derive(Debug, Clone)]
pub struct ColabConfig {
    pub enabled: bool,
    pub api_url: Option<String>,
    pub timeout: Duration,
    pub health_interval: Duration,
}

impl AppConfig {
    /// Read configuration from the environment, falling back to
    /// development defaults.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BLUEPULSE_BIND_ADDR")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8030)));

        let database_path = std::env::var("BLUEPULSE_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("bluepulse.db"));

        Self {
            bind_addr,
            database_path,
            colab: ColabConfig::from_env(),
        }
    }
}

impl ColabConfig {
    pub fn from_env() -> Self {
        let api_url = std::env::var("COLAB_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let enabled = std::env::var("COLAB_ENABLED")
            .map(|value| value == "true")
            .unwrap_or(false)
            && api_url.is_some();

        let timeout_ms = std::env::var("COLAB_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_COLAB_TIMEOUT_MS)
            .clamp(MIN_COLAB_TIMEOUT_MS, MAX_COLAB_TIMEOUT_MS);

        let health_interval_secs = std::env::var("COLAB_HEALTH_INTERVAL_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_HEALTH_INTERVAL_SECS);

        Self {
            enabled,
            api_url,
            timeout: Duration::from_millis(timeout_ms),
            health_interval: Duration::from_secs(health_interval_secs),
        }
    }
}

pub fn default_log_filter() -> String {
    "bluepulse=info,tower_http=info".to_string()
}
