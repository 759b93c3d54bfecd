//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

use crate::cache::DEFAULT_TTL_MS;

/// Default upstream statistics API.
pub const DEFAULT_UPSTREAM_URL: &str = "https://samar.iitk.ac.in/dlc-pension-data-api";

/// Proxy and cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream statistics API
    pub upstream_url: String,
    /// Default TTL in milliseconds for responses fetched without explicit TTL
    pub default_ttl_ms: u64,
    /// Upstream request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Directory holding the persisted cache checkpoint
    pub cache_dir: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UPSTREAM_URL` - Upstream API base URL
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `REQUEST_TIMEOUT_MS` - Upstream timeout in milliseconds (default: 30000)
    /// - `SERVER_PORT` - HTTP server port (default: 9007)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 300)
    /// - `CACHE_DIR` - Checkpoint directory (default: platform cache dir)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            upstream_url: env::var("UPSTREAM_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_url),
            default_ttl_ms: parse_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            cache_dir: env::var_os("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
        }
    }

    /// Default TTL as a `Duration`.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    /// Upstream timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Builds the full upstream URL for a proxied path.
    ///
    /// Leading slashes on `path` are ignored, so `/dashboard/stats` and
    /// `dashboard/stats` resolve to the same URL.
    pub fn upstream_endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.upstream_url, path.trim_start_matches('/'))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            default_ttl_ms: DEFAULT_TTL_MS,
            request_timeout_ms: 30_000,
            server_port: 9007,
            cleanup_interval: 300,
            cache_dir: default_cache_dir(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", "dlc_cache")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".dlc_cache"))
}
