//! Configuration Module
//!
//! Handles loading cache and fetch settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheBackend, Compression};

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which cache engine variant to build
    pub cache_backend: CacheBackend,
    /// Algorithm used by the compressed engine
    pub compression: Compression,
    /// Namespace prefix for fetch cache keys
    pub cache_prefix: String,
    /// TTL in milliseconds for cached fetch results
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Default responder timeout in milliseconds
    pub fetch_timeout: u64,
    /// Route proxied fetches through the local HTTP stack instead
    pub test_mode: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `compressed`, `memory` or `disabled` (default: compressed)
    /// - `CACHE_COMPRESSION` - `gzip`, `lz4` or `none` (default: gzip)
    /// - `CACHE_PREFIX` - Key namespace for fetch results (default: fetch)
    /// - `CACHE_TTL` - TTL in milliseconds (default: 3600000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `FETCH_TIMEOUT` - Responder timeout in milliseconds (default: 30000)
    /// - `FETCH_TEST_MODE` - `true` or `1` to enable (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_backend: parse_env("CACHE_BACKEND").unwrap_or(defaults.cache_backend),
            compression: parse_env("CACHE_COMPRESSION").unwrap_or(defaults.compression),
            cache_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
            cache_ttl: parse_env("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cleanup_interval: parse_env("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            fetch_timeout: parse_env("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            test_mode: env::var("FETCH_TEST_MODE")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(defaults.test_mode),
        }
    }

    /// Default responder timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout)
    }

    /// Cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl)
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_backend: CacheBackend::Compressed,
            compression: Compression::Gzip,
            cache_prefix: "fetch".to_string(),
            cache_ttl: 3_600_000,
            cleanup_interval: 60,
            fetch_timeout: 30_000,
            test_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_backend, CacheBackend::Compressed);
        assert_eq!(config.compression, Compression::Gzip);
        assert_eq!(config.cache_prefix, "fetch");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.cleanup_interval, 60);
        assert!(!config.test_mode);
    }

    #[test]
    fn test_config_from_env() {
        // Single test so parallel tests never race on these variables
        env::remove_var("CACHE_BACKEND");
        env::remove_var("CACHE_COMPRESSION");
        env::remove_var("CACHE_PREFIX");
        env::remove_var("CACHE_TTL");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("FETCH_TIMEOUT");
        env::remove_var("FETCH_TEST_MODE");

        let config = Config::from_env();
        assert_eq!(config.cache_backend, CacheBackend::Compressed);
        assert_eq!(config.cache_ttl, 3_600_000);
        assert_eq!(config.fetch_timeout, 30_000);
        assert!(!config.test_mode);

        env::set_var("CACHE_BACKEND", "disabled");
        env::set_var("CACHE_COMPRESSION", "lz4");
        env::set_var("FETCH_TIMEOUT", "500");
        env::set_var("FETCH_TEST_MODE", "1");
        env::set_var("CLEANUP_INTERVAL", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.cache_backend, CacheBackend::Disabled);
        assert_eq!(config.compression, Compression::Lz4);
        assert_eq!(config.fetch_timeout(), Duration::from_millis(500));
        assert!(config.test_mode);
        assert_eq!(config.cleanup_interval, 60);

        env::remove_var("CACHE_BACKEND");
        env::remove_var("CACHE_COMPRESSION");
        env::remove_var("FETCH_TIMEOUT");
        env::remove_var("FETCH_TEST_MODE");
        env::remove_var("CLEANUP_INTERVAL");
    }
}
