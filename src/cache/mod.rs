//! Cache Module
//!
//! Provides the `CacheEngine` capability set, key derivation, and in-memory
//! engines with lazy TTL expiration and compressed payloads.

mod compression;
mod disabled;
mod entry;
mod key;
mod stats;
mod store;


use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};

// Re-export public types
pub use compression::Compression;
pub use disabled::DisabledCache;
pub use entry::{current_timestamp_ms, CacheEntry, Ttl};
pub use key::{derive_key, djb2, KEY_DELIMITER};
pub use stats::CacheStats;
pub use store::MemoryCache;

// == Cache Engine ==
/// Operations every cache engine variant provides.
///
/// Keys passed to the lookup and mutation methods are derived keys, normally
/// produced by [`CacheEngine::create_key`]. Absent and expired keys are not
/// errors: `get` returns `Ok(None)` for both.
#[async_trait]
pub trait CacheEngine: Send + Sync {
    /// True if `get` would return a value.
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Returns the live value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: &Value, ttl: Ttl) -> Result<()>;

    /// Removes `key`; absent keys are ignored.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    async fn delete_all(&self) -> Result<()>;

    /// Drops all expired entries and returns how many were removed.
    async fn cleanup(&self) -> Result<usize>;

    /// Derives the storage key for `key` under `prefix`.
    fn create_key(&self, prefix: Option<&str>, key: &Value) -> String {
        derive_key(prefix, key)
    }
}

// == Backend Selection ==
/// Engine variant chosen by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Serialized values kept uncompressed
    Memory,
    /// Serialized values compressed with the configured algorithm
    Compressed,
    /// Nothing is stored
    Disabled,
}

impl FromStr for CacheBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "compressed" | "memory-compressed" => Ok(CacheBackend::Compressed),
            "disabled" | "none" => Ok(CacheBackend::Disabled),
            other => Err(Error::Validation(format!("Unknown cache backend: {}", other))),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheBackend::Memory => "memory",
            CacheBackend::Compressed => "compressed",
            CacheBackend::Disabled => "disabled",
        })
    }
}

/// Builds the engine variant selected by `config`.
pub fn engine_from_config(config: &Config) -> Arc<dyn CacheEngine> {
    match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new(Compression::None)),
        CacheBackend::Compressed => Arc::new(MemoryCache::new(config.compression)),
        CacheBackend::Disabled => Arc::new(DisabledCache),
    }
}
