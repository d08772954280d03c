//! Memory Cache Module
//!
//! In-memory engine storing serialized, compressed values with lazy TTL
//! expiration.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{current_timestamp_ms, CacheEngine, CacheEntry, CacheStats, Compression, Ttl};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

// == Memory Cache ==
/// Cache engine holding compressed JSON payloads in a private map.
///
/// With [`Compression::None`] this is the plain memory variant. Expired
/// entries stay in the map until a lookup or [`CacheEngine::cleanup`]
/// touches them.
#[derive(Debug, Default)]
pub struct MemoryCache {
    state: RwLock<StoreState>,
    compression: Compression,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates an empty engine compressing payloads with `compression`.
    pub fn new(compression: Compression) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            compression,
        }
    }

    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.read().await;
        let mut stats = state.stats.clone();
        stats.total_entries = state.entries.len();
        stats
    }

    /// Number of entries in the map, expired ones included.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let bytes = serde_json::to_vec(value)?;
        self.compression.compress(&bytes)
    }

    fn decode(&self, payload: &[u8]) -> Result<Value> {
        let bytes = self.compression.decompress(payload)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::CacheCorruption(format!("Stored value is not valid JSON: {}", e)))
    }

    #[cfg(test)]
    pub(crate) async fn insert_raw(&self, key: &str, entry: CacheEntry) {
        self.state.write().await.entries.insert(key.to_string(), entry);
    }
}

#[async_trait]
impl CacheEngine for MemoryCache {
    // == Get ==
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        // Let a set issued just before this call land first
        tokio::task::yield_now().await;

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let now = current_timestamp_ms();

        match state.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = self.decode(&entry.payload)?;
                state.stats.record_hit();
                Ok(Some(value))
            }
            Some(_) => {
                state.entries.remove(key);
                state.stats.record_expirations(1);
                state.stats.record_miss();
                debug!(key, "Cache entry expired");
                Ok(None)
            }
            None => {
                state.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Set ==
    async fn set(&self, key: &str, value: &Value, ttl: Ttl) -> Result<()> {
        let entry = CacheEntry::new(self.encode(value)?, ttl);
        self.state
            .write()
            .await
            .entries
            .insert(key.to_string(), entry);
        Ok(())
    }

    // == Delete ==
    async fn delete(&self, key: &str) -> Result<()> {
        self.state.write().await.entries.remove(key);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.state.write().await.entries.clear();
        Ok(())
    }

    // == Cleanup Expired ==
    async fn cleanup(&self) -> Result<usize> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let now = current_timestamp_ms();

        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - state.entries.len();

        state.stats.record_expirations(removed);
        Ok(removed)
    }
}
