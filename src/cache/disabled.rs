//! Engine variant that never stores anything.

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::{CacheEngine, Ttl};
use crate::error::Result;

/// Cache engine for when caching is switched off. Every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

#[async_trait]
impl CacheEngine for DisabledCache {
    async fn get(&self, _key: &str) -> Result<Option<Value>> {
        tokio::task::yield_now().await;
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &Value, _ttl: Ttl) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        Ok(())
    }

    async fn cleanup(&self) -> Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let cache = DisabledCache;
        cache.set(":k", &json!("v"), Ttl::Forever).await.unwrap();
        assert_eq!(cache.get(":k").await.unwrap(), None);
        assert!(!cache.exists(":k").await.unwrap());
        assert_eq!(cache.cleanup().await.unwrap(), 0);
        cache.delete(":k").await.unwrap();
        cache.delete_all().await.unwrap();
    }
}
