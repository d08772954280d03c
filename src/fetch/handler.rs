//! Cache policies consulted on the proxy path.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{CacheEngine, Ttl};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{FetchResponse, FetchTask, FetchTaskResult};

/// Decides what is cached for a task, under which key, and for how long.
#[async_trait]
pub trait CacheHandler: Send + Sync {
    /// Returns a stored result for `task`, short-circuiting the responder.
    async fn lookup(&self, task: &FetchTask) -> Result<Option<FetchTaskResult>>;

    /// Offers a fresh result for storage.
    async fn store(&self, task: &FetchTask, result: &FetchTaskResult) -> Result<()>;
}

/// Handler that never caches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

#[async_trait]
impl CacheHandler for NoCache {
    async fn lookup(&self, _task: &FetchTask) -> Result<Option<FetchTaskResult>> {
        Ok(None)
    }

    async fn store(&self, _task: &FetchTask, _result: &FetchTaskResult) -> Result<()> {
        Ok(())
    }
}

/// Handler storing results in a [`CacheEngine`].
///
/// Only GET and HEAD tasks are cached, keyed on the whole task, so any
/// difference in URL, headers or redirect policy is a separate entry.
/// Results carrying an error, or that do not rebuild into a response, are
/// never stored.
pub struct EngineCacheHandler {
    engine: Arc<dyn CacheEngine>,
    prefix: Option<String>,
    ttl: Ttl,
}

impl EngineCacheHandler {
    pub fn new(engine: Arc<dyn CacheEngine>, ttl: Ttl) -> Self {
        Self {
            engine,
            prefix: None,
            ttl,
        }
    }

    /// Handler using the configured prefix and TTL.
    pub fn from_config(engine: Arc<dyn CacheEngine>, config: &Config) -> Self {
        Self::new(engine, config.cache_ttl().into()).with_prefix(config.cache_prefix.clone())
    }

    /// Namespaces every key under `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// True for GET and HEAD tasks.
    pub fn is_cacheable(task: &FetchTask) -> bool {
        matches!(task.method.as_str(), "GET" | "HEAD")
    }

    /// Storage key for `task`.
    pub fn key_for(&self, task: &FetchTask) -> Result<String> {
        let value = serde_json::to_value(task)?;
        Ok(self.engine.create_key(self.prefix.as_deref(), &value))
    }
}

#[async_trait]
impl CacheHandler for EngineCacheHandler {
    async fn lookup(&self, task: &FetchTask) -> Result<Option<FetchTaskResult>> {
        if !Self::is_cacheable(task) {
            return Ok(None);
        }

        let key = self.key_for(task)?;
        let Some(value) = self.engine.get(&key).await? else {
            debug!(url = %task.url, "Fetch cache miss");
            return Ok(None);
        };

        let result = serde_json::from_value(value).map_err(|e| {
            Error::CacheCorruption(format!("Cached fetch result is malformed: {}", e))
        })?;
        debug!(url = %task.url, "Fetch cache hit");
        Ok(Some(result))
    }

    async fn store(&self, task: &FetchTask, result: &FetchTaskResult) -> Result<()> {
        if !Self::is_cacheable(task) || result.error_message().is_some() {
            return Ok(());
        }
        if let Err(e) = FetchResponse::from_task_result(result.clone()) {
            debug!(url = %task.url, error = %e, "Not caching malformed fetch result");
            return Ok(());
        }

        let key = self.key_for(task)?;
        let value = serde_json::to_value(result)?;
        self.engine.set(&key, &value, self.ttl).await
    }
}
