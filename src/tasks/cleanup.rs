//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheEngine;

/// Spawns a background task that periodically calls `cleanup` on `engine`.
///
/// The engine owns no timer of its own; this task is the scheduler. It runs
/// until aborted, sleeping for `interval` between passes. A failed pass is
/// logged and the loop continues.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let engine: Arc<dyn CacheEngine> = Arc::new(MemoryCache::default());
/// let cleanup_handle = spawn_cleanup_task(engine.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(engine: Arc<dyn CacheEngine>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {}ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            match engine.cleanup().await {
                Ok(0) => debug!("TTL cleanup: no expired entries found"),
                Ok(removed) => info!("TTL cleanup: removed {} expired entries", removed),
                Err(err) => warn!("TTL cleanup failed: {}", err),
            }
        }
    })
}
