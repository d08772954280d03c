//! Sends a task through the cache handler and the responder.

use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::fetch::{CacheHandler, FetchTask, FetchTaskResult, Responder};

/// Resolves `task`, from the cache when the handler has it, otherwise from
/// the responder within `timeout`. Fresh results are offered to the cache.
///
/// A result carrying an `error` is returned as-is; turning it into a
/// failure is the caller's job.
pub async fn send_task(
    responder: &dyn Responder,
    cache: &dyn CacheHandler,
    task: FetchTask,
    timeout: Duration,
) -> Result<FetchTaskResult> {
    if let Some(cached) = cache.lookup(&task).await? {
        return Ok(cached);
    }

    debug!(method = %task.method, url = %task.url, "Submitting fetch task");
    let result = tokio::time::timeout(timeout, responder.submit(task.clone(), timeout))
        .await
        .map_err(|_| Error::Timeout(timeout))??;

    cache.store(&task, &result).await?;
    Ok(result)
}
