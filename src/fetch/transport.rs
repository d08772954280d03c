//! The fetch entry point.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::{
    prepare_request, send_task, CacheHandler, Connection, FetchOptions, FetchResponse, FetchTask,
    HttpClient, ReqwestClient, Responder,
};

/// Responder timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches on behalf of sandboxed code.
///
/// Each call goes one of three ways:
/// - `connection: direct` runs on the local HTTP stack, skipping cache and responder
/// - in test mode everything else also runs on the local stack, which tests mock
/// - otherwise the request becomes a [`FetchTask`] for the cache handler and responder
#[derive(Clone)]
pub struct TaskFetch {
    test_mode: bool,
    responder: Arc<dyn Responder>,
    cache: Arc<dyn CacheHandler>,
    http: Arc<dyn HttpClient>,
    default_timeout: Duration,
}

impl TaskFetch {
    pub fn new(
        test_mode: bool,
        responder: Arc<dyn Responder>,
        cache: Arc<dyn CacheHandler>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            test_mode,
            responder,
            cache,
            http,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Transport using reqwest as the local HTTP stack.
    pub fn with_reqwest(
        test_mode: bool,
        responder: Arc<dyn Responder>,
        cache: Arc<dyn CacheHandler>,
    ) -> Result<Self> {
        Ok(Self::new(
            test_mode,
            responder,
            cache,
            Arc::new(ReqwestClient::new()?),
        ))
    }

    /// Transport taking test mode and timeout from `config`.
    pub fn from_config(
        config: &Config,
        responder: Arc<dyn Responder>,
        cache: Arc<dyn CacheHandler>,
    ) -> Result<Self> {
        Ok(Self::with_reqwest(config.test_mode, responder, cache)?
            .with_default_timeout(config.fetch_timeout()))
    }

    /// Replaces the timeout used by [`TaskFetch::fetch`].
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Fetches `url` with the default timeout.
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> Result<FetchResponse> {
        self.fetch_with_timeout(url, options, self.default_timeout)
            .await
    }

    /// Fetches `url`; `timeout` bounds the responder on the proxy path.
    ///
    /// Malformed input fails before anything is dispatched. A result with
    /// an `error` or a failed responder is a transport error; an HTTP error
    /// status is a normal response.
    pub async fn fetch_with_timeout(
        &self,
        url: &str,
        options: FetchOptions,
        timeout: Duration,
    ) -> Result<FetchResponse> {
        let request = prepare_request(url, &options)?;

        if options.connection == Connection::Direct {
            return self.http.execute(&request).await;
        }

        if self.test_mode {
            debug!("Using mocked fetch for {} {}", request.method(), request.url());
            return self.http.execute(&request).await;
        }

        let task = FetchTask::from_request(&request);
        let result = send_task(self.responder.as_ref(), self.cache.as_ref(), task, timeout).await?;
        FetchResponse::from_task_result(result)
    }
}
