//! Local HTTP stack used for direct and test-mode fetches.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, REFERER};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};
use tracing::warn;

use crate::error::{Error, Result};
use crate::fetch::{FetchRequest, FetchResponse, RedirectPolicy};

/// Executes a prepared request without going through the responder.
///
/// Test suites swap in their own implementation to mock the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

/// [`HttpClient`] backed by reqwest.
///
/// Redirect handling is fixed per reqwest client, so one client follows
/// redirects and a second never does.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    following: Client,
    non_following: Client,
}

impl ReqwestClient {
    /// Builds clients with reqwest's defaults.
    pub fn new() -> Result<Self> {
        Self::with_builder(Client::builder)
    }

    /// Builds both clients from `builder`, overriding only the redirect policy.
    pub fn with_builder(builder: impl Fn() -> ClientBuilder) -> Result<Self> {
        Ok(Self {
            following: builder().build()?,
            non_following: builder().redirect(Policy::none()).build()?,
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let client = match request.redirect() {
            RedirectPolicy::Follow => &self.following,
            RedirectPolicy::Manual | RedirectPolicy::Error => &self.non_following,
        };

        let mut headers = request.headers().clone();
        if let Some(referrer) = request.referrer().filter(|r| !r.is_empty()) {
            if !headers.contains_key(REFERER) {
                let value = HeaderValue::from_str(referrer)
                    .map_err(|_| Error::Validation(format!("Invalid referrer '{}'", referrer)))?;
                headers.insert(REFERER, value);
            }
        }

        let mut builder = client
            .request(request.method().clone(), request.url().clone())
            .headers(headers);
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;

        if request.redirect() == RedirectPolicy::Error && response.status().is_redirection() {
            warn!(url = %request.url(), status = %response.status(), "Redirect refused");
            return Err(Error::Transport(format!(
                "Redirect from {} refused by redirect policy",
                request.url()
            )));
        }

        FetchResponse::from_reqwest(response).await
    }
}
