//! Wire envelopes exchanged with the task responder.
//!
//! Both shapes serialize to plain camelCase JSON.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::REFERER;
use serde::{Deserialize, Serialize};

use crate::fetch::FetchRequest;

/// What to do when the server answers with a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectPolicy {
    /// Follow redirects transparently
    #[default]
    Follow,
    /// Hand the 3xx response back to the caller
    Manual,
    /// Fail the request on any redirect
    Error,
}

/// A serializable HTTP request, executed once by the responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTask {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub redirect: RedirectPolicy,
}

impl FetchTask {
    /// Flattens a prepared request into its wire form.
    ///
    /// Repeated headers are joined with `", "`. `Referer` comes from the
    /// request's referrer unless the headers already carry one.
    pub fn from_request(request: &FetchRequest) -> Self {
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for name in request.headers().keys() {
            let joined = request
                .headers()
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            headers.insert(name.as_str().to_string(), joined);
        }

        if let Some(referrer) = request.referrer().filter(|r| !r.is_empty()) {
            if !request.headers().contains_key(REFERER) {
                headers.insert("Referer".to_string(), referrer.to_string());
            }
        }

        Self {
            url: request.url().to_string(),
            method: request.method().as_str().to_ascii_uppercase(),
            headers,
            body: request
                .body()
                .map(|body| String::from_utf8_lossy(body).into_owned()),
            redirect: request.redirect(),
        }
    }
}

/// A serializable HTTP response, or an error indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTaskResult {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64-encoded binary body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchTaskResult {
    /// Successful result with a text body.
    pub fn with_text(status: u16, url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Successful result with a binary body, base64-encoded for the wire.
    pub fn with_data(status: u16, url: impl Into<String>, data: &[u8]) -> Self {
        Self {
            status,
            url: url.into(),
            data: Some(STANDARD.encode(data)),
            ..Self::default()
        }
    }

    /// Result reporting that the task failed.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sets a response header, replacing any previous value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The error message, if the result reports a failure.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }
}
