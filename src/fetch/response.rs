//! Response objects returned by a fetch, whichever path produced them.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::fetch::FetchTaskResult;

/// An HTTP response with its body fully read.
///
/// A 4xx or 5xx status is still a response, never an error.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    status: StatusCode,
    url: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    size: usize,
}

impl FetchResponse {
    /// Creates a response; `size` is the body's byte length.
    pub fn new(status: StatusCode, url: impl Into<String>, headers: HeaderMap, body: Option<Bytes>) -> Self {
        let size = body.as_ref().map_or(0, Bytes::len);
        Self {
            status,
            url: url.into(),
            headers,
            body,
            size,
        }
    }

    /// Rebuilds a response from a responder result.
    ///
    /// A non-empty `error` fails with [`Error::Transport`]. The body comes
    /// from `text` when present, else from base64 `data`; with neither the
    /// response has no body. For text bodies `size` counts characters.
    pub fn from_task_result(result: FetchTaskResult) -> Result<Self> {
        if let Some(message) = result.error_message() {
            return Err(Error::Transport(message.to_string()));
        }

        let status = StatusCode::from_u16(result.status).map_err(|_| {
            Error::Transport(format!("Task result has invalid status {}", result.status))
        })?;

        let mut headers = HeaderMap::new();
        for (name, value) in &result.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::Transport(format!("Task result has invalid header '{}'", name)))?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                Error::Transport(format!("Task result has invalid value for header '{}'", name))
            })?;
            headers.append(header_name, header_value);
        }

        let text = result.text.filter(|text| !text.is_empty());
        let data = result.data.filter(|data| !data.is_empty());
        let (body, size) = match (text, data) {
            (Some(text), _) => {
                let size = text.chars().count();
                (Some(Bytes::from(text)), size)
            }
            (None, Some(data)) => {
                let bytes = STANDARD
                    .decode(data.as_bytes())
                    .map_err(|e| Error::Transport(format!("Task result data is not base64: {}", e)))?;
                let size = bytes.len();
                (Some(Bytes::from(bytes)), size)
            }
            (None, None) => (None, 0),
        };

        Ok(Self {
            status,
            url: result.url,
            headers,
            body,
            size,
        })
    }

    /// Reads a local HTTP response to completion.
    pub async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let body = (!bytes.is_empty()).then_some(bytes);
        Ok(Self::new(status, url, headers, body))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body length: characters for text results, bytes otherwise.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Body bytes; empty when the response has no body.
    pub fn bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.bytes()).into_owned()
    }

    /// Body parsed as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(self.bytes())?)
    }
}
