//! Prepared requests.
//!
//! A request is built from a URL and [`FetchOptions`] in three steps, each
//! taking a value and returning a new one: fold the JSON body into the
//! options, validate into a [`FetchRequest`], then merge the query string.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::{FetchOptions, QueryParams, RedirectPolicy};

/// A validated HTTP request ready for dispatch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    redirect: RedirectPolicy,
    referrer: Option<String>,
}

impl FetchRequest {
    /// Validates `url` and `options` into a request. The `json` and `qs`
    /// options are not applied here; see [`prepare_request`].
    pub fn new(url: &str, options: &FetchOptions) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::Validation(format!("Invalid URL '{}': {}", url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "Unsupported URL scheme '{}'",
                url.scheme()
            )));
        }

        let method = match options.method.as_deref() {
            Some(name) => Method::from_bytes(name.to_ascii_uppercase().as_bytes())
                .map_err(|_| Error::Validation(format!("Invalid HTTP method '{}'", name)))?,
            None => Method::GET,
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::Validation(format!("Invalid header name '{}'", name)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| Error::Validation(format!("Invalid value for header '{}'", name)))?;
            headers.append(header_name, header_value);
        }

        if options.body.is_some() && (method == Method::GET || method == Method::HEAD) {
            return Err(Error::Validation(
                "Request with GET/HEAD method cannot have body".to_string(),
            ));
        }

        Ok(Self {
            method,
            url,
            headers,
            body: options.body.clone(),
            redirect: options.redirect,
            referrer: options.referrer.clone(),
        })
    }

    /// Returns the request with `qs` merged into its query string.
    ///
    /// A name already present keeps its first position and takes the new
    /// value; its later duplicates are dropped. New names are appended.
    /// An empty `qs` leaves the URL exactly as it was.
    pub fn with_query(self, qs: &QueryParams) -> Self {
        if qs.iter().next().is_none() {
            return self;
        }

        let mut pairs: Vec<(String, String)> = self.url.query_pairs().into_owned().collect();
        for (name, value) in qs.iter() {
            set_query_param(&mut pairs, name, value);
        }

        let mut url = self.url;
        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(&pairs);
        }

        Self { url, ..self }
    }

    /// HTTP method, uppercased.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL, query string included.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes, `None` for bodiless requests.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn redirect(&self) -> RedirectPolicy {
        self.redirect
    }

    /// Referrer to send as `Referer`, if any.
    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }
}

fn set_query_param(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match pairs.iter().position(|(k, _)| k == name) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut index = 0;
            pairs.retain(|(k, _)| {
                let keep = k != name || index == first;
                index += 1;
                keep
            });
        }
        None => pairs.push((name.to_string(), value.to_string())),
    }
}

/// Runs the full pipeline: JSON body, validation, then query merge.
pub fn prepare_request(url: &str, options: &FetchOptions) -> Result<FetchRequest> {
    let options = options.clone().resolve_json()?;
    let request = FetchRequest::new(url, &options)?;
    Ok(match &options.qs {
        Some(qs) => request.with_query(qs),
        None => request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::JSON_CONTENT_TYPE;
    use reqwest::header::CONTENT_TYPE;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_defaults() {
        let request = prepare_request("https://example.com/a", &FetchOptions::new()).unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "https://example.com/a");
        assert!(request.headers().is_empty());
        assert!(request.body().is_none());
        assert_eq!(request.redirect(), RedirectPolicy::Follow);
    }

    #[test]
    fn test_method_is_uppercased() {
        let options = FetchOptions::new().method("delete");
        let request = prepare_request("https://example.com/", &options).unwrap();
        assert_eq!(request.method(), Method::DELETE);
    }

    #[test]
    fn test_json_body_and_content_type() {
        let options = FetchOptions::new()
            .method("POST")
            .json(json!({"name": "widget"}));
        let request = prepare_request("https://example.com/items", &options).unwrap();

        assert_eq!(request.headers()[CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(request.body().unwrap().as_ref(), br#"{"name":"widget"}"#);
    }

    #[test]
    fn test_query_merge_overwrites_existing() {
        let qs: BTreeMap<String, String> =
            [("page".to_string(), "2".to_string()), ("q".to_string(), "rust".to_string())]
                .into_iter()
                .collect();
        let options = FetchOptions::new().query(qs);
        let request =
            prepare_request("https://example.com/search?page=1&sort=asc&page=9", &options)
                .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://example.com/search?page=2&sort=asc&q=rust"
        );
    }

    #[test]
    fn test_query_pairs_last_value_wins() {
        let qs: QueryParams = vec![("tag", "a"), ("tag", "b")].into_iter().collect();
        let options = FetchOptions::new().query(qs);
        let request = prepare_request("https://example.com/", &options).unwrap();
        assert_eq!(request.url().query(), Some("tag=b"));
    }

    #[test]
    fn test_query_merge_keeps_other_properties() {
        let qs: QueryParams = vec![("a", "1")].into_iter().collect();
        let options = FetchOptions::new()
            .method("PUT")
            .header("x-trace", "t1")
            .body("data")
            .redirect(RedirectPolicy::Error)
            .query(qs);
        let request = prepare_request("https://example.com/p", &options).unwrap();

        assert_eq!(request.url().as_str(), "https://example.com/p?a=1");
        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.headers()["x-trace"], "t1");
        assert_eq!(request.body().unwrap().as_ref(), b"data");
        assert_eq!(request.redirect(), RedirectPolicy::Error);
    }

    #[test]
    fn test_empty_query_leaves_url_untouched() {
        let url = "https://a.example/p?flag&x=%7E";
        let empty = [
            QueryParams::Pairs(Vec::new()),
            QueryParams::Map(BTreeMap::new()),
        ];

        for qs in empty {
            let request = prepare_request(url, &FetchOptions::new().query(qs)).unwrap();
            assert_eq!(request.url().as_str(), url);
        }
    }

    #[test]
    fn test_query_values_are_encoded() {
        let qs: QueryParams = vec![("q", "a b&c")].into_iter().collect();
        let request =
            prepare_request("https://example.com/", &FetchOptions::new().query(qs)).unwrap();
        assert_eq!(request.url().query(), Some("q=a+b%26c"));
    }

    #[test]
    fn test_pipeline_leaves_options_untouched() {
        let options = FetchOptions::new().method("POST").json(json!([1]));
        prepare_request("https://example.com/", &options).unwrap();
        assert!(options.json.is_some());
        assert!(options.body.is_none());
    }

    #[test]
    fn test_invalid_inputs_are_validation_errors() {
        let cases = [
            ("not a url", FetchOptions::new()),
            ("ftp://example.com/file", FetchOptions::new()),
            ("https://example.com/", FetchOptions::new().method("BAD METHOD")),
            ("https://example.com/", FetchOptions::new().header("bad header", "v")),
            ("https://example.com/", FetchOptions::new().header("x-a", "line\nbreak")),
            ("https://example.com/", FetchOptions::new().body("no body on GET")),
            ("https://example.com/", FetchOptions::new().method("HEAD").body("x")),
        ];

        for (url, options) in cases {
            let result = prepare_request(url, &options);
            assert!(
                matches!(result, Err(Error::Validation(_))),
                "expected validation error for {url} / {options:?}"
            );
        }
    }
}
