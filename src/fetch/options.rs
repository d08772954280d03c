//! Options accepted by a fetch call.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::fetch::RedirectPolicy;

/// Content type set when a request carries a `json` body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Whether a request goes straight to the network or through the responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connection {
    /// Hand the request to the task responder
    #[default]
    Proxy,
    /// Execute locally, skipping cache and responder
    Direct,
}

/// Query parameters merged into the request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParams {
    /// Ordered pairs; a repeated name keeps its last value
    Pairs(Vec<(String, String)>),
    Map(BTreeMap<String, String>),
}

impl QueryParams {
    /// Iterates name/value pairs in their stored order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        match self {
            QueryParams::Pairs(pairs) => {
                Box::new(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            }
            QueryParams::Map(map) => Box::new(map.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
        }
    }
}

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        QueryParams::Pairs(pairs)
    }
}

impl From<BTreeMap<String, String>> for QueryParams {
    fn from(map: BTreeMap<String, String>) -> Self {
        QueryParams::Map(map)
    }
}

impl From<HashMap<String, String>> for QueryParams {
    fn from(map: HashMap<String, String>) -> Self {
        QueryParams::Map(map.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        QueryParams::Pairs(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Request options, mirroring the usual fetch init object.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// HTTP method, `GET` when absent
    pub method: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
    /// Serialized as the body with a JSON content type; replaces `body`
    pub json: Option<Value>,
    pub qs: Option<QueryParams>,
    pub connection: Connection,
    pub redirect: RedirectPolicy,
    /// Sent as `Referer` when non-empty
    pub referrer: Option<String>,
}

impl FetchOptions {
    /// Empty options: a proxied GET that follows redirects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the method; it is uppercased during validation.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Adds a header. Repeating a name keeps every value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Raw request body. Not allowed on GET or HEAD.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// JSON body, serialized when the request is prepared.
    pub fn json(mut self, value: Value) -> Self {
        self.json = Some(value);
        self
    }

    /// Query parameters merged into the URL.
    pub fn query(mut self, qs: impl Into<QueryParams>) -> Self {
        self.qs = Some(qs.into());
        self
    }

    pub fn connection(mut self, connection: Connection) -> Self {
        self.connection = connection;
        self
    }

    /// Shorthand for `connection(Connection::Direct)`.
    pub fn direct(self) -> Self {
        self.connection(Connection::Direct)
    }

    /// Redirect handling, forwarded to the responder with the task.
    pub fn redirect(mut self, redirect: RedirectPolicy) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Folds a `json` value into the headers and body.
    ///
    /// Any existing content type is replaced. Options without `json` are
    /// returned as they were.
    pub fn resolve_json(mut self) -> Result<Self> {
        let Some(value) = self.json.take() else {
            return Ok(self);
        };

        let body = serde_json::to_vec(&value)
            .map_err(|e| Error::Validation(format!("JSON body cannot be serialized: {}", e)))?;
        let mut headers: Vec<(String, String)> = self
            .headers
            .into_iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("content-type"))
            .collect();
        headers.push(("content-type".to_string(), JSON_CONTENT_TYPE.to_string()));

        Ok(Self {
            headers,
            body: Some(Bytes::from(body)),
            json: None,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_json_sets_body_and_header() {
        let options = FetchOptions::new()
            .header("Content-Type", "text/plain")
            .header("x-a", "1")
            .json(json!({"b": [1, 2]}))
            .resolve_json()
            .unwrap();

        assert!(options.json.is_none());
        assert_eq!(options.body.as_deref(), Some(br#"{"b":[1,2]}"#.as_slice()));
        assert_eq!(
            options.headers,
            vec![
                ("x-a".to_string(), "1".to_string()),
                ("content-type".to_string(), JSON_CONTENT_TYPE.to_string()),
            ]
        );
    }

    #[test]
    fn test_resolve_json_without_json_is_unchanged() {
        let options = FetchOptions::new().body("raw").resolve_json().unwrap();
        assert_eq!(options.body.as_deref(), Some(b"raw".as_slice()));
        assert!(options.headers.is_empty());
    }

    #[test]
    fn test_query_params_iteration_order() {
        let pairs: QueryParams = vec![("b", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(pairs.iter().collect::<Vec<_>>(), vec![("b", "1"), ("a", "2")]);

        let map: QueryParams = HashMap::from([("b".to_string(), "1".to_string())]).into();
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("b", "1")]);
    }
}
