//! The request value handed to route handlers.
//!
//! The HTTP layer (axum) is only a transport here: it collects method, path,
//! headers, query and body into a `Request` and the route table does the rest.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct Request<S> {
    method: String,
    path: String,
    headers: HeaderMap,
    query: HashMap<String, String>,
    body: Bytes,
    state: S,
}

impl<S> Request<S> {
    /// `path` must not carry the query string.
    pub fn new(method: impl AsRef<str>, path: impl Into<String>, state: S) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            path: path.into(),
            headers: HeaderMap::new(),
            query: HashMap::new(),
            body: Bytes::new(),
            state,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Body decoded into `T`; an unreadable body is a 400.
    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_slice(&self.body).map_err(|err| {
            tracing::debug!(error = %err, path = %self.path, "rejecting request body");
            AppError::bad_request("Invalid JSON")
        })
    }

    /// Like `json`, but an empty body decodes as `T::default()` so that the
    /// handler's own "field required" checks answer instead.
    pub fn json_or_default<T: DeserializeOwned + Default>(&self) -> AppResult<T> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        self.json()
    }

    /// Body as a loose JSON object; missing or malformed bodies read as `Null`.
    pub fn json_value(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}
